use super::Software;
use crate::math::cell_of;
use crate::renderer::palette;
use crate::sim::{Enemy, Pickup, Position, Sim};
use crate::world::Grid;

/// Share of the frame width the map may take.
const MAP_SHARE: f32 = 0.3;
const MARGIN: i32 = 4;
/// Facing pointer length in cells, sampled six times per cell.
const POINTER_CELLS: i32 = 3;
const POINTER_SAMPLES: i32 = 6;

impl Software {
    /// Top-left overview of the level.
    pub(super) fn draw_minimap(&mut self, sim: &Sim) {
        let grid = sim.grid();
        if grid.width() == 0 || grid.height() == 0 {
            return;
        }
        let scale = ((self.width as f32 * MAP_SHARE) as i32 / grid.width()).max(1);
        let (ox, oy) = (MARGIN, MARGIN);
        let to_px = |v: f32| (v * scale as f32) as i32;

        self.fill_rect(
            ox - 1,
            oy - 1,
            grid.width() * scale + 2,
            grid.height() * scale + 2,
            palette::MAP_FRAME,
        );

        /*----- cells ---------------------------------------------------*/
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let c = if grid.is_reachable(x, y) {
                    palette::MAP_FLOOR
                } else if grid.is_solid(x, y) && borders_reachable(grid, x, y) {
                    palette::MAP_WALL
                } else {
                    palette::BLACK
                };
                self.fill_rect(ox + x * scale, oy + y * scale, scale, scale, c);
            }
        }

        /*----- player and facing pointer -------------------------------*/
        let p = sim.player();
        let (px, py) = (ox + to_px(p.pos.x), oy + to_px(p.pos.y));
        self.fill_rect(px - 1, py - 1, 3, 3, palette::ACCENT);

        let dir = p.forward();
        for i in 1..=POINTER_CELLS * POINTER_SAMPLES {
            let w = p.pos + dir * (i as f32 / POINTER_SAMPLES as f32);
            if grid.is_solid(cell_of(w.x), cell_of(w.y)) {
                break;
            }
            self.fill_rect(ox + to_px(w.x), oy + to_px(w.y), 1, 1, palette::ACCENT);
        }

        /*----- entities ------------------------------------------------*/
        let world = sim.world();
        for (_, (pos, e)) in world.query::<(&Position, &Enemy)>().iter() {
            if !e.dead {
                let (x, y) = (ox + to_px(pos.0.x), oy + to_px(pos.0.y));
                self.fill_rect(x - 1, y - 1, 3, 3, e.kind.colors().0);
            }
        }
        for (_, (pos, pk)) in world.query::<(&Position, &Pickup)>().iter() {
            if !pk.taken {
                let (x, y) = (ox + to_px(pos.0.x), oy + to_px(pos.0.y));
                self.fill_rect(x, y, 2, 2, pk.kind.color());
            }
        }
    }
}

/// Walls are only worth showing where they face somewhere the player can go.
fn borders_reachable(grid: &Grid, x: i32, y: i32) -> bool {
    [(1, 0), (-1, 0), (0, 1), (0, -1)]
        .into_iter()
        .any(|(dx, dy)| grid.is_reachable(x + dx, y + dy))
}
