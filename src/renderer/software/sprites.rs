use glam::Vec2;

use super::Software;
use crate::defs::{EnemyKind, PickupKind};
use crate::math::{clamp01, wrap_pi};
use crate::renderer::{Rgba, palette, shade};
use crate::sim::{Enemy, Pickup, Position, Projectile, Sim};
use crate::world::Camera;

/// Apparent height at distance 1, as a fraction of the screen height.
const ENEMY_SCALE: f32 = 0.55;
const PICKUP_SCALE: f32 = 0.35;
const SHOT_SCALE: f32 = 0.2;
/// Head share of an enemy's height.
const HEAD: f32 = 0.3;
/// Edge columns are darkened to outline the block.
const EDGE_SHADE: f32 = 0.55;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpriteKind {
    Enemy {
        kind: EnemyKind,
        flash: bool,
        hp: i32,
        max_hp: i32,
    },
    Pickup(PickupKind),
    Shot {
        friendly: bool,
    },
}

/// One sprite that survived culling this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisSprite {
    pub kind: SpriteKind,
    /// Euclidean distance from the eye, for ordering and size.
    pub dist: f32,
    /// Distance along the view direction, comparable with the depth buffer.
    pub depth: f32,
    /// Screen column of the sprite's centre.
    pub screen_x: i32,
}

/// Project `pos` against the camera into `(distance, view depth, column)`.
/// `None` if it sits on the eye or outside the half field of view.
pub fn project(cam: Camera, pos: Vec2, width: usize) -> Option<(f32, f32, i32)> {
    let d = pos - cam.pos();
    let dist = d.length();
    if dist <= 1e-3 {
        return None;
    }
    let ang = wrap_pi(d.y.atan2(d.x) - cam.yaw());
    if ang.abs() > cam.fov() * 0.5 {
        return None;
    }
    Some((dist, dist * ang.cos(), cam.offset_to_column(ang, width)))
}

impl Software {
    /// Gather live enemies, untaken pickups and projectiles, far to near.
    pub(super) fn collect_sprites(&mut self, sim: &Sim, cam: Camera) {
        let w = self.width;
        let world = sim.world();
        let push = |pos: Vec2, kind: SpriteKind, out: &mut Vec<VisSprite>| {
            if let Some((dist, depth, screen_x)) = project(cam, pos, w) {
                out.push(VisSprite {
                    kind,
                    dist,
                    depth,
                    screen_x,
                });
            }
        };

        for (_, (pos, e)) in world.query::<(&Position, &Enemy)>().iter() {
            if e.dead {
                continue;
            }
            let kind = SpriteKind::Enemy {
                kind: e.kind,
                flash: e.hit_flash > 0.0,
                hp: e.hp,
                max_hp: e.max_hp,
            };
            push(pos.0, kind, &mut self.sprites);
        }
        for (_, (pos, pk)) in world.query::<(&Position, &Pickup)>().iter() {
            if !pk.taken {
                push(pos.0, SpriteKind::Pickup(pk.kind), &mut self.sprites);
            }
        }
        for (_, (pos, pr)) in world.query::<(&Position, &Projectile)>().iter() {
            let kind = SpriteKind::Shot {
                friendly: pr.friendly,
            };
            push(pos.0, kind, &mut self.sprites);
        }

        // painter's order
        self.sprites.sort_by(|a, b| b.dist.total_cmp(&a.dist));
    }

    pub(super) fn draw_sprites(&mut self) {
        let sprites = std::mem::take(&mut self.sprites);
        for s in &sprites {
            match s.kind {
                SpriteKind::Enemy {
                    kind,
                    flash,
                    hp,
                    max_hp,
                } => self.draw_enemy(s, kind, flash, hp, max_hp),
                SpriteKind::Pickup(kind) => self.draw_pickup(s, kind),
                SpriteKind::Shot { friendly } => self.draw_shot(s, friendly),
            }
        }
        self.sprites = sprites;
    }

    /// Depth test against the wall buffer.
    #[inline]
    fn column_visible(&self, x: i32, depth: f32) -> bool {
        depth <= self.zbuf[x as usize]
    }

    /// Clamp a column span to the screen; `None` if nothing is left.
    fn span(&self, from: i32, to: i32) -> Option<(i32, i32)> {
        let x0 = from.max(0);
        let x1 = to.min(self.width as i32 - 1);
        (x0 <= x1).then_some((x0, x1))
    }

    #[inline]
    fn apparent(&self, dist: f32, scale: f32, min: i32) -> i32 {
        ((self.height as f32 / dist * scale).min((1 << 20) as f32) as i32).max(min)
    }

    fn draw_enemy(&mut self, s: &VisSprite, kind: EnemyKind, flash: bool, hp: i32, max_hp: i32) {
        let size = self.apparent(s.dist, ENEMY_SCALE, 2);
        let Some((x0, x1)) = self.span(s.screen_x - size / 3, s.screen_x + size / 3) else {
            return;
        };
        let (body, head) = if flash {
            (palette::WHITE, palette::WHITE)
        } else {
            kind.colors()
        };
        let top = self.height as i32 / 2 - size / 2;
        let head_h = (size as f32 * HEAD) as i32;

        let mut any_visible = false;
        for x in x0..=x1 {
            if !self.column_visible(x, s.depth) {
                continue;
            }
            any_visible = true;
            let edge = x == x0 || x == x1;
            let tone = |c: Rgba| if edge { shade(c, EDGE_SHADE) } else { c };
            self.vline(x, top, top + head_h, tone(head));
            self.vline(x, top + head_h, top + size, tone(body));
        }

        /* health bar: only over a sprite that is actually on screen */
        if !any_visible {
            return;
        }
        let max_hp = max_hp.max(1);
        let bar_w = (x1 - x0 + 1).max(6);
        let bar_y = top - 4;
        let fill = (bar_w as f32 * clamp01(hp as f32 / max_hp as f32)) as i32;
        let col = if hp >= (max_hp + 1) / 2 {
            palette::GREEN
        } else if hp > 1 {
            palette::YELLOW
        } else {
            palette::RED
        };
        for i in 0..bar_w {
            let x = x0 + i;
            if x >= self.width as i32 || !self.column_visible(x, s.depth) {
                continue;
            }
            self.vline(x, bar_y, bar_y + 2, if i < fill { col } else { palette::BLACK });
        }
    }

    fn draw_pickup(&mut self, s: &VisSprite, kind: PickupKind) {
        let size = self.apparent(s.dist, PICKUP_SCALE, 1);
        let Some((x0, x1)) = self.span(s.screen_x - size / 2, s.screen_x + size / 2) else {
            return;
        };
        let top = self.height as i32 / 2 - size / 2;
        let c = kind.color();
        for x in x0..=x1 {
            if !self.column_visible(x, s.depth) {
                continue;
            }
            let edge = x == x0 || x == x1;
            self.vline(x, top, top + size, if edge { shade(c, EDGE_SHADE) } else { c });
            // medkits carry a white band across the middle
            if kind == PickupKind::Medkit && !edge && size >= 6 {
                let band = size / 3;
                self.vline(x, top + band, top + 2 * band, palette::WHITE);
            }
        }
    }

    fn draw_shot(&mut self, s: &VisSprite, friendly: bool) {
        let size = self.apparent(s.dist, SHOT_SCALE, 1);
        let Some((x0, x1)) = self.span(s.screen_x - 1, s.screen_x + 1) else {
            return;
        };
        let top = self.height as i32 / 2 - size / 2;
        let c = if friendly { palette::YELLOW } else { palette::RED };
        for x in x0..=x1 {
            if self.column_visible(x, s.depth) {
                self.vline(x, top, top + size, c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::renderer::Renderer;
    use crate::world::Grid;
    use std::f32::consts::FRAC_PI_2;

    fn enemy_at(dist: f32, screen_x: i32) -> VisSprite {
        VisSprite {
            kind: SpriteKind::Enemy {
                kind: EnemyKind::Zombie,
                flash: false,
                hp: 3,
                max_hp: 3,
            },
            dist,
            depth: dist,
            screen_x,
        }
    }

    #[test]
    fn projection_centres_and_culls() {
        let cam = Camera::new(Vec2::ZERO, 0.0, FRAC_PI_2);
        let (d, depth, x) = project(cam, Vec2::new(4.0, 0.0), 320).unwrap();
        assert!((d - 4.0).abs() < 1e-6);
        assert!((depth - 4.0).abs() < 1e-6);
        assert_eq!(x, 160);
        // behind and far to the side
        assert!(project(cam, Vec2::new(-4.0, 0.0), 320).is_none());
        assert!(project(cam, Vec2::new(1.0, 3.0), 320).is_none());
        // on the eye
        assert!(project(cam, Vec2::new(0.0, 0.0005), 320).is_none());
        // +Y is screen right
        let (d, depth, right) = project(cam, Vec2::new(4.0, 1.0), 320).unwrap();
        assert!(right > 160);
        // off-axis: view depth is the forward component only
        assert!((depth - 4.0).abs() < 1e-5);
        assert!(d > depth);
    }

    #[test]
    fn occluded_columns_are_never_drawn() {
        let mut sw = Software::default();
        sw.begin_frame(64, 40);
        // wall at depth 2 on the left half, far on the right half
        for x in 0..64 {
            sw.zbuf[x] = if x < 32 { 2.0 } else { 50.0 };
        }
        sw.sprites.push(enemy_at(3.0, 32));
        sw.draw_sprites();

        for x in 0..64usize {
            let drawn = (0..40).any(|y| sw.pixel(x, y) != 0);
            if x < 32 {
                assert!(!drawn, "column {x} drawn behind a wall");
            }
        }
        assert!((0..40).any(|y| sw.pixel(33, y) != 0));
    }

    #[test]
    fn fully_hidden_enemy_has_no_health_bar() {
        let mut sw = Software::default();
        sw.begin_frame(64, 40);
        sw.zbuf.fill(1.0);
        sw.sprites.push(enemy_at(3.0, 32));
        sw.draw_sprites();
        assert!(sw.frame().iter().all(|&p| p == 0));
    }

    #[test]
    fn nearer_sprite_wins() {
        let cfg = Config {
            seed: Some(3),
            ..Config::default()
        };
        let mut sim = Sim::with_grid(cfg, Grid::open(30, 10), Vec2::new(2.5, 5.5)).unwrap();
        sim.spawn_enemy(EnemyKind::Runner, Vec2::new(4.5, 5.5));
        sim.spawn_enemy(EnemyKind::Shooter, Vec2::new(9.5, 5.5));

        let mut sw = Software::default();
        sw.begin_frame(64, 40);
        sw.draw_scene(&sim);
        assert_eq!(sw.sprites.len(), 2);
        assert!(sw.sprites[0].dist > sw.sprites[1].dist);
        // centre column shows the runner's body, not the shooter behind it
        let (runner_body, _) = EnemyKind::Runner.colors();
        assert_eq!(sw.pixel(32, 24), runner_body);
    }

    #[test]
    fn sprite_in_front_of_a_wall_near_the_view_edge_is_drawn() {
        let cfg = Config {
            seed: Some(5),
            ..Config::default()
        };
        let eye = Vec2::new(5.0, 5.5);
        let mut sim = Sim::with_grid(cfg, Grid::open(10, 10), eye).unwrap();
        // 33° right of the view axis, a quarter cell short of the east wall
        let ahead = 4.75;
        let pos = Vec2::new(eye.x + ahead, eye.y + ahead * 33f32.to_radians().tan());
        sim.spawn_enemy(EnemyKind::Shooter, pos);

        let mut sw = Software::default();
        sw.begin_frame(320, 200);
        sw.draw_scene(&sim);

        assert_eq!(sw.sprites.len(), 1);
        let s = sw.sprites[0];
        assert!(s.dist > sw.zbuf()[s.screen_x as usize]);
        assert!(s.depth < sw.zbuf()[s.screen_x as usize]);

        let (body, head) = EnemyKind::Shooter.colors();
        let drawn = (s.screen_x - 4..=s.screen_x + 4)
            .flat_map(|x| (0..200).map(move |y| (x as usize, y)))
            .filter(|&(x, y)| {
                let c = sw.pixel(x, y);
                c == body || c == head
            })
            .count();
        assert!(drawn > 0, "sprite culled by the wall behind it");
    }
}
