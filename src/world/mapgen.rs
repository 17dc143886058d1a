//! Room-and-corridor level generator.
//!
//! * Rooms are rejection-sampled against each other with a padding gap.
//! * Every accepted room after the first is joined to its predecessor with a
//!   two-cell-wide L corridor whose leg order is a coin flip.
//! * Enemies and pickups are scattered on empty interior cells outside a
//!   safety radius around the spawn point, at most one entity per cell.

use std::collections::HashSet;

use glam::{IVec2, Vec2, vec2};
use rand::Rng;
use tracing::{debug, warn};

use super::{Cell, Grid, LevelPlan};
use crate::config::MapConfig;
use crate::defs::{EnemyKind, PickupKind};

/// Samples tried per entity before its kind is given up on.
pub const PLACEMENT_ATTEMPTS: usize = 4096;

/// Smallest map edge the generator works with; anything smaller is grown.
const MIN_EDGE: i32 = 5;

const FALLBACK_ROOM: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    #[inline]
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Overlap test with `padding` cells of required gap.
    pub fn intersects(&self, o: &Room, padding: i32) -> bool {
        self.x < o.x + o.w + padding
            && self.x + self.w + padding > o.x
            && self.y < o.y + o.h + padding
            && self.y + self.h + padding > o.y
    }
}

#[derive(Clone, Debug)]
pub struct GenParams {
    pub width: i32,
    pub height: i32,
    pub max_rooms: usize,
    pub room_min: i32,
    pub room_max: i32,
    pub room_spacing: i32,
    pub enemy_safe_radius: f32,
    pub pickup_safe_radius: f32,
    pub enemies: Vec<(EnemyKind, usize)>,
    pub pickups: Vec<(PickupKind, usize)>,
}

impl GenParams {
    pub fn new(plan: &LevelPlan, map: &MapConfig) -> Self {
        Self {
            width: plan.width,
            height: plan.height,
            max_rooms: map.max_rooms,
            room_min: map.room_min,
            room_max: map.room_max,
            room_spacing: map.room_spacing,
            enemy_safe_radius: map.enemy_safe_radius,
            pickup_safe_radius: map.pickup_safe_radius,
            enemies: plan.enemies.clone(),
            pickups: plan.pickups.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub pos: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSpawn {
    pub kind: PickupKind,
    pub pos: Vec2,
}

/// Output of one generator run. `grid` already carries the reachability
/// mask flooded from `spawn`.
#[derive(Clone, Debug)]
pub struct GeneratedLevel {
    pub grid: Grid,
    pub spawn: Vec2,
    pub rooms: Vec<Room>,
    pub enemies: Vec<EnemySpawn>,
    pub pickups: Vec<PickupSpawn>,
    /// True when no random room fit and the fixed layout was carved.
    pub fallback: bool,
}

pub fn generate(params: &GenParams, rng: &mut impl Rng) -> GeneratedLevel {
    let w = params.width.max(MIN_EDGE);
    let h = params.height.max(MIN_EDGE);
    let mut grid = Grid::solid(w, h);

    /*----------- 1. rooms + corridors ------------------------------*/
    let mut rooms: Vec<Room> = Vec::with_capacity(params.max_rooms);
    let (lo, hi) = (params.room_min.max(1), params.room_max.max(params.room_min.max(1)));

    for _ in 0..params.max_rooms * 3 {
        if rooms.len() >= params.max_rooms {
            break;
        }
        let rw = rng.random_range(lo..=hi);
        let rh = rng.random_range(lo..=hi);
        if w - rw - 2 < 1 || h - rh - 2 < 1 {
            continue; // room cannot fit inside the border
        }
        let rc = Room {
            x: rng.random_range(1..=w - rw - 2),
            y: rng.random_range(1..=h - rh - 2),
            w: rw,
            h: rh,
        };
        if rooms.iter().any(|o| rc.intersects(o, params.room_spacing)) {
            continue;
        }
        dig_room(&mut grid, rc);

        if let Some(prev) = rooms.last() {
            let (x1, y1) = prev.center();
            let (x2, y2) = rc.center();
            if rng.random_bool(0.5) {
                dig_h2(&mut grid, x1, x2, y1);
                dig_v2(&mut grid, y1, y2, x2);
            } else {
                dig_v2(&mut grid, y1, y2, x1);
                dig_h2(&mut grid, x1, x2, y2);
            }
        }
        rooms.push(rc);
    }

    /*----------- 2. degenerate fallback ----------------------------*/
    let fallback = rooms.is_empty();
    if fallback {
        debug!(w, h, "no room placed, carving fallback layout");
        let r = Room {
            x: ((w - FALLBACK_ROOM) / 2).max(1),
            y: ((h - FALLBACK_ROOM) / 2).max(1),
            w: FALLBACK_ROOM,
            h: FALLBACK_ROOM,
        };
        dig_room(&mut grid, r);
        let (cx, cy) = r.center();
        dig_h2(&mut grid, 2, w - 3, cy);
        dig_v2(&mut grid, 2, h - 3, cx);
        rooms.push(r);
    }

    let (sx, sy) = rooms[0].center();
    let spawn = vec2(sx as f32 + 0.5, sy as f32 + 0.5);
    grid.compute_reachable(sx, sy);

    /*----------- 3. entity scatter ---------------------------------*/
    let mut taken = HashSet::new();
    let mut enemies = Vec::new();
    for &(kind, count) in &params.enemies {
        scatter(&grid, spawn, params.enemy_safe_radius, count, &mut taken, rng, |pos| {
            enemies.push(EnemySpawn { kind, pos })
        });
    }
    let mut pickups = Vec::new();
    for &(kind, count) in &params.pickups {
        scatter(&grid, spawn, params.pickup_safe_radius, count, &mut taken, rng, |pos| {
            pickups.push(PickupSpawn { kind, pos })
        });
    }

    GeneratedLevel {
        grid,
        spawn,
        rooms,
        enemies,
        pickups,
        fallback,
    }
}

/// Rejection-sample `count` free interior cells at least `radius` from
/// `spawn`. Stops early (with a warning) once one entity exhausts
/// [`PLACEMENT_ATTEMPTS`]; returns how many were placed.
fn scatter(
    grid: &Grid,
    spawn: Vec2,
    radius: f32,
    count: usize,
    taken: &mut HashSet<IVec2>,
    rng: &mut impl Rng,
    mut place: impl FnMut(Vec2),
) -> usize {
    let (w, h) = (grid.width(), grid.height());
    if w < 3 || h < 3 {
        return 0;
    }
    let mut placed = 0;
    'entity: while placed < count {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let x = rng.random_range(1..w - 1);
            let y = rng.random_range(1..h - 1);
            if grid.cell(x, y) != Cell::Empty || taken.contains(&IVec2::new(x, y)) {
                continue;
            }
            let pos = vec2(x as f32 + 0.5, y as f32 + 0.5);
            if pos.distance(spawn) < radius {
                continue;
            }
            taken.insert(IVec2::new(x, y));
            place(pos);
            placed += 1;
            continue 'entity;
        }
        warn!(placed, count, radius, "spawn placement exhausted, placing fewer");
        break;
    }
    placed
}

fn dig_room(grid: &mut Grid, r: Room) {
    let (w, h) = (grid.width(), grid.height());
    for y in r.y..r.y + r.h {
        for x in r.x..r.x + r.w {
            if x > 0 && y > 0 && x < w - 1 && y < h - 1 {
                grid.set(x, y, Cell::Empty);
            }
        }
    }
}

#[inline]
fn interior(v: i32, edge: i32) -> bool {
    v > 0 && v < edge - 1
}

/// Two-cell-wide horizontal corridor on rows `y` and `y+1`
/// (or `y-1` when `y+1` is the border).
fn dig_h2(grid: &mut Grid, x1: i32, x2: i32, y: i32) {
    let (w, h) = (grid.width(), grid.height());
    let (x1, x2) = (x1.min(x2), x1.max(x2));
    for x in x1..=x2 {
        if !interior(x, w) {
            continue;
        }
        if interior(y, h) {
            grid.set(x, y, Cell::Empty);
        }
        if interior(y + 1, h) {
            grid.set(x, y + 1, Cell::Empty);
        } else if interior(y - 1, h) {
            grid.set(x, y - 1, Cell::Empty);
        }
    }
}

/// Vertical counterpart of [`dig_h2`] on columns `x` and `x+1`.
fn dig_v2(grid: &mut Grid, y1: i32, y2: i32, x: i32) {
    let (w, h) = (grid.width(), grid.height());
    let (y1, y2) = (y1.min(y2), y1.max(y2));
    for y in y1..=y2 {
        if !interior(y, h) {
            continue;
        }
        if interior(x, w) {
            grid.set(x, y, Cell::Empty);
        }
        if interior(x + 1, w) {
            grid.set(x + 1, y, Cell::Empty);
        } else if interior(x - 1, w) {
            grid.set(x - 1, y, Cell::Empty);
        }
    }
}
