//! Per-tick enemy behaviour.
//!
//! The behaviour set is closed: every [`EnemyKind`] maps onto one
//! [`Behavior`] variant and a single `match` drives it.

use glam::Vec2;
use hecs::World;
use smallvec::SmallVec;

use super::collision::sweep_circle;
use super::player::Player;
use super::projectiles::spawn_enemy_shot;
use super::{Enemy, Position, SimEvent};
use crate::config::Config;
use crate::defs::EnemyKind;
use crate::math::dist2;
use crate::world::{Grid, line_of_sight};

/// Proportional gain on the stand-off error.
const STANDOFF_GAIN: f32 = 0.7;
/// Radial speed factor limit.
const STANDOFF_CLAMP: f32 = 1.5;
/// Constant sideways component while holding range.
const STRAFE: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    /// Walk straight at the player, hurt on contact.
    Seeker { speed: f32 },
    /// Hold `standoff` distance while circling, shoot every `cooldown`
    /// seconds when the player is in sight.
    Strafer {
        speed: f32,
        standoff: f32,
        cooldown: f32,
    },
}

impl Behavior {
    pub fn for_kind(kind: EnemyKind, cfg: &Config) -> Self {
        let speed = cfg.stats(kind).speed;
        match kind {
            EnemyKind::Zombie | EnemyKind::Runner => Behavior::Seeker { speed },
            EnemyKind::Shooter => Behavior::Strafer {
                speed,
                standoff: cfg.standoff,
                cooldown: cfg.enemy_shot_cooldown,
            },
        }
    }
}

/* ----------------------------------------------------------------- */
/*  Action queue – spawning shots needs the world the query borrows   */
/* ----------------------------------------------------------------- */
enum Action {
    Fire { from: Vec2, dir: Vec2 },
    Touch,
}
type Actions = SmallVec<[Action; 2]>;

/// Step for a seeker: unit vector to the player times `speed * dt`.
pub fn seek(from: Vec2, target: Vec2, speed: f32, dt: f32) -> Vec2 {
    let d = target - from;
    let len = d.length();
    if len < 1e-6 {
        return Vec2::ZERO;
    }
    d / len * speed * dt
}

/// Step for a strafer: clamped radial correction plus a constant lateral
/// component (rotated +90° from the line to the player).
pub fn strafe(from: Vec2, target: Vec2, speed: f32, standoff: f32, dt: f32) -> Vec2 {
    let d = target - from;
    let dist = d.length();
    let dir = d / (dist + 1e-6);
    let radial = ((dist - standoff) * STANDOFF_GAIN).clamp(-STANDOFF_CLAMP, STANDOFF_CLAMP);
    (dir * radial + dir.perp() * STRAFE) * speed * dt
}

/// Move every live enemy and resolve contact damage and ranged fire.
pub fn advance_ai(
    world: &mut World,
    grid: &Grid,
    player: &mut Player,
    cfg: &Config,
    dt: f32,
    events: &mut Vec<SimEvent>,
) {
    let mut queue = Actions::new();
    let contact = cfg.enemy_radius + cfg.player_radius;

    for (_, (pos, enemy)) in world.query_mut::<(&mut Position, &mut Enemy)>() {
        enemy.hit_flash = (enemy.hit_flash - dt).max(0.0);
        if enemy.dead {
            continue;
        }
        queue.extend(think(grid, player.pos, cfg, contact, dt, pos, enemy));
    }

    // side-effect phase
    for act in queue {
        match act {
            Action::Fire { from, dir } => {
                spawn_enemy_shot(world, from, dir, cfg);
                events.push(SimEvent::ShotFired {
                    friendly: false,
                    pos: from,
                });
            }
            Action::Touch => {
                let dealt = player.hurt(cfg.touch_dps * dt);
                if dealt > 0.0 {
                    events.push(SimEvent::PlayerHurt {
                        amount: dealt,
                        hp: player.hp,
                    });
                }
            }
        }
    }
}

fn think(
    grid: &Grid,
    target: Vec2,
    cfg: &Config,
    contact: f32,
    dt: f32,
    pos: &mut Position,
    enemy: &mut Enemy,
) -> Actions {
    let mut acts = Actions::new();

    match Behavior::for_kind(enemy.kind, cfg) {
        Behavior::Seeker { speed } => {
            let step = seek(pos.0, target, speed, dt);
            pos.0 = sweep_circle(grid, pos.0, step, cfg.enemy_radius);
            if dist2(pos.0, target) < contact * contact {
                acts.push(Action::Touch);
            }
        }
        Behavior::Strafer {
            speed,
            standoff,
            cooldown,
        } => {
            let step = strafe(pos.0, target, speed, standoff, dt);
            pos.0 = sweep_circle(grid, pos.0, step, cfg.enemy_radius);

            enemy.ai_timer += dt;
            if enemy.ai_timer >= cooldown && line_of_sight(grid, pos.0, target) {
                enemy.ai_timer = 0.0;
                let d = target - pos.0;
                let dir = d / (d.length() + 1e-6);
                acts.push(Action::Fire { from: pos.0, dir });
            }
        }
    }
    acts
}
