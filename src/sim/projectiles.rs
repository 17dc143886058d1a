//! Projectile spawning and ballistics.
//!
//! Each live projectile is advanced in sub-steps of at most
//! [`PROJECTILE_STEP`]; the first sub-step that would enter a wall removes it,
//! and every accepted sub-step is tested against targets.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use smallvec::SmallVec;
use tracing::debug;

use super::collision::{PROJECTILE_STEP, substeps};
use super::player::Player;
use super::{Curve, Enemy, Position, Projectile, SimEvent};
use crate::config::Config;
use crate::math::dist2;
use crate::world::Grid;

/// Player shots start this far ahead of the eye.
const PLAYER_MUZZLE: f32 = 0.4;
/// Enemy shots start this far ahead of the shooter.
pub const ENEMY_MUZZLE: f32 = 0.3;

pub fn spawn_projectile(world: &mut World, pos: Vec2, proj: Projectile) -> Entity {
    world.spawn((Position(pos), proj))
}

/// Player shot along the facing direction with a random signed curve.
pub fn spawn_player_shot(
    world: &mut World,
    player: &Player,
    cfg: &Config,
    rng: &mut impl Rng,
) -> Entity {
    let dir = player.forward();
    let curve = (cfg.player_curve > 0.0).then(|| Curve {
        angle: rng.random_range(-cfg.player_curve..=cfg.player_curve),
        rate: cfg.curve_rate,
    });
    spawn_projectile(
        world,
        player.pos + dir * PLAYER_MUZZLE,
        Projectile {
            vel: dir * cfg.bullet_speed,
            ttl: cfg.bullet_ttl,
            age: 0.0,
            friendly: true,
            radius: cfg.shot_radius,
            damage: cfg.bullet_damage,
            curve,
            whizzed: false,
        },
    )
}

/// Hostile shot from `from` along unit vector `dir`.
pub fn spawn_enemy_shot(world: &mut World, from: Vec2, dir: Vec2, cfg: &Config) -> Entity {
    spawn_projectile(
        world,
        from + dir * ENEMY_MUZZLE,
        Projectile {
            vel: dir * cfg.enemy_shot_speed,
            ttl: cfg.enemy_shot_ttl,
            age: 0.0,
            friendly: false,
            radius: cfg.shot_radius,
            damage: cfg.enemy_shot_damage,
            curve: None,
            whizzed: false,
        },
    )
}

/* ----------------------------------------------------------------- */
/*  Action queue – enemy damage is applied after the projectile query */
/* ----------------------------------------------------------------- */
enum Action {
    Despawn(Entity),
    Damage { enemy: Entity, dmg: i32 },
}
type Actions = SmallVec<[Action; 8]>;

/// Live enemy as seen by this tick's projectiles.
struct Target {
    entity: Entity,
    pos: Vec2,
    hp: i32,
}

/// Advance every projectile by `dt`. Returns the number of enemies killed.
pub fn advance_projectiles(
    world: &mut World,
    grid: &Grid,
    player: &mut Player,
    cfg: &Config,
    dt: f32,
    events: &mut Vec<SimEvent>,
) -> u32 {
    // enemies do not move during this phase; snapshot them so hits on the
    // same tick see each other's damage
    let mut targets: Vec<Target> = world
        .query_mut::<(&Position, &Enemy)>()
        .into_iter()
        .filter(|(_, (_, e))| !e.dead)
        .map(|(entity, (pos, e))| Target {
            entity,
            pos: pos.0,
            hp: e.hp,
        })
        .collect();

    let mut queue = Actions::new();
    for (entity, (pos, proj)) in world.query_mut::<(&mut Position, &mut Projectile)>() {
        if !step_projectile(grid, &mut targets, player, cfg, dt, pos, proj, &mut queue, events) {
            queue.push(Action::Despawn(entity));
        }
    }

    // side-effect phase
    let mut kills = 0;
    for act in queue {
        match act {
            Action::Despawn(e) => {
                if let Err(err) = world.despawn(e) {
                    debug!(?e, %err, "projectile already removed");
                }
            }
            Action::Damage { enemy, dmg } => {
                let Ok(mut e) = world.get::<&mut Enemy>(enemy) else {
                    continue;
                };
                if e.take_damage(dmg, cfg.hit_flash) {
                    kills += 1;
                    events.push(SimEvent::EnemyKilled {
                        entity: enemy,
                        kind: e.kind,
                    });
                } else {
                    events.push(SimEvent::EnemyHit {
                        entity: enemy,
                        hp: e.hp,
                    });
                }
            }
        }
    }
    kills
}

/// One projectile for one tick. Returns false when it must be removed.
#[allow(clippy::too_many_arguments)]
fn step_projectile(
    grid: &Grid,
    targets: &mut [Target],
    player: &mut Player,
    cfg: &Config,
    dt: f32,
    pos: &mut Position,
    proj: &mut Projectile,
    queue: &mut Actions,
    events: &mut Vec<SimEvent>,
) -> bool {
    proj.ttl -= dt;
    if proj.ttl <= 0.0 {
        return false;
    }

    /* -- 1: lateral drift grows with age ---------------------------- */
    if let Some(c) = proj.curve {
        proj.vel = Vec2::from_angle(c.angle * c.rate * proj.age * dt).rotate(proj.vel);
    }
    proj.age += dt;

    /* -- 2: sub-stepped flight -------------------------------------- */
    let delta = proj.vel * dt;
    let n = substeps(delta, PROJECTILE_STEP);
    let slice = delta / n as f32;
    let hit_r2 = (proj.radius + cfg.target_radius).powi(2);
    let near_r2 = cfg.near_miss_radius * cfg.near_miss_radius;

    for _ in 0..n {
        let next = pos.0 + slice;
        if grid.is_solid_at(next) {
            return false;
        }
        pos.0 = next;

        if proj.friendly {
            // first live enemy in range takes it
            if let Some(t) = targets
                .iter_mut()
                .find(|t| t.hp > 0 && dist2(pos.0, t.pos) < hit_r2)
            {
                t.hp -= proj.damage;
                queue.push(Action::Damage {
                    enemy: t.entity,
                    dmg: proj.damage,
                });
                return false;
            }
        } else {
            let d2 = dist2(pos.0, player.pos);
            if d2 < hit_r2 {
                let dealt = player.hurt(proj.damage as f32);
                events.push(SimEvent::PlayerHurt {
                    amount: dealt,
                    hp: player.hp,
                });
                return false;
            }
            if !proj.whizzed && d2 < near_r2 {
                proj.whizzed = true;
                events.push(SimEvent::NearMiss { pos: pos.0 });
            }
        }
    }
    true
}
