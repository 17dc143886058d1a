use glam::Vec2;
use hecs::Entity;

use crate::defs::{EnemyKind, PickupKind};

/// Things that happened during a tick, for audio / HUD collaborators.
///
/// The queue is filled by [`crate::sim::Sim::tick`] and emptied by
/// [`crate::sim::Sim::drain_events`]; nothing inside the simulation reads it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimEvent {
    ShotFired { friendly: bool, pos: Vec2 },
    EnemyHit { entity: Entity, hp: i32 },
    EnemyKilled { entity: Entity, kind: EnemyKind },
    PlayerHurt { amount: f32, hp: f32 },
    PickupTaken { kind: PickupKind },
    /// A hostile shot passed close to the player without hitting.
    NearMiss { pos: Vec2 },
    LevelCleared { level: u32 },
    GameOver,
    Won,
}
