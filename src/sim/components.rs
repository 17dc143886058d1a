use glam::Vec2;

use crate::defs::{Buttons, EnemyKind, PickupKind};

/// World-space position in grid-cell units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub hp: i32,
    /// Spawn HP, for the health bar.
    pub max_hp: i32,
    /// Set exactly once, when `hp` first drops to 0 or below. The entity
    /// stays in the world for the rest of the level.
    pub dead: bool,
    pub hit_flash: f32,
    /// Seconds since the last shot (ranged kinds only read it).
    pub ai_timer: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, hp: i32) -> Self {
        Self {
            kind,
            hp,
            max_hp: hp.max(1),
            dead: false,
            hit_flash: 0.0,
            ai_timer: 0.0,
        }
    }

    /// Subtract `dmg`; returns true on the hit that kills.
    pub fn take_damage(&mut self, dmg: i32, flash: f32) -> bool {
        if self.dead {
            return false;
        }
        self.hp -= dmg;
        self.hit_flash = flash;
        if self.hp <= 0 {
            self.dead = true;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    /// One-way; taken pickups stay in the world but do nothing.
    pub taken: bool,
}

/// Lateral drift: velocity is rotated by `angle * rate * age * dt` each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub angle: f32,
    pub rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub vel: Vec2,
    pub ttl: f32,
    /// Seconds alive so far.
    pub age: f32,
    /// Player-owned when true.
    pub friendly: bool,
    pub radius: f32,
    pub damage: i32,
    pub curve: Option<Curve>,
    /// The near-miss cue fires at most once per projectile.
    pub whizzed: bool,
}

/// One tick worth of player intent, already decoupled from any device.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (left / right)
    pub look: f32,    // mouse X delta, pixels
    pub buttons: Buttons,
}

impl InputCmd {
    #[inline]
    pub fn fire(&self) -> bool {
        self.buttons.contains(Buttons::FIRE)
    }

    #[inline]
    pub fn run(&self) -> bool {
        self.buttons.contains(Buttons::RUN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_transitions_once() {
        let mut e = Enemy::new(EnemyKind::Runner, 2);
        assert!(!e.take_damage(1, 0.12));
        assert_eq!(e.hit_flash, 0.12);
        assert!(e.take_damage(1, 0.12));
        assert!(e.dead);
        // further hits on a corpse change nothing
        assert!(!e.take_damage(5, 0.12));
        assert_eq!(e.hp, 0);
    }

    #[test]
    fn buttons_decode() {
        let cmd = InputCmd {
            buttons: Buttons::FIRE,
            ..Default::default()
        };
        assert!(cmd.fire());
        assert!(!cmd.run());
    }
}
