use glam::Vec2;
use hecs::World;

use super::collision::slide_move;
use super::{InputCmd, Pickup, Position, SimEvent};
use crate::config::Config;
use crate::defs::PickupKind;
use crate::math::{dist2, normalize_angle};
use crate::world::{Camera, Grid};

/// Points awarded per kill.
pub const KILL_SCORE: u32 = 100;

/// The single player. Not an ECS entity: everything queries it by value.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Facing, radians in `[0, 2π)`; 0 = +X.
    pub angle: f32,
    /// Continuous so per-tick touch damage accumulates.
    pub hp: f32,
    pub ammo: u32,
    /// Seconds until the weapon may fire again.
    pub cooldown: f32,
    /// Muzzle flash time left, for the HUD.
    pub muzzle: f32,
    pub score: u32,
}

impl Player {
    pub fn new(pos: Vec2, cfg: &Config) -> Self {
        Self {
            pos,
            angle: 0.0,
            hp: cfg.player_start_hp,
            ammo: cfg.player_start_ammo,
            cooldown: 0.0,
            muzzle: 0.0,
            score: 0,
        }
    }

    /// Put the player at a new level's spawn, keeping hp / ammo / score.
    pub fn respawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.angle = 0.0;
        self.cooldown = 0.0;
        self.muzzle = 0.0;
    }

    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    #[inline]
    pub fn camera(&self, fov: f32) -> Camera {
        Camera::new(self.pos, self.angle, fov)
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Apply `amount` damage, flooring hp at 0. Returns what was removed.
    pub fn hurt(&mut self, amount: f32) -> f32 {
        let before = self.hp;
        self.hp = (self.hp - amount).max(0.0);
        before - self.hp
    }

    pub fn tick_timers(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.muzzle = (self.muzzle - dt).max(0.0);
    }

    /// Mouse delta first, then the turn keys.
    pub fn turn(&mut self, cmd: &InputCmd, cfg: &Config, dt: f32) {
        self.angle += cmd.look * cfg.mouse_sens;
        self.angle += cmd.turn * cfg.rot_speed * dt;
        self.angle = normalize_angle(self.angle);
    }

    /// Forward / strafe intent rotated into world space, normalised so
    /// diagonals are not faster, then slid against the grid.
    pub fn walk(&mut self, grid: &Grid, cmd: &InputCmd, cfg: &Config, dt: f32) {
        let intent = Vec2::new(cmd.forward, cmd.strafe);
        if intent == Vec2::ZERO {
            return;
        }
        let intent = intent.normalize_or_zero();
        let fwd = self.forward();
        let right = fwd.perp();
        let speed = if cmd.run() {
            cfg.move_speed * cfg.sprint_mul
        } else {
            cfg.move_speed
        };
        let delta = (fwd * intent.x + right * intent.y) * speed * dt;
        self.pos = slide_move(grid, self.pos, delta);
    }
}

/// Consume every untaken pickup within `pickup_radius` of the player.
///
/// Medkits are left on the floor while the player is at full health;
/// ammo is always taken.
pub fn collect_pickups(
    world: &mut World,
    player: &mut Player,
    cfg: &Config,
    events: &mut Vec<SimEvent>,
) {
    let r2 = cfg.pickup_radius * cfg.pickup_radius;
    for (_, (pos, pk)) in world.query_mut::<(&Position, &mut Pickup)>() {
        if pk.taken || dist2(pos.0, player.pos) >= r2 {
            continue;
        }
        match pk.kind {
            PickupKind::Medkit => {
                if player.hp >= cfg.player_max_hp {
                    continue;
                }
                player.hp = (player.hp + cfg.medkit_heal).min(cfg.player_max_hp);
            }
            PickupKind::Ammo => player.ammo += cfg.ammo_pickup,
        }
        pk.taken = true;
        events.push(SimEvent::PickupTaken { kind: pk.kind });
    }
}
