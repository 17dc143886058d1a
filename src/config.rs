//! Every tunable the core consumes.
//!
//! The core never owns or persists settings; callers build a [`Config`]
//! (usually `Config::default()` plus CLI overrides) and pass it through
//! [`Config::validated`] once before handing it to the simulation.

use thiserror::Error;

use crate::defs::EnemyKind;

pub const MIN_FIRE_RATE: f32 = 0.03;
pub const MAX_FIRE_RATE: f32 = 0.5;
pub const MIN_BULLET_SPEED: f32 = 6.0;
pub const MAX_BULLET_SPEED: f32 = 40.0;
pub const MIN_LEVELS: u32 = 1;
pub const MAX_LEVELS: u32 = 10;
pub const MIN_FOV_DEG: f32 = 40.0;
pub const MAX_FOV_DEG: f32 = 120.0;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("room size bounds inverted or empty: min {min}, max {max}")]
    RoomBounds { min: i32, max: i32 },

    /// The smallest map the level roll can produce must still fit the
    /// largest room plus the solid border.
    #[error("minimum map {w}x{h} cannot hold a {need}x{need} room with its border")]
    MapTooSmall { w: i32, h: i32, need: i32 },

    #[error("`{0}` must be positive")]
    NonPositive(&'static str),

    #[error("render size {0}x{1} is degenerate")]
    RenderSize(usize, usize),
}

/// Per-kind enemy numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub hp: i32,
}

/// Map generation and difficulty baselines.
#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
    /// Size at scale 1.0 (the middle level).
    pub max_w: i32,
    pub max_h: i32,
    /// Rolled sizes never go below half of these.
    pub base_w: i32,
    pub base_h: i32,
    pub max_rooms: usize,
    pub room_min: i32,
    pub room_max: i32,
    /// Gap kept between accepted rooms.
    pub room_spacing: i32,
    pub enemy_safe_radius: f32,
    pub pickup_safe_radius: f32,
    pub base_enemies: f32,
    pub base_pickups: f32,
    /// Multiplicative jitter, e.g. 0.30 = ±30 %.
    pub jitter: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            max_w: 64,
            max_h: 48,
            base_w: 32,
            base_h: 28,
            max_rooms: 22,
            room_min: 4,
            room_max: 10,
            room_spacing: 1,
            enemy_safe_radius: 6.0,
            pickup_safe_radius: 3.5,
            base_enemies: 22.0,
            base_pickups: 18.0,
            jitter: 0.30,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /* view */
    pub fov_degrees: f32,
    pub render_width: usize,
    pub render_height: usize,
    pub max_depth: f32,
    pub wall_scale: f32,

    /* player */
    pub move_speed: f32,
    pub sprint_mul: f32,
    pub rot_speed: f32,
    pub mouse_sens: f32,
    pub player_radius: f32,
    pub player_max_hp: f32,
    pub player_start_hp: f32,
    pub player_start_ammo: u32,
    pub medkit_heal: f32,
    pub ammo_pickup: u32,
    pub pickup_radius: f32,

    /* weapon */
    pub fire_rate: f32,
    pub bullet_speed: f32,
    pub bullet_ttl: f32,
    pub bullet_damage: i32,
    pub muzzle_flash: f32,
    /// Largest |curve angle| rolled for a player shot; 0 disables drift.
    pub player_curve: f32,
    pub curve_rate: f32,
    pub shot_radius: f32,
    /// Radius of enemies and the player as seen by projectiles.
    pub target_radius: f32,

    /* enemies */
    pub zombie: EnemyStats,
    pub runner: EnemyStats,
    pub shooter: EnemyStats,
    pub enemy_radius: f32,
    pub touch_dps: f32,
    pub hit_flash: f32,
    pub enemy_shot_cooldown: f32,
    pub enemy_shot_speed: f32,
    pub enemy_shot_damage: i32,
    pub enemy_shot_ttl: f32,
    pub standoff: f32,
    /// Outer edge of the band that triggers a near-miss cue.
    pub near_miss_radius: f32,

    /* levels */
    pub map: MapConfig,
    pub total_levels: u32,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            render_width: 320,
            render_height: 200,
            max_depth: 32.0,
            wall_scale: 1.0,

            move_speed: 3.2,
            sprint_mul: 1.8,
            rot_speed: 2.6,
            mouse_sens: 0.002,
            player_radius: 0.25,
            player_max_hp: 100.0,
            player_start_hp: 85.0,
            player_start_ammo: 360,
            medkit_heal: 25.0,
            ammo_pickup: 32,
            pickup_radius: 0.5,

            fire_rate: 0.08,
            bullet_speed: 22.0,
            bullet_ttl: 1.0,
            bullet_damage: 1,
            muzzle_flash: 0.06,
            player_curve: 0.15,
            curve_rate: 2.0,
            shot_radius: 0.05,
            target_radius: 0.30,

            zombie: EnemyStats { speed: 1.35, hp: 3 },
            runner: EnemyStats { speed: 2.25, hp: 2 },
            shooter: EnemyStats { speed: 1.15, hp: 3 },
            enemy_radius: 0.25,
            touch_dps: 10.0,
            hit_flash: 0.12,
            enemy_shot_cooldown: 1.6,
            enemy_shot_speed: 6.0,
            enemy_shot_damage: 12,
            enemy_shot_ttl: 1.6,
            standoff: 4.5,
            near_miss_radius: 1.0,

            map: MapConfig::default(),
            total_levels: 5,
            seed: None,
        }
    }
}

impl Config {
    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    pub fn stats(&self, kind: EnemyKind) -> EnemyStats {
        match kind {
            EnemyKind::Zombie => self.zombie,
            EnemyKind::Runner => self.runner,
            EnemyKind::Shooter => self.shooter,
        }
    }

    /// Clamp the range-bounded values and reject inconsistent ones.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.fire_rate = self.fire_rate.clamp(MIN_FIRE_RATE, MAX_FIRE_RATE);
        self.bullet_speed = self.bullet_speed.clamp(MIN_BULLET_SPEED, MAX_BULLET_SPEED);
        self.total_levels = self.total_levels.clamp(MIN_LEVELS, MAX_LEVELS);
        self.fov_degrees = self.fov_degrees.clamp(MIN_FOV_DEG, MAX_FOV_DEG);
        self.player_start_hp = self.player_start_hp.min(self.player_max_hp);

        if self.render_width < 2 || self.render_height < 2 {
            return Err(ConfigError::RenderSize(self.render_width, self.render_height));
        }

        let positive = [
            ("max_depth", self.max_depth),
            ("wall_scale", self.wall_scale),
            ("move_speed", self.move_speed),
            ("player_max_hp", self.player_max_hp),
            ("bullet_ttl", self.bullet_ttl),
            ("enemy_radius", self.enemy_radius),
            ("enemy_shot_speed", self.enemy_shot_speed),
            ("enemy_shot_ttl", self.enemy_shot_ttl),
        ];
        for (name, v) in positive {
            if !(v > 0.0) {
                return Err(ConfigError::NonPositive(name));
            }
        }

        let m = &self.map;
        if m.room_min < 1 || m.room_min > m.room_max {
            return Err(ConfigError::RoomBounds {
                min: m.room_min,
                max: m.room_max,
            });
        }
        // the smallest rolled map is half the base size
        let (w, h) = (m.base_w / 2, m.base_h / 2);
        let need = m.room_max + 3;
        if w < need || h < need {
            return Err(ConfigError::MapTooSmall { w, h, need });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validated().is_ok());
    }

    #[test]
    fn ranged_values_are_clamped() {
        let cfg = Config {
            fire_rate: 5.0,
            bullet_speed: 1.0,
            total_levels: 99,
            ..Config::default()
        }
        .validated()
        .unwrap();
        assert_eq!(cfg.fire_rate, MAX_FIRE_RATE);
        assert_eq!(cfg.bullet_speed, MIN_BULLET_SPEED);
        assert_eq!(cfg.total_levels, MAX_LEVELS);
    }

    #[test]
    fn inverted_rooms_rejected() {
        let mut cfg = Config::default();
        cfg.map.room_min = 8;
        cfg.map.room_max = 4;
        assert_eq!(
            cfg.validated().unwrap_err(),
            ConfigError::RoomBounds { min: 8, max: 4 }
        );
    }

    #[test]
    fn tiny_map_rejected() {
        let mut cfg = Config::default();
        cfg.map.base_w = 10;
        assert!(matches!(
            cfg.validated(),
            Err(ConfigError::MapTooSmall { .. })
        ));
    }

    #[test]
    fn zero_speed_rejected() {
        let cfg = Config {
            move_speed: 0.0,
            ..Config::default()
        };
        assert_eq!(
            cfg.validated().unwrap_err(),
            ConfigError::NonPositive("move_speed")
        );
    }
}
