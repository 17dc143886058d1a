use std::time::{Duration, Instant};

use glam::Vec2;
use hecs::{Entity, World};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use super::player::{KILL_SCORE, Player, collect_pickups};
use super::{Enemy, InputCmd, Pickup, Position, Projectile, SimEvent, ai, projectiles};
use crate::config::{Config, ConfigError};
use crate::defs::{EnemyKind, PickupKind};
use crate::world::{GenParams, Grid, LevelPlan, generate};

pub const SIM_FPS: u32 = 60;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    /// Every enemy is dead and another level follows.
    LevelClear,
    GameOver,
    /// Last level cleared.
    Won,
}

/// Progress through the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Session {
    pub level: u32,
    pub total_levels: u32,
    /// Kills on the current level.
    pub defeated: u32,
    pub enemy_total: u32,
}

/// Owns the ECS world, the level grid and the player, and drives every
/// game-logic system at a fixed rate.
pub struct Sim {
    cfg: Config,
    world: World,
    grid: Grid,
    player: Player,
    session: Session,
    state: GameState,
    rng: StdRng,
    events: Vec<SimEvent>,
    last: Instant,
}

impl Sim {
    /// Validate `cfg` and set up level 1 of a fresh run.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        let cfg = cfg.validated()?;
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut sim = Self::empty(cfg, Grid::solid(0, 0), Vec2::ZERO, rng);
        sim.setup_level(1, true);
        Ok(sim)
    }

    /// A simulation over a caller-built grid with no entities. The grid's
    /// reachability is flooded from `spawn`.
    pub fn with_grid(cfg: Config, mut grid: Grid, spawn: Vec2) -> Result<Self, ConfigError> {
        let cfg = cfg.validated()?;
        grid.compute_reachable(spawn.x.floor() as i32, spawn.y.floor() as i32);
        let rng = StdRng::seed_from_u64(cfg.seed.unwrap_or_default());
        Ok(Self::empty(cfg, grid, spawn, rng))
    }

    fn empty(cfg: Config, grid: Grid, spawn: Vec2, rng: StdRng) -> Self {
        Self {
            player: Player::new(spawn, &cfg),
            session: Session {
                level: 1,
                total_levels: cfg.total_levels,
                defeated: 0,
                enemy_total: 0,
            },
            cfg,
            world: World::new(),
            grid,
            state: GameState::Playing,
            rng,
            events: Vec::new(),
            last: Instant::now(),
        }
    }

    /* ---------------------------------------------------------------- */
    /* read-only surface for the renderer and the HUD                    */
    /* ---------------------------------------------------------------- */

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn session(&self) -> Session {
        self.session
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Hand over everything that happened since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain(..)
    }

    /* ---------------------------------------------------------------- */
    /* level lifecycle                                                   */
    /* ---------------------------------------------------------------- */

    /// Build a fresh grid and entity set for `level`. A fresh run also
    /// resets the player's hp, ammo and score; otherwise they carry over.
    pub fn setup_level(&mut self, level: u32, fresh: bool) {
        let level = level.clamp(1, self.cfg.total_levels);
        let plan = LevelPlan::roll(level, self.cfg.total_levels, &self.cfg.map, &mut self.rng);
        let lvl = generate(&GenParams::new(&plan, &self.cfg.map), &mut self.rng);

        self.world.clear();
        self.session = Session {
            level,
            total_levels: self.cfg.total_levels,
            defeated: 0,
            enemy_total: 0,
        };
        for e in &lvl.enemies {
            self.spawn_enemy(e.kind, e.pos);
        }
        for p in &lvl.pickups {
            self.spawn_pickup(p.kind, p.pos);
        }

        if fresh {
            self.player = Player::new(lvl.spawn, &self.cfg);
        } else {
            self.player.respawn(lvl.spawn);
        }
        self.grid = lvl.grid;
        self.state = GameState::Playing;
        self.events.clear();

        info!(
            level,
            w = self.grid.width(),
            h = self.grid.height(),
            rooms = lvl.rooms.len(),
            enemies = lvl.enemies.len(),
            pickups = lvl.pickups.len(),
            "level ready"
        );
    }

    /// Continue after a cleared level. Does nothing in any other state.
    pub fn advance_level(&mut self) {
        if self.state == GameState::LevelClear {
            debug!(from = self.session.level, "advancing level");
            self.setup_level(self.session.level + 1, false);
        }
    }

    /// Start over from level 1 with fresh player stats.
    pub fn reset(&mut self) {
        debug!("run reset");
        self.setup_level(1, true);
    }

    /* ---------------------------------------------------------------- */
    /* spawning                                                          */
    /* ---------------------------------------------------------------- */

    /// Counts towards the current level's enemy total.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> Entity {
        let hp = self.cfg.stats(kind).hp;
        self.session.enemy_total += 1;
        self.world.spawn((Position(pos), Enemy::new(kind, hp)))
    }

    pub fn spawn_pickup(&mut self, kind: PickupKind, pos: Vec2) -> Entity {
        self.world
            .spawn((Position(pos), Pickup { kind, taken: false }))
    }

    pub fn spawn_projectile(&mut self, pos: Vec2, proj: Projectile) -> Entity {
        projectiles::spawn_projectile(&mut self.world, pos, proj)
    }

    /* ---------------------------------------------------------------- */
    /* per-tick entry points                                             */
    /* ---------------------------------------------------------------- */

    /// Turn, then move.
    pub fn advance_player(&mut self, cmd: &InputCmd, dt: f32) {
        self.player.turn(cmd, &self.cfg, dt);
        self.player.walk(&self.grid, cmd, &self.cfg, dt);
    }

    pub fn advance_ai(&mut self, dt: f32) {
        ai::advance_ai(
            &mut self.world,
            &self.grid,
            &mut self.player,
            &self.cfg,
            dt,
            &mut self.events,
        );
    }

    pub fn advance_projectiles(&mut self, dt: f32) {
        let kills = projectiles::advance_projectiles(
            &mut self.world,
            &self.grid,
            &mut self.player,
            &self.cfg,
            dt,
            &mut self.events,
        );
        self.session.defeated += kills;
        self.player.score += kills * KILL_SCORE;
    }

    /// Fire if the weapon is ready and there is ammo. Returns true on a shot.
    pub fn fire_weapon(&mut self) -> bool {
        if self.player.cooldown > 0.0 || self.player.ammo == 0 {
            return false;
        }
        self.player.cooldown = self.cfg.fire_rate;
        self.player.muzzle = self.cfg.muzzle_flash;
        self.player.ammo -= 1;
        projectiles::spawn_player_shot(&mut self.world, &self.player, &self.cfg, &mut self.rng);
        self.events.push(SimEvent::ShotFired {
            friendly: true,
            pos: self.player.pos,
        });
        true
    }

    /// Advance enough tics to catch the simulation up with real time.
    /// Mouse look is applied once, on the first tic. Returns the tic count.
    pub fn pump(&mut self, cmd: &InputCmd) -> u32 {
        let mut cmd = *cmd;
        let mut n = 0;
        while self.last.elapsed() >= TIC {
            self.tick(&cmd, DT);
            cmd.look = 0.0;
            self.last += TIC;
            n += 1;
        }
        n
    }

    /* ---------------------------------------------------------------- */
    /* one fixed-rate game tic                                           */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self, cmd: &InputCmd, dt: f32) {
        if self.state != GameState::Playing {
            return;
        }

        /*----- 1. player timers (enemy timers run in the AI pass) -------*/
        self.player.tick_timers(dt);

        /*----- 2. projectiles, player, weapon, enemies -----------------*/
        self.advance_projectiles(dt);
        self.advance_player(cmd, dt);
        if cmd.fire() {
            self.fire_weapon();
        }
        self.advance_ai(dt);
        collect_pickups(&mut self.world, &mut self.player, &self.cfg, &mut self.events);

        /*----- 3. end conditions ---------------------------------------*/
        if !self.player.alive() {
            info!(level = self.session.level, score = self.player.score, "player died");
            self.state = GameState::GameOver;
            self.events.push(SimEvent::GameOver);
            return;
        }

        let all_dead = self.world.query_mut::<&Enemy>().into_iter().all(|(_, e)| e.dead);
        if all_dead {
            let level = self.session.level;
            self.events.push(SimEvent::LevelCleared { level });
            if level >= self.session.total_levels {
                info!(score = self.player.score, "final level cleared");
                self.state = GameState::Won;
                self.events.push(SimEvent::Won);
            } else {
                info!(level, "level cleared");
                self.state = GameState::LevelClear;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::Buttons;

    fn seeded() -> Config {
        Config {
            seed: Some(42),
            ..Config::default()
        }
    }

    fn arena() -> Sim {
        Sim::with_grid(seeded(), Grid::open(16, 16), Vec2::new(8.5, 8.5)).unwrap()
    }

    #[test]
    fn new_sim_places_player_on_open_reachable_cell() {
        let sim = Sim::new(seeded()).unwrap();
        let p = sim.player().pos;
        assert!(!sim.grid().is_solid_at(p));
        assert!(sim.grid().is_reachable(p.x as i32, p.y as i32));
        assert_eq!(sim.state(), GameState::Playing);
        assert_eq!(sim.session().level, 1);
        assert!(sim.session().enemy_total >= 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = Config {
            max_depth: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            Sim::new(cfg),
            Err(ConfigError::NonPositive("max_depth"))
        ));
    }

    #[test]
    fn fire_respects_cooldown_and_ammo() {
        let mut sim = arena();
        sim.spawn_enemy(EnemyKind::Zombie, Vec2::new(1.5, 1.5));
        let ammo = sim.player().ammo;
        assert!(sim.fire_weapon());
        assert!(!sim.fire_weapon());
        assert_eq!(sim.player().ammo, ammo - 1);

        sim.player_mut().cooldown = 0.0;
        sim.player_mut().ammo = 0;
        assert!(!sim.fire_weapon());
    }

    #[test]
    fn killing_last_enemy_clears_level() {
        let mut sim = arena();
        sim.spawn_enemy(EnemyKind::Runner, Vec2::new(11.5, 8.5));
        let cmd = InputCmd {
            buttons: Buttons::FIRE,
            ..Default::default()
        };
        for _ in 0..120 {
            sim.tick(&cmd, DT);
            if sim.state() != GameState::Playing {
                break;
            }
        }
        assert_ne!(sim.state(), GameState::Playing);
        assert_eq!(sim.session().defeated, 1);
        assert_eq!(sim.player().score, KILL_SCORE);
        let events: Vec<_> = sim.drain_events().collect();
        assert!(events.contains(&SimEvent::LevelCleared { level: 1 }));
    }

    #[test]
    fn last_level_clear_wins() {
        let cfg = Config {
            total_levels: 1,
            ..seeded()
        };
        let mut sim = Sim::with_grid(cfg, Grid::open(8, 8), Vec2::new(4.5, 4.5)).unwrap();
        sim.tick(&InputCmd::default(), DT);
        assert_eq!(sim.state(), GameState::Won);
        // frozen once over
        let p = sim.player().pos;
        sim.tick(
            &InputCmd {
                forward: 1.0,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(sim.player().pos, p);
    }

    #[test]
    fn zero_hp_is_game_over() {
        let mut sim = arena();
        sim.spawn_enemy(EnemyKind::Zombie, Vec2::new(8.7, 8.5));
        sim.player_mut().hp = 0.05;
        sim.tick(&InputCmd::default(), DT);
        assert_eq!(sim.state(), GameState::GameOver);
        assert!(sim.drain_events().any(|e| e == SimEvent::GameOver));
    }

    #[test]
    fn level_transition_keeps_player_stats() {
        let mut sim = Sim::new(seeded()).unwrap();
        sim.player_mut().hp = 40.0;
        sim.player_mut().score = 700;
        sim.state = GameState::LevelClear;
        sim.advance_level();
        assert_eq!(sim.session().level, 2);
        assert_eq!(sim.player().hp, 40.0);
        assert_eq!(sim.player().score, 700);
        assert_eq!(sim.state(), GameState::Playing);

        sim.reset();
        assert_eq!(sim.session().level, 1);
        assert_eq!(sim.player().hp, sim.config().player_start_hp);
        assert_eq!(sim.player().score, 0);
    }

    #[test]
    fn ai_pass_alone_lets_shooters_fire() {
        let mut sim = Sim::with_grid(seeded(), Grid::open(30, 30), Vec2::new(10.5, 15.5)).unwrap();
        sim.spawn_enemy(EnemyKind::Shooter, Vec2::new(15.0, 15.5));
        for _ in 0..600 {
            sim.advance_ai(DT);
        }
        assert!(
            sim.drain_events()
                .any(|e| matches!(e, SimEvent::ShotFired { friendly: false, .. }))
        );
    }

    #[test]
    fn spawned_enemies_count_towards_the_total() {
        let mut sim = arena();
        assert_eq!(sim.session().enemy_total, 0);
        sim.spawn_enemy(EnemyKind::Zombie, Vec2::new(2.5, 2.5));
        sim.spawn_enemy(EnemyKind::Runner, Vec2::new(13.5, 13.5));
        assert_eq!(sim.session().enemy_total, 2);

        let lvl = Sim::new(seeded()).unwrap();
        let alive = lvl.world().query::<&Enemy>().iter().count() as u32;
        assert_eq!(lvl.session().enemy_total, alive);
    }

    #[test]
    fn hit_flash_decays_and_ai_timer_accumulates() {
        let mut sim = arena();
        let e = sim.spawn_enemy(EnemyKind::Shooter, Vec2::new(2.5, 2.5));
        sim.spawn_enemy(EnemyKind::Zombie, Vec2::new(14.5, 14.5));
        if let Ok(mut en) = sim.world.get::<&mut Enemy>(e) {
            en.hit_flash = 0.12;
        }
        sim.tick(&InputCmd::default(), 0.05);
        let en = *sim.world().get::<&Enemy>(e).unwrap();
        assert!((en.hit_flash - 0.07).abs() < 1e-6);
        assert!((en.ai_timer - 0.05).abs() < 1e-6);
    }
}
