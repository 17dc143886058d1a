//! Playable window around the simulation and the software renderer.
//!
//! ```bash
//! cargo run --release -- --seed 7 --levels 3
//! RUST_LOG=gridcaster=debug cargo run --release
//! ```
//!
//! W/S move, A/D strafe, ←/→ or mouse turn, Shift sprint, Space/Ctrl or left
//! mouse fire, M minimap, Enter continue / restart, Esc quit.

use std::time::{Duration, Instant};

use clap::Parser;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gridcaster::{
    config::Config,
    defs::Buttons,
    renderer::{RendererExt, Software},
    sim::{GameState, InputCmd, Sim, SimEvent},
};

const WIN_W: usize = 960;
const WIN_H: usize = 600;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Levels in a run
    #[arg(long, default_value_t = 5)]
    levels: u32,

    /// Horizontal field of view, degrees
    #[arg(long, default_value_t = 75.0)]
    fov: f32,

    /// Seconds between shots
    #[arg(long, default_value_t = 0.08)]
    fire_rate: f32,

    /// Player projectile speed, cells per second
    #[arg(long, default_value_t = 22.0)]
    bullet_speed: f32,

    /// Internal render width
    #[arg(long, default_value_t = 320)]
    width: usize,

    /// Internal render height
    #[arg(long, default_value_t = 200)]
    height: usize,

    /// Start with the minimap shown
    #[arg(long)]
    minimap: bool,
}

impl Opts {
    fn config(&self) -> Config {
        Config {
            seed: self.seed,
            total_levels: self.levels,
            fov_degrees: self.fov,
            fire_rate: self.fire_rate,
            bullet_speed: self.bullet_speed,
            render_width: self.width,
            render_height: self.height,
            ..Config::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    let mut sim = Sim::new(opts.config())?;
    let (rw, rh) = (sim.config().render_width, sim.config().render_height);

    let mut renderer = Software::default();
    renderer.show_minimap = opts.minimap;

    let mut win = Window::new(
        "gridcaster",
        WIN_W,
        WIN_H,
        WindowOptions {
            resize: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(60);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    let mut last_mouse_x: Option<f32> = None;
    let mut kills = 0u32;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* --------------- build one InputCmd per frame --------------------- */
        let mut cmd = InputCmd::default();
        if win.is_key_down(Key::W) || win.is_key_down(Key::Up) {
            cmd.forward += 1.0;
        }
        if win.is_key_down(Key::S) || win.is_key_down(Key::Down) {
            cmd.forward -= 1.0;
        }
        if win.is_key_down(Key::A) {
            cmd.strafe -= 1.0;
        }
        if win.is_key_down(Key::D) {
            cmd.strafe += 1.0;
        }
        if win.is_key_down(Key::Left) {
            cmd.turn -= 1.0;
        }
        if win.is_key_down(Key::Right) {
            cmd.turn += 1.0;
        }

        if let Some((mx, _)) = win.get_mouse_pos(MouseMode::Pass) {
            if let Some(prev) = last_mouse_x {
                cmd.look = mx - prev;
            }
            last_mouse_x = Some(mx);
        }

        if win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift) {
            cmd.buttons |= Buttons::RUN;
        }
        if win.is_key_down(Key::Space)
            || win.is_key_down(Key::LeftCtrl)
            || win.is_key_down(Key::RightCtrl)
            || win.get_mouse_down(MouseButton::Left)
        {
            cmd.buttons |= Buttons::FIRE;
        }

        /* toggles & state transitions ------------------------------------- */
        if win.is_key_pressed(Key::M, KeyRepeat::No) {
            renderer.show_minimap = !renderer.show_minimap;
        }
        if win.is_key_pressed(Key::Enter, KeyRepeat::No) {
            match sim.state() {
                GameState::LevelClear => sim.advance_level(),
                GameState::GameOver | GameState::Won => {
                    kills = 0;
                    sim.reset();
                }
                GameState::Playing => {}
            }
        }

        sim.pump(&cmd);

        for ev in sim.drain_events() {
            match ev {
                SimEvent::EnemyKilled { kind, .. } => {
                    kills += 1;
                    debug!(?kind, "enemy down");
                }
                SimEvent::PickupTaken { kind } => debug!(?kind, "pickup"),
                SimEvent::LevelCleared { level } => info!(level, "press Enter to continue"),
                SimEvent::GameOver => info!("game over, press Enter to restart"),
                SimEvent::Won => info!("all levels cleared"),
                _ => {}
            }
        }

        /* draw ------------------------------------------------------------ */
        let mut present = Ok(());
        renderer.draw_frame(rw, rh, &sim, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            present = win.update_with_buffer(fb, w, h);
        });
        present?;

        win.set_title(&hud(&sim, kills));

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!("avg frame: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/// Window-title status line.
fn hud(sim: &Sim, kills: u32) -> String {
    let p = sim.player();
    let s = sim.session();
    let status = match sim.state() {
        GameState::Playing => "",
        GameState::LevelClear => "  |  LEVEL CLEAR - Enter",
        GameState::GameOver => "  |  GAME OVER - Enter",
        GameState::Won => "  |  YOU WIN - Enter",
    };
    format!(
        "HP {:.0}  AMMO {}  LEVEL {}/{}  KILLS {}/{}  SCORE {}  (total {}){}",
        p.hp.ceil(),
        p.ammo,
        s.level,
        s.total_levels,
        s.defeated,
        s.enemy_total,
        p.score,
        kills,
        status
    )
}
