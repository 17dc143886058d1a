mod ai;
pub mod collision;
mod components;
mod events;
mod player;
mod projectiles;
mod tic;

pub use ai::{Behavior, seek, strafe};
pub use components::{Curve, Enemy, InputCmd, Pickup, Position, Projectile};
pub use events::SimEvent;
pub use player::{KILL_SCORE, Player};
pub use tic::{DT, GameState, SIM_FPS, Session, Sim};
