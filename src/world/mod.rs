mod camera;
mod dda;
mod difficulty;
mod grid;
pub mod mapgen;
mod texture;

pub use camera::Camera;
pub use dda::{Dda, MAX_STEPS, RayHit, Side, cast_ray, line_of_sight};
pub use difficulty::{LevelPlan, jitter, scale_for_level};
pub use grid::{Cell, Grid};
pub use mapgen::{EnemySpawn, GenParams, GeneratedLevel, PickupSpawn, Room, generate};
pub use texture::{Texture, TextureError};
