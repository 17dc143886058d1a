//! Grid ray caster with a small arena-shooter simulation.
//!
//! * [`world`] – occupancy grid, DDA, camera, procedural levels.
//! * [`sim`] – fixed-rate simulation over a `hecs` world.
//! * [`renderer`] – software column renderer behind the [`renderer::Renderer`] trait.

pub mod config;
pub mod defs;
pub mod math;
pub mod renderer;
pub mod sim;
pub mod world;
