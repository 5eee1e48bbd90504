//! Simulation engine for BASTION.
//!
//! Owns the hecs ECS world, runs towers' weapons and the world systems at a
//! fixed tick rate, and produces `SimSnapshot`s for callers.

pub mod engine;
pub mod locator;
pub mod scenario;
pub mod stats;
pub mod systems;
pub mod variants;
pub mod weapon;
pub mod world_setup;

pub use bastion_core as core;
pub use engine::{SimConfig, SimulationEngine};
