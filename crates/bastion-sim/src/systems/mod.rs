//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! Weapons are not systems: the engine owns them and updates them between
//! wave spawning and movement.

pub mod cleanup;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod wave_spawner;
