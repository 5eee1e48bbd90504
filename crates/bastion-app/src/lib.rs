//! BASTION headless runner.
//!
//! Loads a weapon catalog and a scenario, drives the simulation engine on a
//! dedicated game-loop thread and exposes the latest snapshot to callers.

pub mod config;
pub mod game_loop;
pub mod state;

pub use bastion_core as core;
