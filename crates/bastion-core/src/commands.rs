//! Commands sent to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::TargetType;
use crate::types::{Position, Velocity};

/// All possible external actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    // --- Towers ---
    /// Place a tower carrying the given catalog weapon.
    PlaceTower {
        weapon_id: String,
        position: Position,
        /// Forward direction in degrees (0 = North, clockwise).
        facing_degrees: f64,
        /// Footprint radius; the default footprint is used when absent.
        #[serde(default)]
        footprint_radius: Option<f64>,
    },
    /// Remove a tower and destroy its weapon.
    RemoveTower { tower_id: u32 },
    /// Recompute a weapon's effective stats from its tower's current position.
    RecalculateWeapon { tower_id: u32 },

    // --- Enemies ---
    /// Spawn a single enemy.
    SpawnEnemy {
        target_type: TargetType,
        position: Position,
        velocity: Velocity,
        health: f64,
    },

    // --- Simulation control ---
    /// Leave setup and start advancing time.
    StartMission,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
