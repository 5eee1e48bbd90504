//! Events emitted by the simulation each tick.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A tower and its weapon were created.
    TowerPlaced { tower_id: u32, weapon_id: String },
    /// A placement was refused because of invalid configuration.
    TowerRejected { weapon_id: String, reason: String },
    /// A weapon started holding a target.
    TargetAcquired { tower_id: u32, enemy_id: u32 },
    /// A held target died or left the attack range.
    TargetLost { tower_id: u32, enemy_id: u32 },
    /// A projectile was released toward a captured position.
    ProjectileLaunched { tower_id: u32, target_position: Position },
    /// A projectile reached its impact point.
    ProjectileImpact {
        tower_id: u32,
        position: Position,
        hits: u32,
    },
    /// An enemy's health reached zero.
    EnemyDestroyed { enemy_id: u32 },
    /// A weapon was cancelled together with its tower.
    WeaponDestroyed { tower_id: u32 },
}
