//! Simulation state snapshot: the complete visible state produced after each tick.

use serde::{Deserialize, Serialize};

use crate::definitions::EffectiveWeaponDefinition;
use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Position, SimTime};

/// Complete simulation state after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub towers: Vec<TowerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub events: Vec<SimEvent>,
    pub score: ScoreView,
}

/// A tower and the state of its weapon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub tower_id: u32,
    pub weapon_id: String,
    pub kind: WeaponKind,
    pub position: Position,
    /// Tower forward direction (radians, 0 = North).
    pub facing: f64,
    /// Where the variant is currently aiming (radians, 0 = North).
    pub aim: f64,
    pub firing_phase: FiringPhase,
    /// Enemy id of the held target, if any.
    pub target: Option<u32>,
    pub cycles_completed: u64,
    /// Effective stats, once computed.
    pub effective: Option<EffectiveWeaponDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub enemy_id: u32,
    pub target_type: TargetType,
    pub position: Position,
    pub health: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub tower_id: u32,
    pub position: Position,
    pub impact_point: Position,
}

/// Running totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub enemies_destroyed: u32,
    pub enemies_escaped: u32,
    pub projectiles_launched: u32,
}
