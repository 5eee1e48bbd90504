//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Kind of entity a weapon is allowed to engage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    /// Walking units on the ground.
    #[default]
    Ground,
    /// Flying units.
    Air,
}

/// Concrete weapon variant. Selects the hook implementation used for a definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Turreted bolt thrower: turns toward its target, fast projectile.
    #[default]
    Ballista,
    /// Fixed-arc siege engine: slow projectile with splash damage.
    Catapult,
}

/// Phase of a weapon's firing sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiringPhase {
    /// Waiting out the fire-rate cooldown.
    #[default]
    CoolingDown,
    /// Cooldown done, parked until a target is held.
    WaitingForTarget,
    /// Wind-up animation before release.
    AnimatingStart,
    /// Projectile release toward the captured position.
    Launching,
    /// Recovery animation after release.
    Rewinding,
    /// Cancelled. No further phases run.
    Terminated,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Towers may be placed, nothing moves.
    #[default]
    Setup,
    Active,
    Paused,
}
