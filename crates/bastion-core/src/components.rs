//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in systems
//! and in the weapon instances owned by the engine, not in components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::TargetType;
use crate::types::Position;

/// Stationary platform a weapon is mounted on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tower {
    /// Engine-assigned tower id. The mounted weapon shares it.
    pub id: u32,
    /// Radius of the tower's collision footprint (meters). Must be > 0.
    pub footprint_radius: f64,
}

/// Horizontal orientation of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Facing {
    /// Yaw in radians (0 = North, clockwise).
    pub yaw: f64,
}

impl Facing {
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            yaw: degrees.to_radians().rem_euclid(std::f64::consts::TAU),
        }
    }

    /// Unit forward vector on the horizontal plane.
    pub fn forward(&self) -> DVec3 {
        DVec3::new(self.yaw.sin(), self.yaw.cos(), 0.0)
    }
}

/// Marks an entity as a hostile unit that weapons may target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    /// Engine-assigned id, stable for the enemy's lifetime.
    pub id: u32,
    pub target_type: TargetType,
}

/// Hit points. An entity at zero health is dead and no longer a valid target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn new(max: f64) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }
}

/// A projectile in flight toward a fixed impact point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    /// Weapon that launched this projectile.
    pub weapon_id: u32,
    /// Point captured when the firing sequence committed to the shot.
    pub impact_point: Position,
    /// Flight speed (m/s).
    pub speed: f64,
    pub damage: f64,
    /// Damage radius around the impact point. Zero means direct hit only.
    pub splash_radius: f64,
    /// Target type the projectile can damage.
    pub target_type: TargetType,
}
