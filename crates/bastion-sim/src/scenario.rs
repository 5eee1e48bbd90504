//! Scenario definitions: tower layout plus enemy wave schedule.
//!
//! Scenarios are plain JSON documents. Towers become `PlaceTower` commands
//! queued before the mission starts; waves become the engine's `WaveSchedule`.

use serde::{Deserialize, Serialize};

use bastion_core::commands::SimCommand;
use bastion_core::constants::{secs_to_ticks, DEFAULT_ENEMY_HEALTH};
use bastion_core::enums::TargetType;
use bastion_core::error::ConfigError;
use bastion_core::types::Position;

use crate::systems::wave_spawner::{WaveEntry, WaveSchedule};
use crate::world_setup::default_speed;

fn default_health() -> f64 {
    DEFAULT_ENEMY_HEALTH
}

fn default_count() -> u32 {
    1
}

/// One tower to place before the mission starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerPlacement {
    /// Catalog id of the mounted weapon.
    pub weapon_id: String,
    pub position: Position,
    #[serde(default)]
    pub facing_degrees: f64,
    #[serde(default)]
    pub footprint_radius: Option<f64>,
}

/// A group of enemies entering along one heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSpec {
    /// Mission time of the first spawn.
    pub at_secs: f64,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub spacing_secs: f64,
    #[serde(default)]
    pub target_type: TargetType,
    pub origin: Position,
    /// Direction of travel (0 = North, clockwise).
    pub heading_degrees: f64,
    /// Defaults to the target type's standard speed.
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default = "default_health")]
    pub health: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub towers: Vec<TowerPlacement>,
    #[serde(default)]
    pub waves: Vec<WaveSpec>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Placement commands for every tower, in declaration order.
    pub fn tower_commands(&self) -> Vec<SimCommand> {
        self.towers
            .iter()
            .map(|tower| SimCommand::PlaceTower {
                weapon_id: tower.weapon_id.clone(),
                position: tower.position,
                facing_degrees: tower.facing_degrees,
                footprint_radius: tower.footprint_radius,
            })
            .collect()
    }

    pub fn wave_schedule(&self) -> WaveSchedule {
        WaveSchedule {
            waves: self
                .waves
                .iter()
                .map(|wave| WaveEntry {
                    spawn_at_tick: secs_to_ticks(wave.at_secs),
                    count: wave.count,
                    spacing_ticks: secs_to_ticks(wave.spacing_secs),
                    target_type: wave.target_type,
                    origin: wave.origin,
                    heading: wave.heading_degrees.to_radians(),
                    speed: wave.speed.unwrap_or_else(|| default_speed(wave.target_type)),
                    health: wave.health,
                    spawned: 0,
                })
                .collect(),
        }
    }
}

/// "Hold the Ford": a ballista and a catapult against two ground waves
/// marching south.
pub fn default_scenario() -> Scenario {
    Scenario {
        name: "Hold the Ford".into(),
        towers: vec![
            TowerPlacement {
                weapon_id: "ballista".into(),
                position: Position::new(0.0, 0.0, 0.0),
                facing_degrees: 0.0,
                footprint_radius: None,
            },
            TowerPlacement {
                weapon_id: "catapult".into(),
                position: Position::new(12.0, -6.0, 3.0),
                facing_degrees: 0.0,
                footprint_radius: Some(2.5),
            },
        ],
        waves: vec![
            WaveSpec {
                at_secs: 0.0,
                count: 4,
                spacing_secs: 2.0,
                target_type: TargetType::Ground,
                origin: Position::new(0.0, 90.0, 0.0),
                heading_degrees: 180.0,
                speed: None,
                health: DEFAULT_ENEMY_HEALTH,
            },
            WaveSpec {
                at_secs: 20.0,
                count: 6,
                spacing_secs: 1.5,
                target_type: TargetType::Ground,
                origin: Position::new(8.0, 90.0, 0.0),
                heading_degrees: 180.0,
                speed: Some(4.0),
                health: 150.0,
            },
        ],
    }
}
