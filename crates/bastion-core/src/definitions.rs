//! Weapon definitions: the immutable base configuration loaded from content,
//! and the position-derived effective stats computed from it.

use serde::{Deserialize, Serialize};

use crate::enums::{TargetType, WeaponKind};
use crate::error::ConfigError;

fn default_attack_angle() -> f64 {
    360.0
}

/// Immutable base configuration of a weapon type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: WeaponKind,
    #[serde(default)]
    pub target_type: TargetType,
    /// Seconds between two launches.
    pub fire_rate_every_secs: f64,
    #[serde(default)]
    pub min_range: f64,
    pub max_range: f64,
    /// Full firing arc centred on the tower's forward direction.
    #[serde(default = "default_attack_angle")]
    pub attack_angle_degrees: f64,
    pub damage: f64,
    #[serde(default)]
    pub splash_radius: f64,
    pub projectile_speed: f64,
    /// Duration of the wind-up animation that precedes a launch.
    #[serde(default)]
    pub launch_animation_secs: f64,
    /// Duration of the recovery animation after a launch.
    #[serde(default)]
    pub rewind_animation_secs: f64,
    /// Turret slew rate. Only used by turreted variants.
    #[serde(default)]
    pub turn_rate_degrees: f64,
}

impl WeaponDefinition {
    /// Check values that are invalid regardless of the weapon variant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fire_rate_every_secs <= 0.0 {
            return Err(ConfigError::NonPositiveFireRate {
                weapon: self.id.clone(),
                value: self.fire_rate_every_secs,
            });
        }
        if self.min_range < 0.0 || self.max_range <= 0.0 || self.min_range > self.max_range {
            return Err(ConfigError::InvalidRange {
                weapon: self.id.clone(),
                min_range: self.min_range,
                max_range: self.max_range,
            });
        }
        if self.projectile_speed.is_nan() || self.projectile_speed <= 0.0 {
            return Err(ConfigError::NonPositiveProjectileSpeed {
                weapon: self.id.clone(),
                value: self.projectile_speed,
            });
        }
        if self.damage.is_nan() || self.damage < 0.0 {
            return Err(ConfigError::NegativeDamage {
                weapon: self.id.clone(),
                value: self.damage,
            });
        }
        Ok(())
    }

    /// Cooldown that precedes each launch sequence: the fire-rate interval
    /// minus the time the variant spends animating before release.
    pub fn launch_delay_secs(&self, launch_animation_delay: f64) -> Result<f64, ConfigError> {
        let delay = self.fire_rate_every_secs - launch_animation_delay;
        if delay > 0.0 {
            Ok(delay)
        } else {
            Err(ConfigError::NonPositiveLaunchDelay {
                weapon: self.id.clone(),
                fire_rate_every_secs: self.fire_rate_every_secs,
                launch_animation_delay,
            })
        }
    }
}

/// Combat stats of one weapon instance at one position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveWeaponDefinition {
    pub min_range: f64,
    pub max_range: f64,
    pub attack_angle_degrees: f64,
    pub damage: f64,
    pub splash_radius: f64,
    pub fire_rate_every_secs: f64,
    pub projectile_speed: f64,
}

impl From<&WeaponDefinition> for EffectiveWeaponDefinition {
    fn from(def: &WeaponDefinition) -> Self {
        Self {
            min_range: def.min_range,
            max_range: def.max_range,
            attack_angle_degrees: def.attack_angle_degrees,
            damage: def.damage,
            splash_radius: def.splash_radius,
            fire_rate_every_secs: def.fire_rate_every_secs,
            projectile_speed: def.projectile_speed,
        }
    }
}

/// All weapon definitions available to a mission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponCatalog {
    pub weapons: Vec<WeaponDefinition>,
}

impl WeaponCatalog {
    /// Parse and validate a JSON catalog.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let catalog: WeaponCatalog =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate every definition and reject duplicate ids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (idx, def) in self.weapons.iter().enumerate() {
            def.validate()?;
            if self.weapons[..idx].iter().any(|other| other.id == def.id) {
                return Err(ConfigError::DuplicateWeapon(def.id.clone()));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&WeaponDefinition, ConfigError> {
        self.weapons
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| ConfigError::UnknownWeapon(id.to_string()))
    }

    /// Built-in catalog with one ballista and one catapult.
    pub fn default_catalog() -> Self {
        Self {
            weapons: vec![
                WeaponDefinition {
                    id: "ballista".into(),
                    name: "Ballista".into(),
                    kind: WeaponKind::Ballista,
                    target_type: TargetType::Ground,
                    fire_rate_every_secs: 2.0,
                    min_range: 0.0,
                    max_range: 30.0,
                    attack_angle_degrees: 360.0,
                    damage: 40.0,
                    splash_radius: 0.0,
                    projectile_speed: 60.0,
                    launch_animation_secs: 0.5,
                    rewind_animation_secs: 0.5,
                    turn_rate_degrees: 180.0,
                },
                WeaponDefinition {
                    id: "catapult".into(),
                    name: "Catapult".into(),
                    kind: WeaponKind::Catapult,
                    target_type: TargetType::Ground,
                    fire_rate_every_secs: 4.0,
                    min_range: 8.0,
                    max_range: 45.0,
                    attack_angle_degrees: 90.0,
                    damage: 60.0,
                    splash_radius: 4.0,
                    projectile_speed: 20.0,
                    launch_animation_secs: 1.0,
                    rewind_animation_secs: 1.5,
                    turn_rate_degrees: 0.0,
                },
            ],
        }
    }
}
