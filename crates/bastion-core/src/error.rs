//! Configuration errors.
//!
//! These indicate invalid content (weapon definitions, tower placement data).
//! They are raised when a weapon or catalog is constructed, never retried,
//! and never swallowed by the simulation.

use std::fmt;

/// An invalid combination of configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `fire_rate_every_secs - launch_animation_delay` is zero or negative.
    NonPositiveLaunchDelay {
        weapon: String,
        fire_rate_every_secs: f64,
        launch_animation_delay: f64,
    },
    /// Fire-rate interval is zero or negative.
    NonPositiveFireRate { weapon: String, value: f64 },
    /// Projectile speed is zero or negative.
    NonPositiveProjectileSpeed { weapon: String, value: f64 },
    /// Damage is negative.
    NegativeDamage { weapon: String, value: f64 },
    /// Range bounds are negative or inverted.
    InvalidRange {
        weapon: String,
        min_range: f64,
        max_range: f64,
    },
    /// Tower footprint radius is zero or negative.
    InvalidFootprint { radius: f64 },
    /// No definition with this id in the catalog.
    UnknownWeapon(String),
    /// Two catalog entries share an id.
    DuplicateWeapon(String),
    /// Catalog text could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveLaunchDelay {
                weapon,
                fire_rate_every_secs,
                launch_animation_delay,
            } => write!(
                f,
                "weapon '{weapon}': launch delay {} (fire rate {fire_rate_every_secs}s - animation delay {launch_animation_delay}s) must be greater than 0",
                fire_rate_every_secs - launch_animation_delay
            ),
            ConfigError::NonPositiveFireRate { weapon, value } => {
                write!(f, "weapon '{weapon}': fire rate interval {value}s must be greater than 0")
            }
            ConfigError::InvalidRange {
                weapon,
                min_range,
                max_range,
            } => write!(
                f,
                "weapon '{weapon}': invalid range [{min_range}, {max_range}]"
            ),
            ConfigError::NonPositiveProjectileSpeed { weapon, value } => {
                write!(f, "weapon '{weapon}': projectile speed {value} must be greater than 0")
            }
            ConfigError::NegativeDamage { weapon, value } => {
                write!(f, "weapon '{weapon}': damage {value} must not be negative")
            }
            ConfigError::InvalidFootprint { radius } => {
                write!(f, "tower footprint radius {radius} must be greater than 0")
            }
            ConfigError::UnknownWeapon(id) => write!(f, "unknown weapon '{id}'"),
            ConfigError::DuplicateWeapon(id) => write!(f, "duplicate weapon id '{id}'"),
            ConfigError::Parse(msg) => write!(f, "failed to parse: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
