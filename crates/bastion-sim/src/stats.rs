//! Stat calculators: base definition + platform position → effective definition.

use bastion_core::constants::{MAX_ELEVATION_RANGE_BONUS, RANGE_BONUS_PER_METER};
use bastion_core::definitions::{EffectiveWeaponDefinition, WeaponDefinition};
use bastion_core::types::Position;

/// Derives effective combat stats for a weapon mounted at `position`.
/// Implementations must be pure: same inputs, same output.
pub trait StatCalculator: Send + Sync {
    fn calculate(&self, base: &WeaponDefinition, position: Position) -> EffectiveWeaponDefinition;
}

/// Uses the base definition unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatStatCalculator;

impl StatCalculator for FlatStatCalculator {
    fn calculate(&self, base: &WeaponDefinition, _position: Position) -> EffectiveWeaponDefinition {
        EffectiveWeaponDefinition::from(base)
    }
}

/// Grants extra maximum range to towers built on high ground.
#[derive(Debug, Clone, Copy)]
pub struct ElevationStatCalculator {
    /// Extra range per meter of platform height.
    pub range_per_meter: f64,
    /// Cap on the bonus as a fraction of the base maximum range.
    pub max_bonus_fraction: f64,
}

impl Default for ElevationStatCalculator {
    fn default() -> Self {
        Self {
            range_per_meter: RANGE_BONUS_PER_METER,
            max_bonus_fraction: MAX_ELEVATION_RANGE_BONUS,
        }
    }
}

impl StatCalculator for ElevationStatCalculator {
    fn calculate(&self, base: &WeaponDefinition, position: Position) -> EffectiveWeaponDefinition {
        let mut effective = EffectiveWeaponDefinition::from(base);
        let bonus = (position.z.max(0.0) * self.range_per_meter)
            .min(base.max_range * self.max_bonus_fraction);
        effective.max_range += bonus;
        effective
    }
}
