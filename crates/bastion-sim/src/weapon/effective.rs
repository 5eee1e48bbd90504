//! Per-weapon cache of the position-derived effective definition.

use bastion_core::definitions::EffectiveWeaponDefinition;

/// Holds the effective definition once it has been computed.
///
/// Nothing invalidates the cache implicitly: a value computed for one
/// platform position stays until [`EffectiveDefinitionCache::replace`] is called.
#[derive(Debug, Clone, Default)]
pub struct EffectiveDefinitionCache {
    value: Option<EffectiveWeaponDefinition>,
}

impl EffectiveDefinitionCache {
    /// Return the cached value, computing and storing it on first access.
    pub fn get_or_compute(
        &mut self,
        compute: impl FnOnce() -> EffectiveWeaponDefinition,
    ) -> EffectiveWeaponDefinition {
        *self.value.get_or_insert_with(compute)
    }

    /// Overwrite the cached value unconditionally.
    pub fn replace(&mut self, value: EffectiveWeaponDefinition) -> EffectiveWeaponDefinition {
        self.value = Some(value);
        value
    }

    pub fn cached(&self) -> Option<EffectiveWeaponDefinition> {
        self.value
    }
}
