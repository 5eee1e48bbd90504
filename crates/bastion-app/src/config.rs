//! Loading of the weapon catalog and scenario files.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use tracing::info;

use bastion_core::definitions::WeaponCatalog;
use bastion_sim::scenario::{default_scenario, Scenario};

/// Read a JSON catalog, or the built-in one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<WeaponCatalog> {
    let Some(path) = path else {
        return Ok(WeaponCatalog::default_catalog());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read weapon catalog {}", path.display()))?;
    let catalog = WeaponCatalog::from_json(&text)
        .with_context(|| format!("invalid weapon catalog {}", path.display()))?;
    info!(path = %path.display(), weapons = catalog.weapons.len(), "weapon catalog loaded");
    Ok(catalog)
}

/// Read a JSON scenario, or the built-in one when no path is given.
pub fn load_scenario(path: Option<&Path>) -> Result<Scenario> {
    let Some(path) = path else {
        return Ok(default_scenario());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    let scenario =
        Scenario::from_json(&text).with_context(|| format!("invalid scenario {}", path.display()))?;
    info!(path = %path.display(), name = %scenario.name, "scenario loaded");
    Ok(scenario)
}

/// Every tower in the scenario must reference a catalog weapon.
pub fn check_scenario(scenario: &Scenario, catalog: &WeaponCatalog) -> Result<()> {
    for tower in &scenario.towers {
        ensure!(
            catalog.get(&tower.weapon_id).is_ok(),
            "scenario '{}' places unknown weapon '{}'",
            scenario.name,
            tower.weapon_id
        );
    }
    Ok(())
}
