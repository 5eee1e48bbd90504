//! Snapshot system: queries the ECS world and the engine's weapons and builds
//! a complete `SimSnapshot`.
//!
//! This system is read-only; it never modifies the world.

use std::collections::BTreeMap;

use hecs::World;

use bastion_core::components::*;
use bastion_core::enums::GamePhase;
use bastion_core::events::SimEvent;
use bastion_core::state::*;
use bastion_core::types::{Position, SimTime};

use crate::weapon::Weapon;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    weapons: &BTreeMap<u32, Weapon>,
    events: Vec<SimEvent>,
    score: &ScoreView,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        phase,
        towers: build_towers(world, weapons),
        enemies: build_enemies(world),
        projectiles: build_projectiles(world),
        events,
        score: score.clone(),
    }
}

/// One view per weapon, in tower id order.
fn build_towers(world: &World, weapons: &BTreeMap<u32, Weapon>) -> Vec<TowerView> {
    weapons
        .values()
        .map(|weapon| {
            let platform = weapon.platform();
            TowerView {
                tower_id: weapon.id(),
                weapon_id: weapon.definition().id.clone(),
                kind: weapon.definition().kind,
                position: world
                    .get::<&Position>(platform)
                    .map(|pos| *pos)
                    .unwrap_or_default(),
                facing: world
                    .get::<&Facing>(platform)
                    .map(|facing| facing.yaw)
                    .unwrap_or_default(),
                aim: weapon.aim(),
                firing_phase: weapon.phase(),
                target: weapon.current_target().map(|held| held.enemy_id),
                cycles_completed: weapon.sequence().cycles_completed(),
                effective: weapon.cached_effective_definition(),
            }
        })
        .collect()
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Position, &Health)>()
        .iter()
        .map(|(_, (enemy, pos, health))| EnemyView {
            enemy_id: enemy.id,
            target_type: enemy.target_type,
            position: *pos,
            health: health.current,
        })
        .collect();

    enemies.sort_by_key(|e| e.enemy_id);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(_, (projectile, pos))| ProjectileView {
            tower_id: projectile.weapon_id,
            position: *pos,
            impact_point: projectile.impact_point,
        })
        .collect();

    // Stable sort keeps spawn order within a tower.
    projectiles.sort_by_key(|p| p.tower_id);
    projectiles
}
