//! Entity spawn factories for setting up the simulation world.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bastion_core::components::*;
use bastion_core::constants::*;
use bastion_core::enums::TargetType;
use bastion_core::types::{Position, Velocity};

use crate::systems::wave_spawner::WaveEntry;

/// Spawn a tower platform. Weapons are created separately by the engine.
pub fn spawn_tower(
    world: &mut World,
    id: u32,
    position: Position,
    facing_degrees: f64,
    footprint_radius: f64,
) -> Entity {
    world.spawn((
        Tower {
            id,
            footprint_radius,
        },
        position,
        Facing::from_degrees(facing_degrees),
    ))
}

/// Spawn a single enemy.
pub fn spawn_enemy(
    world: &mut World,
    id: u32,
    target_type: TargetType,
    position: Position,
    velocity: Velocity,
    health: f64,
) -> Entity {
    world.spawn((
        Enemy { id, target_type },
        position,
        velocity,
        Health::new(health),
    ))
}

/// Spawn one enemy of a wave, jittered sideways from the wave's origin.
/// Air enemies fly at `AIR_ENEMY_ALTITUDE`.
pub fn spawn_wave_enemy(world: &mut World, rng: &mut ChaCha8Rng, id: u32, wave: &WaveEntry) -> Entity {
    let jitter: f64 = rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER);

    // Perpendicular to the heading, on the horizontal plane.
    let (sin, cos) = wave.heading.sin_cos();
    let altitude = match wave.target_type {
        TargetType::Ground => wave.origin.z,
        TargetType::Air => AIR_ENEMY_ALTITUDE,
    };
    let position = Position::new(
        wave.origin.x + jitter * cos,
        wave.origin.y - jitter * sin,
        altitude,
    );
    let velocity = Velocity::new(wave.speed * sin, wave.speed * cos, 0.0);

    spawn_enemy(world, id, wave.target_type, position, velocity, wave.health)
}

/// Default speed for an enemy type (m/s).
pub fn default_speed(target_type: TargetType) -> f64 {
    match target_type {
        TargetType::Ground => GROUND_ENEMY_SPEED,
        TargetType::Air => AIR_ENEMY_SPEED,
    }
}
