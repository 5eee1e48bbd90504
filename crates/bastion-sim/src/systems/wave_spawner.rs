//! Wave spawning system: spawns enemy waves at scheduled times.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use bastion_core::enums::TargetType;
use bastion_core::types::Position;

use crate::world_setup;

/// A group of enemies entering along one heading.
#[derive(Debug, Clone)]
pub struct WaveEntry {
    /// Tick at which the first enemy of this wave spawns.
    pub spawn_at_tick: u64,
    pub count: u32,
    /// Ticks between two consecutive enemies of the wave.
    pub spacing_ticks: u64,
    pub target_type: TargetType,
    /// Spawn point before jitter.
    pub origin: Position,
    /// Direction of travel (radians, 0 = North).
    pub heading: f64,
    /// Meters per second.
    pub speed: f64,
    pub health: f64,
    /// Enemies of this wave spawned so far.
    pub spawned: u32,
}

impl WaveEntry {
    pub fn is_complete(&self) -> bool {
        self.spawned >= self.count
    }

    /// Tick at which the next enemy of this wave is due.
    fn next_due_tick(&self) -> u64 {
        self.spawn_at_tick + self.spacing_ticks * self.spawned as u64
    }
}

/// The complete wave schedule for a mission.
#[derive(Debug, Clone, Default)]
pub struct WaveSchedule {
    pub waves: Vec<WaveEntry>,
}

impl WaveSchedule {
    /// Total number of enemies across all waves.
    pub fn total_enemies(&self) -> u32 {
        self.waves.iter().map(|w| w.count).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.waves.iter().all(WaveEntry::is_complete)
    }
}

/// Check the schedule and spawn every enemy that is due.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    schedule: &mut WaveSchedule,
    next_enemy_id: &mut u32,
    current_tick: u64,
) {
    for (index, wave) in schedule.waves.iter_mut().enumerate() {
        if wave.spawned == 0 && current_tick >= wave.spawn_at_tick && wave.count > 0 {
            info!(wave = index, count = wave.count, "wave started");
        }
        while !wave.is_complete() && current_tick >= wave.next_due_tick() {
            let id = *next_enemy_id;
            *next_enemy_id += 1;
            world_setup::spawn_wave_enemy(world, rng, id, wave);
            wave.spawned += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::components::Enemy;
    use rand::SeedableRng;

    fn wave(spawn_at_tick: u64, count: u32, spacing_ticks: u64) -> WaveEntry {
        WaveEntry {
            spawn_at_tick,
            count,
            spacing_ticks,
            target_type: TargetType::Ground,
            origin: Position::new(0.0, 100.0, 0.0),
            heading: std::f64::consts::PI,
            speed: 3.0,
            health: 100.0,
            spawned: 0,
        }
    }

    #[test]
    fn test_wave_spawns_with_spacing() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut schedule = WaveSchedule {
            waves: vec![wave(10, 3, 5)],
        };
        let mut next_id = 0;
        let count = |world: &World| world.query::<&Enemy>().iter().count();

        run(&mut world, &mut rng, &mut schedule, &mut next_id, 9);
        assert_eq!(count(&world), 0);
        run(&mut world, &mut rng, &mut schedule, &mut next_id, 10);
        assert_eq!(count(&world), 1);
        run(&mut world, &mut rng, &mut schedule, &mut next_id, 14);
        assert_eq!(count(&world), 1);
        run(&mut world, &mut rng, &mut schedule, &mut next_id, 20);
        assert_eq!(count(&world), 3);
        assert!(schedule.is_complete());
        assert_eq!(next_id, 3);
    }

    #[test]
    fn test_total_enemies() {
        let schedule = WaveSchedule {
            waves: vec![wave(0, 3, 1), wave(30, 4, 1)],
        };
        assert_eq!(schedule.total_enemies(), 7);
    }
}
