//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs ECS world and every weapon, processes
//! commands, runs all systems at the fixed tick rate, and produces
//! `SimSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info, warn};

use bastion_core::commands::SimCommand;
use bastion_core::components::Facing;
use bastion_core::constants::DEFAULT_TOWER_FOOTPRINT;
use bastion_core::definitions::{EffectiveWeaponDefinition, WeaponCatalog, WeaponDefinition};
use bastion_core::enums::GamePhase;
use bastion_core::error::ConfigError;
use bastion_core::events::SimEvent;
use bastion_core::state::{ScoreView, SimSnapshot};
use bastion_core::types::{Position, SimTime};

use crate::locator::NearestInArcLocator;
use crate::stats::FlatStatCalculator;
use crate::systems;
use crate::systems::wave_spawner::WaveSchedule;
use crate::variants::build_variant;
use crate::weapon::hooks::WeaponVariant;
use crate::weapon::{Weapon, WeaponStrategies};
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Wall-clock speed multiplier used by real-time runners (1.0 = normal).
    pub time_scale: f64,
    /// Weapons that `PlaceTower` may reference.
    pub catalog: WeaponCatalog,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            catalog: WeaponCatalog::default_catalog(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<SimCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<SimEvent>,

    catalog: WeaponCatalog,
    strategies: WeaponStrategies,
    /// Keyed by tower id; iteration order is the update order.
    weapons: BTreeMap<u32, Weapon>,
    next_tower_id: u32,
    next_enemy_id: u32,
    wave_schedule: WaveSchedule,
    score: ScoreView,
}

impl SimulationEngine {
    /// Create an engine with flat stats and the nearest-in-arc locator.
    pub fn new(config: SimConfig) -> Self {
        Self::with_strategies(
            config,
            WeaponStrategies {
                calculator: Arc::new(FlatStatCalculator),
                locator: Arc::new(NearestInArcLocator),
            },
        )
    }

    /// Create an engine whose weapons all share `strategies`.
    pub fn with_strategies(config: SimConfig, strategies: WeaponStrategies) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            catalog: config.catalog,
            strategies,
            weapons: BTreeMap::new(),
            next_tower_id: 1,
            next_enemy_id: 1,
            wave_schedule: WaveSchedule::default(),
            score: ScoreView::default(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Replace the wave schedule. Waves are timed from mission tick 0.
    pub fn set_wave_schedule(&mut self, schedule: WaveSchedule) {
        self.wave_schedule = schedule;
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    ///
    /// Commands are processed in every phase; systems and weapons only run
    /// while the mission is active.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.weapons,
            events,
            &self.score,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn weapon(&self, tower_id: u32) -> Option<&Weapon> {
        self.weapons.get(&tower_id)
    }

    pub fn weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.values()
    }

    pub fn score(&self) -> &ScoreView {
        &self.score
    }

    /// Effective stats a catalog weapon would have at `position`, without
    /// placing anything.
    pub fn preview_effective_definition(
        &self,
        weapon_id: &str,
        position: Position,
    ) -> Result<EffectiveWeaponDefinition, ConfigError> {
        let definition = self.catalog.get(weapon_id)?;
        Ok(self.strategies.calculator.calculate(definition, position))
    }

    /// Place a tower carrying `definition` driven by a caller-supplied
    /// variant. Returns the new tower id.
    ///
    /// Nothing is left in the world when the configuration is rejected.
    pub fn place_tower_with_variant(
        &mut self,
        definition: WeaponDefinition,
        position: Position,
        facing_degrees: f64,
        footprint_radius: f64,
        variant: Box<dyn WeaponVariant>,
    ) -> Result<u32, ConfigError> {
        if footprint_radius.is_nan() || footprint_radius <= 0.0 {
            return Err(ConfigError::InvalidFootprint {
                radius: footprint_radius,
            });
        }

        let tower_id = self.next_tower_id;
        let platform = world_setup::spawn_tower(
            &mut self.world,
            tower_id,
            position,
            facing_degrees,
            footprint_radius,
        );

        let weapon = match Weapon::new(
            tower_id,
            definition,
            platform,
            &self.world,
            self.strategies.clone(),
            variant,
            self.time.tick,
        ) {
            Ok(weapon) => weapon,
            Err(err) => {
                let _ = self.world.despawn(platform);
                return Err(err);
            }
        };

        self.next_tower_id += 1;
        info!(
            tower_id,
            weapon_id = %weapon.definition().id,
            cooldown_ticks = weapon.sequence().cooldown_ticks(),
            "tower placed"
        );
        self.events.push(SimEvent::TowerPlaced {
            tower_id,
            weapon_id: weapon.definition().id.clone(),
        });
        self.weapons.insert(tower_id, weapon);
        Ok(tower_id)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: SimCommand) {
        match command {
            SimCommand::StartMission => {
                if self.phase == GamePhase::Setup {
                    info!(
                        towers = self.weapons.len(),
                        enemies = self.wave_schedule.total_enemies(),
                        "mission started"
                    );
                    self.phase = GamePhase::Active;
                }
            }
            SimCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            SimCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            SimCommand::PlaceTower {
                weapon_id,
                position,
                facing_degrees,
                footprint_radius,
            } => {
                let result = self.catalog.get(&weapon_id).cloned().and_then(|definition| {
                    let variant =
                        build_variant(&definition, Facing::from_degrees(facing_degrees));
                    self.place_tower_with_variant(
                        definition,
                        position,
                        facing_degrees,
                        footprint_radius.unwrap_or(DEFAULT_TOWER_FOOTPRINT),
                        variant,
                    )
                });
                if let Err(err) = result {
                    error!(%weapon_id, %err, "tower placement rejected");
                    self.events.push(SimEvent::TowerRejected {
                        weapon_id,
                        reason: err.to_string(),
                    });
                }
            }
            SimCommand::RemoveTower { tower_id } => {
                let Some(mut weapon) = self.weapons.remove(&tower_id) else {
                    warn!(tower_id, "remove requested for unknown tower");
                    return;
                };
                weapon.destroy();
                let _ = self.world.despawn(weapon.platform());
                info!(tower_id, "tower removed");
                self.events.push(SimEvent::WeaponDestroyed { tower_id });
            }
            SimCommand::RecalculateWeapon { tower_id } => {
                let Some(weapon) = self.weapons.get_mut(&tower_id) else {
                    warn!(tower_id, "recalculate requested for unknown tower");
                    return;
                };
                let position = self
                    .world
                    .get::<&Position>(weapon.platform())
                    .map(|pos| *pos)
                    .unwrap_or_default();
                weapon.recalculate_effective_definition(position);
            }
            SimCommand::SpawnEnemy {
                target_type,
                position,
                velocity,
                health,
            } => {
                let id = self.next_enemy_id;
                self.next_enemy_id += 1;
                world_setup::spawn_enemy(
                    &mut self.world,
                    id,
                    target_type,
                    position,
                    velocity,
                    health,
                );
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick = self.time.tick;
        // 1. Wave spawning
        systems::wave_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.wave_schedule,
            &mut self.next_enemy_id,
            tick,
        );
        // 2. Weapons: tracking, then firing sequence, in tower id order
        let events_before = self.events.len();
        for weapon in self.weapons.values_mut() {
            weapon.update(&mut self.world, &mut self.events, tick);
        }
        let launched = self.events[events_before..]
            .iter()
            .filter(|e| matches!(e, SimEvent::ProjectileLaunched { .. }))
            .count();
        self.score.projectiles_launched += launched as u32;
        // 3. Movement integration
        systems::movement::run(&mut self.world);
        // 4. Projectile flight and impact
        systems::projectiles::run(&mut self.world, &mut self.events, &mut self.despawn_buffer);
        // 5. Cleanup (dead, out of bounds)
        systems::cleanup::run(
            &mut self.world,
            &mut self.events,
            &mut self.score,
            &mut self.despawn_buffer,
        );
    }
}
