//! Weapon instance: one emplacement mounted on a tower.
//!
//! Composes the effective-definition cache, target acquisition, the per-tick
//! tracking loop and the firing sequence. Weapons are owned by the engine,
//! not stored in the ECS world; they refer to their tower and their target
//! through non-owning `hecs::Entity` handles.

pub mod effective;
pub mod hooks;
pub mod sequence;

use std::sync::Arc;

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use bastion_core::components::{Enemy, Facing, Health};
use bastion_core::constants::{secs_to_ticks, DT, WEAPON_MOUNT_HEIGHT};
use bastion_core::definitions::{EffectiveWeaponDefinition, WeaponDefinition};
use bastion_core::enums::{FiringPhase, TargetType};
use bastion_core::error::ConfigError;
use bastion_core::events::SimEvent;
use bastion_core::types::Position;

use crate::locator::TargetLocator;
use crate::stats::StatCalculator;

use effective::EffectiveDefinitionCache;
use hooks::{TrackContext, TrackedTarget, WeaponVariant};
use sequence::{FiringSequence, SequenceEnv};

/// Strategies shared between weapons.
#[derive(Clone)]
pub struct WeaponStrategies {
    pub calculator: Arc<dyn StatCalculator>,
    pub locator: Arc<dyn TargetLocator>,
}

/// A target the weapon is holding. The entity may have been despawned since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldTarget {
    pub entity: Entity,
    pub enemy_id: u32,
}

pub struct Weapon {
    id: u32,
    definition: WeaponDefinition,
    platform: Entity,
    target_type: TargetType,
    strategies: WeaponStrategies,
    variant: Box<dyn WeaponVariant>,
    effective: EffectiveDefinitionCache,
    current_target: Option<HeldTarget>,
    /// Captured once at spawn. Towers do not turn.
    platform_forward: DVec3,
    sequence: FiringSequence,
}

impl Weapon {
    /// Create a weapon mounted on `platform` and start its firing sequence at
    /// `current_tick`.
    ///
    /// Fails when the definition is invalid or when the fire-rate interval
    /// does not exceed the variant's launch animation delay.
    ///
    /// A platform without a `Facing` component faces North (`DVec3::Y`).
    pub fn new(
        id: u32,
        definition: WeaponDefinition,
        platform: Entity,
        world: &World,
        strategies: WeaponStrategies,
        variant: Box<dyn WeaponVariant>,
        current_tick: u64,
    ) -> Result<Self, ConfigError> {
        definition.validate()?;
        let launch_delay = definition.launch_delay_secs(variant.launch_animation_delay())?;

        // Platforms without a facing point North.
        let platform_forward = world
            .get::<&Facing>(platform)
            .map(|facing| facing.forward())
            .unwrap_or(DVec3::Y);

        Ok(Self {
            id,
            target_type: definition.target_type,
            definition,
            platform,
            strategies,
            variant,
            effective: EffectiveDefinitionCache::default(),
            current_target: None,
            platform_forward,
            sequence: FiringSequence::new(secs_to_ticks(launch_delay), current_tick),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn definition(&self) -> &WeaponDefinition {
        &self.definition
    }

    pub fn platform(&self) -> Entity {
        self.platform
    }

    pub fn platform_forward(&self) -> DVec3 {
        self.platform_forward
    }

    pub fn current_target(&self) -> Option<HeldTarget> {
        self.current_target
    }

    pub fn phase(&self) -> FiringPhase {
        self.sequence.phase()
    }

    pub fn sequence(&self) -> &FiringSequence {
        &self.sequence
    }

    pub fn aim(&self) -> f64 {
        self.variant.aim()
    }

    /// Effective definition if it has been computed.
    pub fn cached_effective_definition(&self) -> Option<EffectiveWeaponDefinition> {
        self.effective.cached()
    }

    /// Cached effective definition, computed from the platform's current
    /// position on first access.
    pub fn effective_definition(&mut self, world: &World) -> EffectiveWeaponDefinition {
        let calculator = &self.strategies.calculator;
        let definition = &self.definition;
        let platform = self.platform;
        self.effective
            .get_or_compute(|| calculator.calculate(definition, platform_position(world, platform)))
    }

    /// Recompute the effective definition for `position` and replace the cache.
    pub fn recalculate_effective_definition(&mut self, position: Position) -> EffectiveWeaponDefinition {
        let value = self.strategies.calculator.calculate(&self.definition, position);
        self.effective.replace(value)
    }

    /// Weapon mount position: on top of the platform.
    pub fn position(&self, world: &World) -> Position {
        let base = platform_position(world, self.platform);
        Position::new(base.x, base.y, base.z + WEAPON_MOUNT_HEIGHT)
    }

    pub fn is_cancelled(&self) -> bool {
        self.sequence.cancellation().is_cancelled()
    }

    /// Cancel all work. Returns `true` the first time only.
    pub fn destroy(&mut self) -> bool {
        self.current_target = None;
        self.sequence.cancellation().cancel()
    }

    /// Run one tick: tracking first, then the firing sequence.
    pub fn update(&mut self, world: &mut World, events: &mut Vec<SimEvent>, current_tick: u64) {
        if self.is_cancelled() {
            // Lets the sequence record its termination; no hooks run.
            self.current_target = None;
            let mut env = self.sequence_env(world, events, current_tick);
            self.sequence.advance(self.variant.as_mut(), None, &mut env);
            return;
        }

        self.track(world, events);

        let held_position = self
            .current_target
            .and_then(|held| world.get::<&Position>(held.entity).ok().map(|pos| *pos));
        let mut env = self.sequence_env(world, events, current_tick);
        self.sequence.advance(self.variant.as_mut(), held_position, &mut env);
    }

    /// Per-tick tracking: acquire when empty, drop when invalid, else let the
    /// variant track.
    pub fn track(&mut self, world: &World, events: &mut Vec<SimEvent>) {
        let held = match self.current_target {
            Some(held) => held,
            None => match self.try_acquire_target(world) {
                Some(held) => {
                    debug!(weapon_id = self.id, enemy_id = held.enemy_id, "target acquired");
                    events.push(SimEvent::TargetAcquired {
                        tower_id: self.id,
                        enemy_id: held.enemy_id,
                    });
                    self.current_target = Some(held);
                    held
                }
                None => return,
            },
        };

        if !self.is_target_in_range_and_alive(world, held.entity) {
            debug!(weapon_id = self.id, enemy_id = held.enemy_id, "target lost");
            events.push(SimEvent::TargetLost {
                tower_id: self.id,
                enemy_id: held.enemy_id,
            });
            self.current_target = None;
            return;
        }

        let Ok(position) = world.get::<&Position>(held.entity).map(|pos| *pos) else {
            return;
        };
        let target = TrackedTarget {
            entity: held.entity,
            enemy_id: held.enemy_id,
            position,
        };
        let cx = TrackContext {
            weapon_position: self.position(world),
            dt: DT,
        };
        self.variant.track_target(&target, &cx);
    }

    /// Ask the locator for a target. `None` is the normal idle outcome.
    pub fn try_acquire_target(&mut self, world: &World) -> Option<HeldTarget> {
        let effective = self.effective_definition(world);
        let entity = self.strategies.locator.locate(
            world,
            self.position(world),
            self.platform_forward,
            self.target_type,
            &effective,
        )?;
        let enemy_id = world.get::<&Enemy>(entity).ok()?.id;
        Some(HeldTarget { entity, enemy_id })
    }

    /// False when the entity is gone or dead, else the locator's range check.
    pub fn is_target_in_range_and_alive(&mut self, world: &World, target: Entity) -> bool {
        let Ok(target_position) = world.get::<&Position>(target).map(|pos| *pos) else {
            return false;
        };
        if let Ok(health) = world.get::<&Health>(target) {
            if !health.is_alive() {
                return false;
            }
        }
        let effective = self.effective_definition(world);
        self.strategies.locator.is_in_attack_range(
            self.position(world),
            target_position,
            self.platform_forward,
            &effective,
        )
    }

    fn sequence_env<'w>(
        &mut self,
        world: &'w mut World,
        events: &'w mut Vec<SimEvent>,
        current_tick: u64,
    ) -> SequenceEnv<'w> {
        SequenceEnv {
            weapon_id: self.id,
            weapon_position: self.position(world),
            effective: self.effective_definition(world),
            target_type: self.target_type,
            current_tick,
            world,
            events,
        }
    }
}

fn platform_position(world: &World, platform: Entity) -> Position {
    world
        .get::<&Position>(platform)
        .map(|pos| *pos)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests;
