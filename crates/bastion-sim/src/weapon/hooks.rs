//! Hooks supplied by concrete weapon variants.
//!
//! The firing sequence polls the three timed hooks once per tick until they
//! return `Poll::Ready(())`. A hook that is ready on its first poll takes no
//! simulated time, and the next phase starts in the same tick.

use std::task::Poll;

use hecs::{Entity, World};

use bastion_core::constants::secs_to_ticks;
use bastion_core::definitions::EffectiveWeaponDefinition;
use bastion_core::enums::TargetType;
use bastion_core::events::SimEvent;
use bastion_core::types::Position;

use super::sequence::CancellationToken;

/// Behaviour that differs between weapon kinds.
pub trait WeaponVariant: Send {
    /// Wind-up before release.
    fn start_animation(&mut self, cx: &mut HookContext<'_>) -> Poll<()>;

    /// Release a projectile toward `target`, a position captured before the
    /// wind-up started. The target entity may no longer exist.
    fn launch_projectile(&mut self, target: Position, cx: &mut HookContext<'_>) -> Poll<()>;

    /// Recovery after release.
    fn rewind_animation(&mut self, cx: &mut HookContext<'_>) -> Poll<()>;

    /// Called every tick a valid target is held, e.g. to turn toward it.
    fn track_target(&mut self, target: &TrackedTarget, cx: &TrackContext);

    /// Seconds of animation that precede a launch. Subtracted from the
    /// fire-rate interval to obtain the cooldown.
    fn launch_animation_delay(&self) -> f64 {
        0.0
    }

    /// Current aim direction (radians, 0 = North), for display.
    fn aim(&self) -> f64 {
        0.0
    }
}

/// The held target as seen by the tracking hook.
#[derive(Debug, Clone, Copy)]
pub struct TrackedTarget {
    pub entity: Entity,
    pub enemy_id: u32,
    pub position: Position,
}

/// Read-only context for the tracking hook.
#[derive(Debug, Clone, Copy)]
pub struct TrackContext {
    pub weapon_position: Position,
    pub dt: f64,
}

/// Everything a timed hook can see or touch during one poll.
pub struct HookContext<'a> {
    pub weapon_id: u32,
    pub weapon_position: Position,
    pub effective: EffectiveWeaponDefinition,
    pub target_type: TargetType,
    pub current_tick: u64,
    pub world: &'a mut World,
    pub events: &'a mut Vec<SimEvent>,
    /// The owning weapon's token. Hooks may check it to cut a long phase
    /// short, or cancel it to stop the weapon after the current phase.
    pub cancellation: &'a CancellationToken,
    elapsed_ticks: u64,
}

impl<'a> HookContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        weapon_id: u32,
        weapon_position: Position,
        effective: EffectiveWeaponDefinition,
        target_type: TargetType,
        current_tick: u64,
        elapsed_ticks: u64,
        world: &'a mut World,
        events: &'a mut Vec<SimEvent>,
        cancellation: &'a CancellationToken,
    ) -> Self {
        Self {
            weapon_id,
            weapon_position,
            effective,
            target_type,
            current_tick,
            world,
            events,
            cancellation,
            elapsed_ticks,
        }
    }

    /// Ticks since the current phase started.
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Whether at least `secs` of simulated time have passed in this phase,
    /// measured in whole ticks.
    pub fn has_elapsed(&self, secs: f64) -> bool {
        self.elapsed_ticks >= secs_to_ticks(secs)
    }
}
