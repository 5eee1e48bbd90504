//! Firing sequence: cooldown → wait for target → wind-up → launch → rewind → repeat.
//!
//! Driven once per tick by the owning weapon. Cancellation is observed at the
//! top of every tick and before every phase starts; a hook that is already
//! running is never interrupted by the sequence itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hecs::World;
use tracing::{debug, trace};

use bastion_core::definitions::EffectiveWeaponDefinition;
use bastion_core::enums::{FiringPhase, TargetType};
use bastion_core::events::SimEvent;
use bastion_core::types::Position;

use super::hooks::{HookContext, WeaponVariant};

/// One-shot cancellation flag shared between a weapon and its hooks.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Request cancellation. Returns `true` only for the call that flipped the flag.
    pub fn cancel(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Weapon state the sequence needs while advancing.
pub struct SequenceEnv<'w> {
    pub weapon_id: u32,
    pub weapon_position: Position,
    pub effective: EffectiveWeaponDefinition,
    pub target_type: TargetType,
    pub current_tick: u64,
    pub world: &'w mut World,
    pub events: &'w mut Vec<SimEvent>,
}

/// State of one weapon's launch loop.
#[derive(Debug, Clone)]
pub struct FiringSequence {
    phase: FiringPhase,
    /// Tick at which the current phase started.
    phase_start_tick: u64,
    /// Cooldown before each cycle, always at least one tick.
    cooldown_ticks: u64,
    /// Position captured when the current cycle committed to a target.
    target_position: Option<Position>,
    cycles_completed: u64,
    cancellation: CancellationToken,
}

impl FiringSequence {
    /// Start a sequence in `CoolingDown` at `start_tick`.
    pub fn new(cooldown_ticks: u64, start_tick: u64) -> Self {
        Self {
            phase: FiringPhase::CoolingDown,
            phase_start_tick: start_tick,
            cooldown_ticks: cooldown_ticks.max(1),
            target_position: None,
            cycles_completed: 0,
            cancellation: CancellationToken::default(),
        }
    }

    pub fn phase(&self) -> FiringPhase {
        self.phase
    }

    pub fn cooldown_ticks(&self) -> u64 {
        self.cooldown_ticks
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// Position the current cycle is committed to, if past the capture point.
    pub fn target_position(&self) -> Option<Position> {
        self.target_position
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == FiringPhase::Terminated
    }

    /// Advance as far as possible within the current tick.
    ///
    /// `held_target` is the position of the target currently held by the
    /// tracking loop, read at this tick.
    pub fn advance(
        &mut self,
        variant: &mut dyn WeaponVariant,
        held_target: Option<Position>,
        env: &mut SequenceEnv<'_>,
    ) {
        loop {
            if self.phase == FiringPhase::Terminated {
                return;
            }
            if self.cancellation.is_cancelled() {
                self.terminate(env.weapon_id);
                return;
            }

            let elapsed_ticks = env.current_tick.saturating_sub(self.phase_start_tick);

            match self.phase {
                FiringPhase::CoolingDown => {
                    if elapsed_ticks < self.cooldown_ticks {
                        return;
                    }
                    match held_target {
                        Some(position) => self.commit(position, env.current_tick),
                        None => self.enter(FiringPhase::WaitingForTarget, env.current_tick),
                    }
                }
                FiringPhase::WaitingForTarget => match held_target {
                    Some(position) => self.commit(position, env.current_tick),
                    None => return,
                },
                FiringPhase::AnimatingStart => {
                    let mut cx = hook_context(env, elapsed_ticks, &self.cancellation);
                    if variant.start_animation(&mut cx).is_pending() {
                        return;
                    }
                    self.enter(FiringPhase::Launching, env.current_tick);
                }
                FiringPhase::Launching => {
                    let Some(target) = self.target_position else {
                        self.enter(FiringPhase::WaitingForTarget, env.current_tick);
                        continue;
                    };
                    let mut cx = hook_context(env, elapsed_ticks, &self.cancellation);
                    if variant.launch_projectile(target, &mut cx).is_pending() {
                        return;
                    }
                    self.enter(FiringPhase::Rewinding, env.current_tick);
                }
                FiringPhase::Rewinding => {
                    let mut cx = hook_context(env, elapsed_ticks, &self.cancellation);
                    if variant.rewind_animation(&mut cx).is_pending() {
                        return;
                    }
                    self.cycles_completed += 1;
                    self.target_position = None;
                    self.enter(FiringPhase::CoolingDown, env.current_tick);
                }
                FiringPhase::Terminated => return,
            }
        }
    }

    /// Snapshot the target position and begin the wind-up.
    fn commit(&mut self, position: Position, tick: u64) {
        self.target_position = Some(position);
        self.enter(FiringPhase::AnimatingStart, tick);
    }

    fn enter(&mut self, phase: FiringPhase, tick: u64) {
        trace!(from = ?self.phase, to = ?phase, tick, "firing phase");
        self.phase = phase;
        self.phase_start_tick = tick;
    }

    fn terminate(&mut self, weapon_id: u32) {
        debug!(
            weapon_id,
            phase = ?self.phase,
            cycles = self.cycles_completed,
            "firing sequence cancelled"
        );
        self.phase = FiringPhase::Terminated;
        self.target_position = None;
    }
}

fn hook_context<'c>(
    env: &'c mut SequenceEnv<'_>,
    elapsed_ticks: u64,
    cancellation: &'c CancellationToken,
) -> HookContext<'c> {
    HookContext::new(
        env.weapon_id,
        env.weapon_position,
        env.effective,
        env.target_type,
        env.current_tick,
        elapsed_ticks,
        &mut *env.world,
        &mut *env.events,
        cancellation,
    )
}
