//! Concrete weapon variants and the factory that picks one per weapon kind.

use std::f64::consts::{PI, TAU};
use std::task::Poll;

use tracing::debug;

use bastion_core::components::{Facing, Projectile};
use bastion_core::definitions::WeaponDefinition;
use bastion_core::enums::WeaponKind;
use bastion_core::events::SimEvent;
use bastion_core::types::Position;

use crate::weapon::hooks::{HookContext, TrackContext, TrackedTarget, WeaponVariant};

/// Build the variant for a definition's kind, aimed along the tower's facing.
pub fn build_variant(definition: &WeaponDefinition, facing: Facing) -> Box<dyn WeaponVariant> {
    match definition.kind {
        WeaponKind::Ballista => Box::new(Ballista::new(definition, facing)),
        WeaponKind::Catapult => Box::new(Catapult::new(definition, facing)),
    }
}

/// Turreted bolt thrower. Slews toward its target at a fixed turn rate.
#[derive(Debug, Clone)]
pub struct Ballista {
    draw_secs: f64,
    reload_secs: f64,
    /// Radians per second.
    turn_rate: f64,
    aim: f64,
}

impl Ballista {
    pub fn new(definition: &WeaponDefinition, facing: Facing) -> Self {
        Self {
            draw_secs: definition.launch_animation_secs,
            reload_secs: definition.rewind_animation_secs,
            turn_rate: definition.turn_rate_degrees.to_radians(),
            aim: facing.yaw,
        }
    }
}

impl WeaponVariant for Ballista {
    fn start_animation(&mut self, cx: &mut HookContext<'_>) -> Poll<()> {
        ready_after(cx, self.draw_secs)
    }

    fn launch_projectile(&mut self, target: Position, cx: &mut HookContext<'_>) -> Poll<()> {
        spawn_projectile(cx, target);
        Poll::Ready(())
    }

    fn rewind_animation(&mut self, cx: &mut HookContext<'_>) -> Poll<()> {
        ready_after(cx, self.reload_secs)
    }

    fn track_target(&mut self, target: &TrackedTarget, cx: &TrackContext) {
        let desired = cx.weapon_position.bearing_to(&target.position);
        let diff = shortest_turn(self.aim, desired);
        let max_step = self.turn_rate * cx.dt;
        let step = diff.clamp(-max_step, max_step);
        self.aim = (self.aim + step).rem_euclid(TAU);
    }

    fn launch_animation_delay(&self) -> f64 {
        self.draw_secs
    }

    fn aim(&self) -> f64 {
        self.aim
    }
}

/// Siege engine on a fixed mount. It only records where it would lob.
#[derive(Debug, Clone)]
pub struct Catapult {
    windup_secs: f64,
    reset_secs: f64,
    aim: f64,
}

impl Catapult {
    pub fn new(definition: &WeaponDefinition, facing: Facing) -> Self {
        Self {
            windup_secs: definition.launch_animation_secs,
            reset_secs: definition.rewind_animation_secs,
            aim: facing.yaw,
        }
    }
}

impl WeaponVariant for Catapult {
    fn start_animation(&mut self, cx: &mut HookContext<'_>) -> Poll<()> {
        ready_after(cx, self.windup_secs)
    }

    fn launch_projectile(&mut self, target: Position, cx: &mut HookContext<'_>) -> Poll<()> {
        self.aim = cx.weapon_position.bearing_to(&target);
        spawn_projectile(cx, target);
        Poll::Ready(())
    }

    fn rewind_animation(&mut self, cx: &mut HookContext<'_>) -> Poll<()> {
        ready_after(cx, self.reset_secs)
    }

    fn track_target(&mut self, _target: &TrackedTarget, _cx: &TrackContext) {}

    fn launch_animation_delay(&self) -> f64 {
        self.windup_secs
    }

    fn aim(&self) -> f64 {
        self.aim
    }
}

/// Timed phase that finishes after `secs`, or early if the weapon was cancelled.
fn ready_after(cx: &HookContext<'_>, secs: f64) -> Poll<()> {
    if cx.cancellation.is_cancelled() || cx.has_elapsed(secs) {
        Poll::Ready(())
    } else {
        Poll::Pending
    }
}

/// Spawn a projectile from the weapon mount toward `target` using the
/// weapon's effective stats.
fn spawn_projectile(cx: &mut HookContext<'_>, target: Position) {
    let projectile = Projectile {
        weapon_id: cx.weapon_id,
        impact_point: target,
        speed: cx.effective.projectile_speed,
        damage: cx.effective.damage,
        splash_radius: cx.effective.splash_radius,
        target_type: cx.target_type,
    };
    cx.world.spawn((projectile, cx.weapon_position));
    debug!(
        weapon_id = cx.weapon_id,
        x = target.x,
        y = target.y,
        tick = cx.current_tick,
        "projectile launched"
    );
    cx.events.push(SimEvent::ProjectileLaunched {
        tower_id: cx.weapon_id,
        target_position: target,
    });
}

/// Signed angle in (-PI, PI] to turn from `from` to `to`.
fn shortest_turn(from: f64, to: f64) -> f64 {
    let diff = (to - from).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}
