//! Tests for target acquisition, tracking and the firing sequence of a single weapon.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::Poll;

use glam::DVec3;
use hecs::{Entity, World};

use bastion_core::components::{Enemy, Facing, Health, Tower};
use bastion_core::definitions::{EffectiveWeaponDefinition, WeaponDefinition};
use bastion_core::enums::{FiringPhase, TargetType, WeaponKind};
use bastion_core::error::ConfigError;
use bastion_core::events::SimEvent;
use bastion_core::types::Position;

use super::hooks::{HookContext, TrackContext, TrackedTarget, WeaponVariant};
use super::{Weapon, WeaponStrategies};
use crate::locator::{NearestInArcLocator, TargetLocator};
use crate::stats::{FlatStatCalculator, StatCalculator};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Track(u32),
    Start(u64),
    Launch(u64, Position),
    Rewind(u64),
}

/// Variant that records every hook invocation.
struct Recording {
    calls: Arc<Mutex<Vec<Call>>>,
    start_secs: f64,
    lead_secs: f64,
    cancel_on_start: bool,
}

impl WeaponVariant for Recording {
    fn start_animation(&mut self, cx: &mut HookContext<'_>) -> Poll<()> {
        if !cx.has_elapsed(self.start_secs) {
            return Poll::Pending;
        }
        self.calls.lock().unwrap().push(Call::Start(cx.current_tick));
        if self.cancel_on_start {
            cx.cancellation.cancel();
        }
        Poll::Ready(())
    }

    fn launch_projectile(&mut self, target: Position, cx: &mut HookContext<'_>) -> Poll<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Launch(cx.current_tick, target));
        Poll::Ready(())
    }

    fn rewind_animation(&mut self, cx: &mut HookContext<'_>) -> Poll<()> {
        self.calls.lock().unwrap().push(Call::Rewind(cx.current_tick));
        Poll::Ready(())
    }

    fn track_target(&mut self, target: &TrackedTarget, _cx: &TrackContext) {
        self.calls.lock().unwrap().push(Call::Track(target.enemy_id));
    }

    fn launch_animation_delay(&self) -> f64 {
        self.lead_secs
    }
}

struct CountingCalculator {
    calls: Arc<AtomicUsize>,
}

impl StatCalculator for CountingCalculator {
    fn calculate(&self, base: &WeaponDefinition, position: Position) -> EffectiveWeaponDefinition {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut effective = EffectiveWeaponDefinition::from(base);
        effective.max_range += position.x;
        effective
    }
}

struct CountingLocator {
    locates: Arc<AtomicUsize>,
}

impl TargetLocator for CountingLocator {
    fn locate(
        &self,
        world: &World,
        origin: Position,
        forward: DVec3,
        target_type: TargetType,
        effective: &EffectiveWeaponDefinition,
    ) -> Option<Entity> {
        self.locates.fetch_add(1, Ordering::SeqCst);
        NearestInArcLocator.locate(world, origin, forward, target_type, effective)
    }

    fn is_in_attack_range(
        &self,
        origin: Position,
        target: Position,
        forward: DVec3,
        effective: &EffectiveWeaponDefinition,
    ) -> bool {
        NearestInArcLocator.is_in_attack_range(origin, target, forward, effective)
    }
}

fn definition(fire_rate_every_secs: f64) -> WeaponDefinition {
    WeaponDefinition {
        id: "test".into(),
        name: "Test".into(),
        kind: WeaponKind::Ballista,
        target_type: TargetType::Ground,
        fire_rate_every_secs,
        min_range: 0.0,
        max_range: 30.0,
        attack_angle_degrees: 360.0,
        damage: 10.0,
        splash_radius: 0.0,
        projectile_speed: 50.0,
        launch_animation_secs: 0.5,
        rewind_animation_secs: 0.0,
        turn_rate_degrees: 90.0,
    }
}

fn flat_strategies() -> WeaponStrategies {
    WeaponStrategies {
        calculator: Arc::new(FlatStatCalculator),
        locator: Arc::new(NearestInArcLocator),
    }
}

fn spawn_tower(world: &mut World) -> Entity {
    world.spawn((
        Tower {
            id: 1,
            footprint_radius: 1.0,
        },
        Position::new(0.0, 0.0, 0.0),
        Facing::from_degrees(0.0),
    ))
}

fn spawn_enemy(world: &mut World, id: u32, position: Position) -> Entity {
    world.spawn((
        Enemy {
            id,
            target_type: TargetType::Ground,
        },
        position,
        Health::new(1_000.0),
    ))
}

struct Rig {
    world: World,
    weapon: Weapon,
    calls: Arc<Mutex<Vec<Call>>>,
    events: Vec<SimEvent>,
}

impl Rig {
    fn new(lead_secs: f64, start_secs: f64, cancel_on_start: bool) -> Self {
        let mut world = World::new();
        let tower = spawn_tower(&mut world);
        let calls = Arc::new(Mutex::new(Vec::new()));
        let variant = Recording {
            calls: calls.clone(),
            start_secs,
            lead_secs,
            cancel_on_start,
        };
        let weapon = Weapon::new(
            1,
            definition(2.0),
            tower,
            &world,
            flat_strategies(),
            Box::new(variant),
            0,
        )
        .unwrap();
        Self {
            world,
            weapon,
            calls,
            events: Vec::new(),
        }
    }

    fn run(&mut self, ticks: std::ops::RangeInclusive<u64>) {
        for tick in ticks {
            self.weapon.update(&mut self.world, &mut self.events, tick);
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn phase_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Track(_)))
            .collect()
    }
}

// ---- Construction ----

#[test]
fn test_cooldown_is_interval_minus_lead() {
    let rig = Rig::new(0.5, 0.5, false);
    // (2.0 - 0.5)s at 30 Hz
    assert_eq!(rig.weapon.sequence().cooldown_ticks(), 45);
    assert_eq!(rig.weapon.phase(), FiringPhase::CoolingDown);
}

#[test]
fn test_non_positive_launch_delay_is_rejected() {
    let mut world = World::new();
    let tower = spawn_tower(&mut world);
    for lead in [2.0, 2.5] {
        let result = Weapon::new(
            1,
            definition(2.0),
            tower,
            &world,
            flat_strategies(),
            Box::new(Recording {
                calls: Arc::default(),
                start_secs: 0.0,
                lead_secs: lead,
                cancel_on_start: false,
            }),
            0,
        );
        assert!(matches!(
            result,
            Err(ConfigError::NonPositiveLaunchDelay { .. })
        ));
    }
}

#[test]
fn test_platform_forward_captured_at_spawn() {
    let mut world = World::new();
    let tower = world.spawn((Position::default(), Facing::from_degrees(90.0)));
    let weapon = Weapon::new(
        1,
        definition(2.0),
        tower,
        &world,
        flat_strategies(),
        Box::new(Recording {
            calls: Arc::default(),
            start_secs: 0.0,
            lead_secs: 0.0,
            cancel_on_start: false,
        }),
        0,
    )
    .unwrap();

    // Turning the tower afterwards does not change the weapon's forward
    world.get::<&mut Facing>(tower).unwrap().yaw = 0.0;
    assert!((weapon.platform_forward().x - 1.0).abs() < 1e-9);
}

#[test]
fn test_platform_without_facing_points_north() {
    let mut world = World::new();
    let tower = world.spawn((Position::default(),));
    let weapon = Weapon::new(
        1,
        definition(2.0),
        tower,
        &world,
        flat_strategies(),
        Box::new(Recording {
            calls: Arc::default(),
            start_secs: 0.0,
            lead_secs: 0.0,
            cancel_on_start: false,
        }),
        0,
    )
    .unwrap();
    assert_eq!(weapon.platform_forward(), DVec3::Y);
}

// ---- Effective definition cache ----

#[test]
fn test_effective_definition_is_cached() {
    let mut world = World::new();
    let tower = world.spawn((Position::new(5.0, 0.0, 0.0), Facing::default()));
    let counter = Arc::new(AtomicUsize::new(0));
    let strategies = WeaponStrategies {
        calculator: Arc::new(CountingCalculator {
            calls: counter.clone(),
        }),
        locator: Arc::new(NearestInArcLocator),
    };
    let mut weapon = Weapon::new(
        1,
        definition(2.0),
        tower,
        &world,
        strategies,
        Box::new(Recording {
            calls: Arc::default(),
            start_secs: 0.0,
            lead_secs: 0.0,
            cancel_on_start: false,
        }),
        0,
    )
    .unwrap();

    // Lazy: nothing computed at construction
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert!(weapon.cached_effective_definition().is_none());

    let first = weapon.effective_definition(&world);
    let second = weapon.effective_definition(&world);
    let third = weapon.effective_definition(&world);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(first.max_range, 35.0);

    // Moving the tower does not invalidate the cache
    world.get::<&mut Position>(tower).unwrap().x = 50.0;
    assert_eq!(weapon.effective_definition(&world).max_range, 35.0);

    // Recompute-then-read returns the fresh value
    let fresh = weapon.recalculate_effective_definition(Position::new(50.0, 0.0, 0.0));
    assert_eq!(fresh.max_range, 80.0);
    assert_eq!(weapon.effective_definition(&world), fresh);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

// ---- Acquisition & tracking ----

#[test]
fn test_no_target_no_tracking_and_parks_waiting() {
    let mut rig = Rig::new(0.5, 0.5, false);
    rig.run(0..=600);

    assert!(rig.calls().is_empty());
    assert_eq!(rig.weapon.phase(), FiringPhase::WaitingForTarget);
    assert!(rig.weapon.current_target().is_none());
    assert!(rig.events.is_empty());
}

#[test]
fn test_locator_only_queried_while_empty_handed() {
    let mut world = World::new();
    let tower = spawn_tower(&mut world);
    spawn_enemy(&mut world, 7, Position::new(0.0, 10.0, 0.0));
    let locates = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut weapon = Weapon::new(
        1,
        definition(2.0),
        tower,
        &world,
        WeaponStrategies {
            calculator: Arc::new(FlatStatCalculator),
            locator: Arc::new(CountingLocator {
                locates: locates.clone(),
            }),
        },
        Box::new(Recording {
            calls: calls.clone(),
            start_secs: 0.0,
            lead_secs: 0.0,
            cancel_on_start: false,
        }),
        0,
    )
    .unwrap();

    let mut events = Vec::new();
    for _ in 0..10 {
        weapon.track(&world, &mut events);
    }
    assert_eq!(locates.load(Ordering::SeqCst), 1);
    assert_eq!(calls.lock().unwrap().len(), 10);
    assert_eq!(
        events,
        vec![SimEvent::TargetAcquired {
            tower_id: 1,
            enemy_id: 7
        }]
    );
}

#[test]
fn test_target_out_of_range_is_dropped_without_tracking() {
    let mut rig = Rig::new(0.5, 0.5, false);
    let enemy = spawn_enemy(&mut rig.world, 3, Position::new(0.0, 10.0, 0.0));
    rig.run(0..=2);
    assert_eq!(rig.calls().len(), 3);

    rig.world.get::<&mut Position>(enemy).unwrap().y = 100.0;
    rig.run(3..=3);

    assert_eq!(rig.calls().len(), 3, "no tracking call on the tick the target is dropped");
    assert!(rig.weapon.current_target().is_none());
    assert!(rig.events.contains(&SimEvent::TargetLost {
        tower_id: 1,
        enemy_id: 3
    }));
}

#[test]
fn test_dead_target_is_dropped() {
    let mut rig = Rig::new(0.5, 0.5, false);
    let enemy = spawn_enemy(&mut rig.world, 3, Position::new(0.0, 10.0, 0.0));
    rig.run(0..=0);
    assert!(rig.weapon.current_target().is_some());

    rig.world.get::<&mut Health>(enemy).unwrap().current = 0.0;
    rig.run(1..=1);
    assert!(rig.weapon.current_target().is_none());
    assert!(!rig.weapon.is_target_in_range_and_alive(&rig.world, enemy));
}

// ---- Firing sequence ----

#[test]
fn test_target_lost_mid_animation_still_launches_at_snapshot() {
    let mut rig = Rig::new(0.5, 0.5, false);
    let p = Position::new(0.0, 12.0, 0.0);
    let enemy = spawn_enemy(&mut rig.world, 4, p);

    // Cooldown ends at tick 45: position captured, wind-up starts
    rig.run(0..=45);
    assert_eq!(rig.weapon.phase(), FiringPhase::AnimatingStart);
    assert_eq!(rig.weapon.sequence().target_position(), Some(p));

    // Target destroyed during the wind-up
    rig.world.despawn(enemy).unwrap();
    rig.run(46..=60);

    assert_eq!(
        rig.phase_calls(),
        vec![Call::Start(60), Call::Launch(60, p), Call::Rewind(60)]
    );
    assert!(rig.weapon.current_target().is_none());

    // Next cycle has nothing to shoot at
    rig.run(61..=400);
    assert_eq!(rig.weapon.phase(), FiringPhase::WaitingForTarget);
    assert_eq!(rig.phase_calls().len(), 3);
    assert_eq!(rig.weapon.sequence().cycles_completed(), 1);
}

#[test]
fn test_waiting_sequence_fires_once_target_appears() {
    let mut rig = Rig::new(0.5, 0.0, false);
    rig.run(0..=100);
    assert_eq!(rig.weapon.phase(), FiringPhase::WaitingForTarget);

    let p = Position::new(5.0, 5.0, 0.0);
    spawn_enemy(&mut rig.world, 9, p);
    rig.run(101..=101);

    assert_eq!(
        rig.phase_calls(),
        vec![Call::Start(101), Call::Launch(101, p), Call::Rewind(101)]
    );
    assert_eq!(rig.weapon.phase(), FiringPhase::CoolingDown);
}

#[test]
fn test_steady_state_five_cycles_in_ten_seconds() {
    let mut rig = Rig::new(0.5, 0.5, false);
    let enemy = spawn_enemy(&mut rig.world, 1, Position::new(10.0, 0.0, 0.0));

    // Target moves 0.05 m east per tick and stays within range.
    for tick in 0..=300u64 {
        rig.world.get::<&mut Position>(enemy).unwrap().x = 10.0 + tick as f64 * 0.05;
        rig.run(tick..=tick);
    }

    let launches: Vec<(u64, Position)> = rig
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Launch(tick, pos) => Some((tick, pos)),
            _ => None,
        })
        .collect();

    assert_eq!(launches.len(), 5);
    for (cycle, (tick, pos)) in launches.iter().enumerate() {
        let cycle = cycle as u64;
        assert_eq!(*tick, 60 * (cycle + 1));
        // Captured when the cooldown ended, 15 ticks before release
        let capture_tick = 60 * cycle + 45;
        assert!((pos.x - (10.0 + capture_tick as f64 * 0.05)).abs() < 1e-9);
    }
    assert_eq!(rig.weapon.sequence().cycles_completed(), 5);
}

// ---- Cancellation ----

#[test]
fn test_cancel_during_cooldown() {
    let mut rig = Rig::new(0.5, 0.5, false);
    spawn_enemy(&mut rig.world, 1, Position::new(0.0, 10.0, 0.0));
    rig.run(0..=20);
    let tracked = rig.calls().len();
    assert_eq!(rig.weapon.phase(), FiringPhase::CoolingDown);

    assert!(rig.weapon.destroy());
    rig.run(21..=300);

    assert_eq!(rig.calls().len(), tracked, "no hooks after destruction");
    assert!(rig.phase_calls().is_empty());
    assert_eq!(rig.weapon.phase(), FiringPhase::Terminated);
    assert!(rig.weapon.sequence().is_terminated());
}

#[test]
fn test_cancel_while_waiting_for_target() {
    let mut rig = Rig::new(0.5, 0.5, false);
    rig.run(0..=100);
    assert_eq!(rig.weapon.phase(), FiringPhase::WaitingForTarget);

    rig.weapon.destroy();
    spawn_enemy(&mut rig.world, 1, Position::new(0.0, 10.0, 0.0));
    rig.run(101..=300);

    assert!(rig.calls().is_empty());
    assert_eq!(rig.weapon.phase(), FiringPhase::Terminated);
    assert!(rig.weapon.sequence().is_terminated());
}

#[test]
fn test_cancel_during_animation_skips_remaining_phases() {
    let mut rig = Rig::new(0.5, 0.5, false);
    spawn_enemy(&mut rig.world, 1, Position::new(0.0, 10.0, 0.0));
    rig.run(0..=50);
    assert_eq!(rig.weapon.phase(), FiringPhase::AnimatingStart);

    rig.weapon.destroy();
    rig.run(51..=300);

    assert!(rig.phase_calls().is_empty());
    assert_eq!(rig.weapon.phase(), FiringPhase::Terminated);
    assert!(rig.weapon.sequence().is_terminated());
}

#[test]
fn test_cancel_between_phases_from_hook() {
    let mut rig = Rig::new(0.5, 0.0, true);
    spawn_enemy(&mut rig.world, 1, Position::new(0.0, 10.0, 0.0));
    rig.run(0..=300);

    // The wind-up ran, then the checkpoint before launch saw the cancellation
    assert_eq!(rig.phase_calls(), vec![Call::Start(45)]);
    assert_eq!(rig.weapon.phase(), FiringPhase::Terminated);
    assert!(rig.weapon.sequence().is_terminated());
    assert_eq!(rig.weapon.sequence().cycles_completed(), 0);

    // Tracking stopped with the sequence
    let tracks = rig.calls().len();
    rig.run(301..=320);
    assert_eq!(rig.calls().len(), tracks);
}

/// Cancels its own weapon from inside a wind-up that never finishes.
struct CancelMidWindup {
    start_polls: Arc<AtomicUsize>,
    launches: Arc<AtomicUsize>,
}

impl WeaponVariant for CancelMidWindup {
    fn start_animation(&mut self, cx: &mut HookContext<'_>) -> Poll<()> {
        self.start_polls.fetch_add(1, Ordering::SeqCst);
        cx.cancellation.cancel();
        Poll::Pending
    }

    fn launch_projectile(&mut self, _target: Position, _cx: &mut HookContext<'_>) -> Poll<()> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(())
    }

    fn rewind_animation(&mut self, _cx: &mut HookContext<'_>) -> Poll<()> {
        Poll::Ready(())
    }

    fn track_target(&mut self, _target: &TrackedTarget, _cx: &TrackContext) {}
}

#[test]
fn test_cancel_from_pending_hook_abandons_phase_next_tick() {
    let mut world = World::new();
    let tower = spawn_tower(&mut world);
    spawn_enemy(&mut world, 1, Position::new(0.0, 10.0, 0.0));
    let start_polls = Arc::new(AtomicUsize::new(0));
    let launches = Arc::new(AtomicUsize::new(0));
    let mut weapon = Weapon::new(
        1,
        definition(2.0),
        tower,
        &world,
        flat_strategies(),
        Box::new(CancelMidWindup {
            start_polls: start_polls.clone(),
            launches: launches.clone(),
        }),
        0,
    )
    .unwrap();
    let mut events = Vec::new();

    // No launch delay: the wind-up starts when the 60-tick cooldown ends.
    for tick in 0..=60 {
        weapon.update(&mut world, &mut events, tick);
    }
    assert_eq!(start_polls.load(Ordering::SeqCst), 1);
    assert_eq!(weapon.phase(), FiringPhase::AnimatingStart);
    assert!(!weapon.sequence().is_terminated());

    // The pending wind-up is not polled again.
    for tick in 61..=200 {
        weapon.update(&mut world, &mut events, tick);
    }
    assert_eq!(start_polls.load(Ordering::SeqCst), 1);
    assert_eq!(launches.load(Ordering::SeqCst), 0);
    assert!(weapon.sequence().is_terminated());
}

#[test]
fn test_destroy_reports_first_call_only() {
    let mut rig = Rig::new(0.5, 0.5, false);
    assert!(rig.weapon.destroy());
    assert!(!rig.weapon.destroy());
    assert!(rig.weapon.is_cancelled());
}
