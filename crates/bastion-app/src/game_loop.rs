//! Game loop thread: runs the simulation engine at 30 Hz and publishes snapshots.
//!
//! The engine is created inside the thread so the thread owns it outright.
//! Commands arrive via an `mpsc` channel. The latest snapshot is stored in
//! shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use bastion_core::commands::SimCommand;
use bastion_core::constants::TICK_RATE;
use bastion_core::enums::GamePhase;
use bastion_core::state::{ScoreView, SimSnapshot};
use bastion_sim::engine::{SimConfig, SimulationEngine};
use bastion_sim::scenario::Scenario;
use bastion_sim::systems::wave_spawner::WaveSchedule;

use crate::state::GameLoopCommand;

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Everything needed to start a run.
#[derive(Debug, Clone)]
pub struct LoopSetup {
    pub config: SimConfig,
    pub wave_schedule: WaveSchedule,
    /// Queued before the first tick, in order.
    pub initial_commands: Vec<SimCommand>,
    /// Stop after this many simulated ticks. `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

impl LoopSetup {
    /// Place the scenario's towers, schedule its waves, then start the mission.
    pub fn from_scenario(config: SimConfig, scenario: &Scenario, max_ticks: Option<u64>) -> Self {
        let mut initial_commands = scenario.tower_commands();
        initial_commands.push(SimCommand::StartMission);
        Self {
            config,
            wave_schedule: scenario.wave_schedule(),
            initial_commands,
            max_ticks,
        }
    }

    fn build_engine(self) -> (SimulationEngine, Option<u64>) {
        let mut engine = SimulationEngine::new(self.config);
        engine.set_wave_schedule(self.wave_schedule);
        engine.queue_commands(self.initial_commands);
        (engine, self.max_ticks)
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed_secs: f64,
    pub phase: GamePhase,
    pub score: ScoreView,
    pub towers: usize,
}

impl RunSummary {
    fn from_snapshot(snapshot: &SimSnapshot) -> Self {
        Self {
            ticks: snapshot.time.tick,
            elapsed_secs: snapshot.time.elapsed_secs,
            phase: snapshot.phase,
            score: snapshot.score.clone(),
            towers: snapshot.towers.len(),
        }
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the handle yielding the run summary.
pub fn spawn_game_loop(
    setup: LoopSetup,
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<RunSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("bastion-game-loop".into())
        .spawn(move || run_game_loop(setup, cmd_rx, &latest_snapshot))
        .context("failed to spawn game loop thread")?;

    Ok((cmd_tx, handle))
}

/// Run as fast as possible on the current thread, without pacing or a
/// command channel.
pub fn run_headless(setup: LoopSetup) -> (RunSummary, SimSnapshot) {
    let (mut engine, max_ticks) = setup.build_engine();
    let max_ticks = max_ticks.unwrap_or(u64::MAX);

    let mut snapshot = engine.tick();
    while snapshot.time.tick < max_ticks && snapshot.phase == GamePhase::Active {
        snapshot = engine.tick();
    }
    (RunSummary::from_snapshot(&snapshot), snapshot)
}

/// The game loop. Runs until a Shutdown command, channel disconnect or the
/// tick limit.
fn run_game_loop(
    setup: LoopSetup,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SimSnapshot>>,
) -> RunSummary {
    let (mut engine, max_ticks) = setup.build_engine();
    let mut next_tick_time = Instant::now();
    let mut summary = RunSummary::from_snapshot(&SimSnapshot::default());

    info!(tick_rate = TICK_RATE, "game loop started");
    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Command(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(ticks = summary.ticks, "game loop stopped");
                    return summary;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();
        summary = RunSummary::from_snapshot(&snapshot);
        for event in &snapshot.events {
            debug!(tick = snapshot.time.tick, ?event, "sim event");
        }

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if max_ticks.is_some_and(|max| summary.ticks >= max) {
            info!(ticks = summary.ticks, "tick limit reached");
            return summary;
        }

        // 4. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind: reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}
