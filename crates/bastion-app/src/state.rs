//! Runner state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, bail, Context, Result};

use bastion_core::commands::SimCommand;
use bastion_core::state::SimSnapshot;

use crate::game_loop::{self, LoopSetup, RunSummary};

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A command to forward to the simulation engine.
    Command(SimCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle on a running game loop.
///
/// - `mpsc::Sender` sits behind a `Mutex` so the state can be shared
/// - the latest snapshot is shared with the game loop thread
pub struct AppState {
    /// `None` before `start` is called.
    command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each tick.
    latest_snapshot: Arc<Mutex<Option<SimSnapshot>>>,
    handle: Mutex<Option<JoinHandle<RunSummary>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            handle: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.lock().map(|h| h.is_some()).unwrap_or(false)
    }

    /// Spawn the game loop thread. Fails if one is already running.
    pub fn start(&self, setup: LoopSetup) -> Result<()> {
        let mut handle = self.handle.lock().map_err(|e| anyhow!("{e}"))?;
        if handle.is_some() {
            bail!("simulation already running");
        }

        let (cmd_tx, join) = game_loop::spawn_game_loop(setup, self.latest_snapshot.clone())?;
        *self.command_tx.lock().map_err(|e| anyhow!("{e}"))? = Some(cmd_tx);
        *handle = Some(join);
        Ok(())
    }

    /// Forward a command to the simulation.
    pub fn send_command(&self, command: SimCommand) -> Result<()> {
        let tx = self.command_tx.lock().map_err(|e| anyhow!("{e}"))?;
        match tx.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::Command(command))
                .context("game loop has stopped"),
            None => bail!("simulation not started"),
        }
    }

    /// Latest snapshot, if at least one tick has run.
    pub fn latest_snapshot(&self) -> Option<SimSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }

    /// Wait for the loop to finish on its own.
    pub fn join(&self) -> Result<RunSummary> {
        let join = self
            .handle
            .lock()
            .map_err(|e| anyhow!("{e}"))?
            .take()
            .context("simulation not started")?;
        join.join().map_err(|_| anyhow!("game loop thread panicked"))
    }

    /// Ask the loop to stop and wait for it.
    pub fn shutdown(&self) -> Result<RunSummary> {
        if let Some(tx) = self.command_tx.lock().map_err(|e| anyhow!("{e}"))?.take() {
            // The loop may already have exited on its own.
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        self.join()
    }
}
