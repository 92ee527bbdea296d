//! HTTP backend for the dice roller.
//!
//! [`Server`] owns the single game session. Every mutation (roll, reset, load) goes through
//! one async mutex, so concurrent requests cannot lose updates. [`Api`] exposes it over axum.

use diceroller_execution::{DiceSource, GameRng, GameStore};
use diceroller_types::{GameError, GameState, RollCommand, RollOutcome, RollRequest};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

mod api;
pub use api::{Api, ApiError};

mod config;
pub use config::{ServerConfig, DEFAULT_STATE_PATH};

mod persistence;
pub use persistence::{PersistenceError, SnapshotStore};

struct Session {
    store: GameStore,
    dice: Box<dyn DiceSource + Send>,
}

pub struct Server {
    pub config: ServerConfig,
    session: Mutex<Session>,
    snapshots: Arc<SnapshotStore>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        let dice = match config.dice_seed {
            Some(seed) => GameRng::seeded(seed),
            None => GameRng::from_entropy(),
        };
        Self::with_dice(config, Box::new(dice))
    }

    pub fn with_dice(config: ServerConfig, dice: Box<dyn DiceSource + Send>) -> Self {
        let snapshots = Arc::new(SnapshotStore::new(config.state_path.clone()));
        Self {
            config,
            session: Mutex::new(Session {
                store: GameStore::new(),
                dice,
            }),
            snapshots,
        }
    }

    /// Validates and applies one roll request.
    pub async fn roll(&self, request: RollRequest) -> Result<RollOutcome, GameError> {
        let command = match RollCommand::try_from(request) {
            Ok(command) => command,
            Err(err) => {
                warn!(%err, "roll rejected");
                return Err(err);
            }
        };

        let mut session = self.session.lock().await;
        let Session { store, dice } = &mut *session;
        let outcome = store.roll(command, dice.as_mut())?;
        if self.config.autosave && !outcome.event.is_terminal() {
            self.autosave(store.get()).await;
        }
        Ok(outcome)
    }

    pub async fn state(&self) -> GameState {
        self.session.lock().await.store.get()
    }

    pub async fn reset(&self) -> GameState {
        let mut session = self.session.lock().await;
        let state = session.store.reset();
        if self.config.autosave {
            self.autosave(state.clone()).await;
        }
        state
    }

    /// Writes the current state to the snapshot file.
    pub async fn save(&self) -> Result<PathBuf, PersistenceError> {
        let session = self.session.lock().await;
        self.write_snapshot(session.store.get()).await?;
        info!(path = %self.snapshots.path().display(), "snapshot saved");
        Ok(self.snapshots.path().to_path_buf())
    }

    /// Reads the snapshot file and makes it the live state.
    pub async fn load(&self) -> Result<GameState, PersistenceError> {
        let mut session = self.session.lock().await;
        let snapshots = self.snapshots.clone();
        let state = tokio::task::spawn_blocking(move || snapshots.load())
            .await
            .map_err(|err| PersistenceError::Task(err.to_string()))??;
        session.store.replace(state.clone());
        info!(
            path = %self.snapshots.path().display(),
            total_rolls = state.total_rolls,
            rounds = state.rounds,
            "snapshot loaded"
        );
        Ok(state)
    }

    async fn write_snapshot(&self, state: GameState) -> Result<(), PersistenceError> {
        let snapshots = self.snapshots.clone();
        tokio::task::spawn_blocking(move || snapshots.save(&state))
            .await
            .map_err(|err| PersistenceError::Task(err.to_string()))?
    }

    // Autosave failures are logged only; the in-memory session is unaffected.
    async fn autosave(&self, state: GameState) {
        if let Err(err) = self.write_snapshot(state).await {
            warn!(%err, "autosave failed");
        }
    }
}
