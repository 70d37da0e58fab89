//! The game table ties the roster, the round engine and the scanner together.
//!
//! Setup and play are two stages of the same table. Only one scan may be in
//! flight at a time; the table lock is never held while the reader works, so
//! abandoning a scan (dropping its future) leaves the game exactly as it was.

use crate::engine::{RoundEngine, RoundSnapshot};
use crate::roster::{RosterChange, RosterManager};
use crate::{GameError, Result};
use chestdeal_core::{CodeReader, CoreError, GameConfig, Instruction, Player, PlayerColor};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStage {
    Setup,
    Playing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub stage: GameStage,
    pub players: Vec<Player>,
    pub can_start: bool,
    pub round: Option<RoundSnapshot>,
}

#[derive(Debug)]
struct TableState {
    stage: GameStage,
    roster: RosterManager,
    engine: Option<RoundEngine>,
}

/// Clears the in-flight flag however the scan ends
struct ScanGuard<'a>(&'a AtomicBool);

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct GameTable {
    state: Mutex<TableState>,
    reader: Arc<dyn CodeReader>,
    config: GameConfig,
    seed: Option<u64>,
    scanning: AtomicBool,
}

impl GameTable {
    pub fn new(roster: RosterManager, reader: Arc<dyn CodeReader>, config: GameConfig) -> Self {
        Self {
            state: Mutex::new(TableState {
                stage: GameStage::Setup,
                roster,
                engine: None,
            }),
            reader,
            config,
            seed: None,
            scanning: AtomicBool::new(false),
        }
    }

    /// Use a fixed seed for every game dealt at this table
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    pub async fn stage(&self) -> GameStage {
        self.state.lock().await.stage
    }

    pub async fn players(&self) -> Vec<Player> {
        self.state.lock().await.roster.players().to_vec()
    }

    pub async fn can_start(&self) -> bool {
        self.state.lock().await.roster.can_start()
    }

    pub async fn toggle(&self, color: PlayerColor) -> Result<RosterChange> {
        let mut state = self.state.lock().await;
        if state.stage != GameStage::Setup {
            return Err(GameError::invalid_state(
                "Players can only change before the game starts",
            ));
        }

        state.roster.toggle(color).await
    }

    pub async fn clear_roster(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.stage != GameStage::Setup {
            return Err(GameError::invalid_state(
                "Players can only change before the game starts",
            ));
        }

        state.roster.clear().await
    }

    pub async fn start(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.stage != GameStage::Setup {
            return Err(GameError::invalid_state("Game already started"));
        }

        if !state.roster.can_start() {
            tracing::warn!(
                "Cannot start with {} players, need {}",
                state.roster.len(),
                state.roster.min_players()
            );
            return Err(GameError::InsufficientPlayers {
                have: state.roster.len(),
                need: state.roster.min_players(),
            });
        }

        let players = state.roster.players().to_vec();
        let engine = match self.seed {
            Some(seed) => RoundEngine::with_seed(players, &self.config, seed)?,
            None => RoundEngine::new(players, &self.config)?,
        };

        state.engine = Some(engine);
        state.stage = GameStage::Playing;

        tracing::info!("Game started with {} players", state.roster.len());
        Ok(())
    }

    fn begin_scan(&self) -> Result<ScanGuard<'_>> {
        if self
            .scanning
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(GameError::ScannerBusy);
        }

        Ok(ScanGuard(&self.scanning))
    }

    /// Ask the reader for one code and play it
    pub async fn scan(&self) -> Result<Instruction> {
        let _guard = self.begin_scan()?;

        if self.stage().await != GameStage::Playing {
            return Err(GameError::invalid_state("Start the game before scanning"));
        }

        let code = match self.reader.scan().await {
            Ok(code) => code,
            Err(CoreError::Reader(reason)) => {
                tracing::warn!("Scan failed: {}", reason);
                return Err(GameError::ReaderFailure(reason));
            }
            Err(e) => {
                tracing::warn!("Scan failed: {}", e);
                return Err(GameError::ReaderFailure(e.to_string()));
            }
        };

        let mut state = self.state.lock().await;
        let engine = state
            .engine
            .as_mut()
            .ok_or_else(|| GameError::invalid_state("Game was ended during the scan"))?;

        engine.apply_code(code.trim())
    }

    /// Restart the phases with the same players
    pub async fn reset(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        match state.engine.as_mut() {
            Some(engine) => {
                engine.reset();
                Ok(())
            }
            None => Err(GameError::invalid_state("No game in progress")),
        }
    }

    /// Forget the players and go back to setup
    pub async fn new_game(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.roster.clear().await?;
        state.engine = None;
        state.stage = GameStage::Setup;

        tracing::info!("New game: back to setup");
        Ok(())
    }

    pub async fn snapshot(&self) -> TableSnapshot {
        let state = self.state.lock().await;
        TableSnapshot {
            stage: state.stage,
            players: state.roster.players().to_vec(),
            can_start: state.roster.can_start(),
            round: state.engine.as_ref().map(|engine| engine.snapshot()),
        }
    }
}
