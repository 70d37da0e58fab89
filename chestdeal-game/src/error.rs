use chestdeal_core::Phase;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("chestdeal core error: {0}")]
    Core(#[from] chestdeal_core::CoreError),

    #[error("Scan failed: {0}")]
    ReaderFailure(String),

    #[error("Code {0} does not belong to any player in this game")]
    UnknownPlayerCode(String),

    #[error("Chest {code} was already scanned during {phase}")]
    ExhaustedProposal { code: String, phase: Phase },

    #[error("Not enough players: need {need}, have {have}")]
    InsufficientPlayers { have: usize, need: usize },

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("A scan is already in progress")]
    ScannerBusy,

    #[error("Invalid game state: {0}")]
    InvalidState(String),
}

impl GameError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Errors that leave the game untouched and only need a re-scan
    pub fn is_rescan(&self) -> bool {
        matches!(
            self,
            GameError::ReaderFailure(_)
                | GameError::UnknownPlayerCode(_)
                | GameError::ExhaustedProposal { .. }
                | GameError::ScannerBusy
        )
    }
}
