use async_trait::async_trait;
use chestdeal_core::{CodeReader, CoreError, Player, Result};
use dialoguer::Input;
use parking_lot::Mutex;

/// Reads one code per line from the terminal. Handheld scanners in
/// keyboard mode type the decoded token followed by Enter.
pub struct PromptReader;

#[async_trait]
impl CodeReader for PromptReader {
    async fn scan(&self) -> Result<String> {
        let line = tokio::task::spawn_blocking(|| {
            Input::<String>::new()
                .with_prompt("Scan a chest")
                .allow_empty(true)
                .interact_text()
        })
        .await
        .map_err(|e| CoreError::reader(format!("scanner task failed: {}", e)))?
        .map_err(|e| CoreError::reader(e.to_string()))?;

        let code = line.trim();
        if code.is_empty() {
            return Err(CoreError::reader("nothing was scanned"));
        }
        Ok(code.to_string())
    }
}

/// Stand-in scanner that walks the roster in seat order, one chest per scan
#[derive(Default)]
pub struct SimulatedReader {
    state: Mutex<SimulatedState>,
}

#[derive(Default)]
struct SimulatedState {
    codes: Vec<String>,
    next: usize,
}

impl SimulatedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_players(&self, players: &[Player]) {
        let mut state = self.state.lock();
        state.codes = players.iter().map(|p| p.code.clone()).collect();
        state.next = 0;
    }
}

#[async_trait]
impl CodeReader for SimulatedReader {
    async fn scan(&self) -> Result<String> {
        let mut state = self.state.lock();
        if state.codes.is_empty() {
            return Err(CoreError::reader("no chests to simulate"));
        }

        let code = state.codes[state.next % state.codes.len()].clone();
        state.next += 1;
        Ok(code)
    }
}
