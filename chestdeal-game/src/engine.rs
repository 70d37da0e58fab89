use crate::log::TransactionLog;
use crate::proposal::{generate_proposals, ProposalPool, ProposalRounds};
use crate::roster::check_roster;
use crate::{GameError, Result};
use chestdeal_core::{ChestTransaction, GameConfig, Instruction, Phase, Player, Proposal};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Phase state machine for one table. Each accepted scan moves exactly one chest.
#[derive(Debug)]
pub struct RoundEngine {
    players: Vec<Player>,
    phase: Phase,
    move_count: usize,
    rounds: Option<ProposalRounds>,
    returned: HashSet<String>,
    log: TransactionLog,
    last_instruction: Option<Instruction>,
    completed_cycles: usize,
    rng: StdRng,
}

impl RoundEngine {
    pub fn new(players: Vec<Player>, config: &GameConfig) -> Result<Self> {
        Self::with_rng(players, config, StdRng::from_entropy())
    }

    /// Deterministic proposal rounds, for tests and replays
    pub fn with_seed(players: Vec<Player>, config: &GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(players, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(players: Vec<Player>, config: &GameConfig, rng: StdRng) -> Result<Self> {
        check_roster(&players)?;
        if players.len() < config.min_players {
            return Err(GameError::InsufficientPlayers {
                have: players.len(),
                need: config.min_players,
            });
        }

        let log = TransactionLog::new(config.log_capacity(players.len()));

        tracing::info!("Round engine ready for {} players", players.len());
        Ok(Self {
            players,
            phase: Phase::MakeFirstProposals,
            move_count: 0,
            rounds: None,
            returned: HashSet::new(),
            log,
            last_instruction: None,
            completed_cycles: 0,
            rng,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn log(&self) -> &TransactionLog {
        &self.log
    }

    pub fn last_instruction(&self) -> Option<&Instruction> {
        self.last_instruction.as_ref()
    }

    pub fn completed_cycles(&self) -> usize {
        self.completed_cycles
    }

    /// True right after the last return of a cycle, before the next scan
    pub fn is_cycle_complete(&self) -> bool {
        self.completed_cycles > 0 && self.phase == Phase::MakeFirstProposals && self.move_count == 0
    }

    /// Scans needed to run all four phases once
    pub fn scans_per_cycle(&self) -> usize {
        Phase::ALL.len() * self.players.len()
    }

    /// Remaining first-round proposals, `None` until generated for this cycle
    pub fn first_round(&self) -> Option<&ProposalPool> {
        self.rounds.as_ref().map(|r| &r.first)
    }

    pub fn second_round(&self) -> Option<&ProposalPool> {
        self.rounds.as_ref().map(|r| &r.second)
    }

    /// Resolve one scanned chest code into the move the operator has to make.
    ///
    /// Rejected codes leave every counter, pool and log entry untouched.
    pub fn apply_code(&mut self, code: &str) -> Result<Instruction> {
        let owner = match self.players.iter().find(|p| p.code == code) {
            Some(player) => player.clone(),
            None => {
                tracing::warn!("Rejected scan of unknown code {}", code);
                return Err(GameError::UnknownPlayerCode(code.to_string()));
            }
        };

        let phase = self.phase;
        let entry = if phase.is_return() {
            if self.returned.contains(&owner.code) {
                return Err(self.exhausted(code));
            }
            self.returned.insert(owner.code.clone());
            ChestTransaction::return_to(owner, phase)
        } else {
            let players = &self.players;
            let rng = &mut self.rng;
            let rounds = self
                .rounds
                .get_or_insert_with(|| generate_proposals(players, rng));
            let pool = match phase {
                Phase::MakeFirstProposals => &mut rounds.first,
                _ => &mut rounds.second,
            };

            match pool.take_from(code) {
                Some(proposal) => ChestTransaction::give(proposal, phase),
                None => return Err(self.exhausted(code)),
            }
        };

        tracing::debug!(
            "{} ({}/{}): {}",
            phase,
            self.move_count + 1,
            self.players.len(),
            entry.describe()
        );

        let instruction = entry.instruction();
        self.log.record(entry);
        self.last_instruction = Some(instruction.clone());

        self.move_count += 1;
        if self.move_count == self.players.len() {
            self.advance_phase();
        }

        Ok(instruction)
    }

    fn exhausted(&self, code: &str) -> GameError {
        tracing::warn!("Chest {} already handled during {}", code, self.phase);
        GameError::ExhaustedProposal {
            code: code.to_string(),
            phase: self.phase,
        }
    }

    fn advance_phase(&mut self) {
        self.move_count = 0;
        self.returned.clear();
        self.phase = self.phase.next();

        if self.phase == Phase::MakeFirstProposals {
            // full cycle done, next scan deals fresh rounds
            self.rounds = None;
            self.completed_cycles += 1;
            tracing::info!("Game cycle {} complete", self.completed_cycles);
        } else {
            tracing::info!("Entering phase: {}", self.phase);
        }
    }

    /// Restart from the first phase with the same players
    pub fn reset(&mut self) {
        self.phase = Phase::MakeFirstProposals;
        self.move_count = 0;
        self.rounds = None;
        self.returned.clear();
        self.log.clear();
        self.last_instruction = None;
        self.completed_cycles = 0;

        tracing::info!("Round engine reset");
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            phase_index: self.phase.index(),
            move_count: self.move_count,
            instructions: self.phase.instruction_text().to_string(),
            last_instruction: self.last_instruction.clone(),
            first_round: self
                .first_round()
                .map(|pool| pool.iter().cloned().collect())
                .unwrap_or_default(),
            second_round: self
                .second_round()
                .map(|pool| pool.iter().cloned().collect())
                .unwrap_or_default(),
            log: self.log.to_vec(),
            completed_cycles: self.completed_cycles,
        }
    }
}

/// Read-only view of the engine for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: Phase,
    pub phase_index: usize,
    pub move_count: usize,
    pub instructions: String,
    pub last_instruction: Option<Instruction>,
    pub first_round: Vec<Proposal>,
    pub second_round: Vec<Proposal>,
    pub log: Vec<ChestTransaction>,
    pub completed_cycles: usize,
}
