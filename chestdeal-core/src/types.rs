use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Chest colors available at the table. One player per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Red,
        PlayerColor::Blue,
        PlayerColor::Green,
        PlayerColor::Yellow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::Red => "RED",
            PlayerColor::Blue => "BLUE",
            PlayerColor::Green => "GREEN",
            PlayerColor::Yellow => "YELLOW",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerColor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        PlayerColor::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidColor(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub code: String,
    pub color: PlayerColor,
}

impl Player {
    /// New player with a freshly generated code
    pub fn new(color: PlayerColor) -> Self {
        Self {
            code: Uuid::new_v4().to_string(),
            color,
        }
    }

    pub fn with_code(color: PlayerColor, code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            color,
        }
    }
}

/// Directed exchange obligation for one round: `from` hands its chest to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub from: Player,
    pub to: Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    MakeFirstProposals,
    ReturnChests,
    MakeSecondProposals,
    ReturnChestsAgain,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::MakeFirstProposals,
        Phase::ReturnChests,
        Phase::MakeSecondProposals,
        Phase::ReturnChestsAgain,
    ];

    pub fn index(&self) -> usize {
        match self {
            Phase::MakeFirstProposals => 0,
            Phase::ReturnChests => 1,
            Phase::MakeSecondProposals => 2,
            Phase::ReturnChestsAgain => 3,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Following phase, wrapping back to the first one after the last.
    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Phase::ReturnChests | Phase::ReturnChestsAgain)
    }

    /// How many times the chests have been scanned once this phase starts (1..=4)
    pub fn pass(&self) -> usize {
        self.index() + 1
    }

    pub fn action(&self) -> ChestAction {
        if self.is_return() {
            ChestAction::Return
        } else {
            ChestAction::Give
        }
    }

    pub fn instruction_text(&self) -> &'static str {
        match self {
            Phase::MakeFirstProposals => {
                "Scan the chests one at a time and give each to the indicated player."
            }
            Phase::ReturnChests => {
                "Scan the chests a second time, one at a time, and return each to the indicated player."
            }
            Phase::MakeSecondProposals => {
                "Scan the chests a third time, one at a time, and give each to the indicated player."
            }
            Phase::ReturnChestsAgain => {
                "Scan the chests a fourth time, one at a time, and return each to the indicated player."
            }
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::MakeFirstProposals => "make first proposals",
            Phase::ReturnChests => "return chests",
            Phase::MakeSecondProposals => "make second proposals",
            Phase::ReturnChestsAgain => "return chests again",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestAction {
    Give,
    Return,
}

/// Operator instruction for the chest that was just scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub action: ChestAction,
    pub target: PlayerColor,
    pub phase: Phase,
}

impl Instruction {
    pub fn text(&self) -> String {
        let verb = match self.action {
            ChestAction::Give => "Give",
            ChestAction::Return => "Return",
        };
        format!("{} the scanned chest to player {}", verb, self.target)
    }
}

/// One resolved scan. `from` is empty for a return to the chest's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestTransaction {
    pub from: Option<Player>,
    pub to: Player,
    pub phase: Phase,
    pub recorded_at: DateTime<Utc>,
}

impl ChestTransaction {
    pub fn give(proposal: Proposal, phase: Phase) -> Self {
        Self {
            from: Some(proposal.from),
            to: proposal.to,
            phase,
            recorded_at: Utc::now(),
        }
    }

    pub fn return_to(owner: Player, phase: Phase) -> Self {
        Self {
            from: None,
            to: owner,
            phase,
            recorded_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> ChestAction {
        self.phase.action()
    }

    pub fn instruction(&self) -> Instruction {
        Instruction {
            action: self.kind(),
            target: self.to.color,
            phase: self.phase,
        }
    }

    pub fn describe(&self) -> String {
        match self.kind() {
            ChestAction::Give => format!("Gave a chest to player {}", self.to.color),
            ChestAction::Return => format!("Returned a chest to player {}", self.to.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!("red".parse::<PlayerColor>().unwrap(), PlayerColor::Red);
        assert_eq!(" Yellow ".parse::<PlayerColor>().unwrap(), PlayerColor::Yellow);
        assert!(matches!(
            "purple".parse::<PlayerColor>(),
            Err(CoreError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_phase_cycle() {
        let mut phase = Phase::MakeFirstProposals;
        let mut visited = Vec::new();
        for _ in 0..5 {
            visited.push(phase.index());
            phase = phase.next();
        }
        assert_eq!(visited, vec![0, 1, 2, 3, 0]);
        assert!(Phase::ReturnChests.is_return());
        assert!(!Phase::MakeSecondProposals.is_return());
        assert_eq!(Phase::ReturnChestsAgain.pass(), 4);
    }

    #[test]
    fn test_instruction_texts_are_distinct() {
        let texts: std::collections::HashSet<_> =
            Phase::ALL.iter().map(|p| p.instruction_text()).collect();
        assert_eq!(texts.len(), 4);
    }

    #[test]
    fn test_transaction_kind() {
        let red = Player::with_code(PlayerColor::Red, "r");
        let blue = Player::with_code(PlayerColor::Blue, "b");

        let give = ChestTransaction::give(
            Proposal {
                from: red.clone(),
                to: blue.clone(),
            },
            Phase::MakeFirstProposals,
        );
        assert_eq!(give.kind(), ChestAction::Give);
        assert_eq!(give.describe(), "Gave a chest to player BLUE");
        assert_eq!(
            give.instruction().text(),
            "Give the scanned chest to player BLUE"
        );

        let ret = ChestTransaction::return_to(red, Phase::ReturnChests);
        assert_eq!(ret.kind(), ChestAction::Return);
        assert_eq!(ret.describe(), "Returned a chest to player RED");
    }

    #[test]
    fn test_player_codes_are_unique() {
        let a = Player::new(PlayerColor::Green);
        let b = Player::new(PlayerColor::Green);
        assert_ne!(a.code, b.code);
    }
}
