use crate::{GameError, Result};
use chestdeal_core::{GameConfig, Player, PlayerColor, RosterStore};
use std::collections::HashSet;
use std::sync::Arc;

/// One player per color, at most one per color, every chest code distinct
pub fn check_roster(players: &[Player]) -> Result<()> {
    if players.len() > PlayerColor::ALL.len() {
        return Err(GameError::InvalidRoster(format!(
            "{} players, at most {} allowed",
            players.len(),
            PlayerColor::ALL.len()
        )));
    }

    let mut colors = HashSet::new();
    let mut codes = HashSet::new();
    for player in players {
        if !colors.insert(player.color) {
            return Err(GameError::InvalidRoster(format!(
                "color {} registered twice",
                player.color
            )));
        }
        if !codes.insert(player.code.as_str()) {
            return Err(GameError::InvalidRoster(format!(
                "chest code {} shared by several players",
                player.code
            )));
        }
    }

    Ok(())
}

/// Result of toggling a color during setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChange {
    Added(Player),
    Removed(Player),
}

/// Players registered for the next game. Every change is written through to the store.
pub struct RosterManager {
    players: Vec<Player>,
    store: Arc<dyn RosterStore>,
    min_players: usize,
}

impl RosterManager {
    /// Restore whatever roster the store holds for the current session
    pub async fn load(store: Arc<dyn RosterStore>, config: &GameConfig) -> Result<Self> {
        let players = store.load().await?;
        check_roster(&players)?;

        tracing::debug!("Loaded roster with {} players", players.len());
        Ok(Self {
            players,
            store,
            min_players: config.min_players,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn min_players(&self) -> usize {
        self.min_players
    }

    pub fn contains(&self, color: PlayerColor) -> bool {
        self.players.iter().any(|p| p.color == color)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.code == code)
    }

    pub fn can_start(&self) -> bool {
        self.players.len() >= self.min_players
    }

    /// Add a player for `color`, or remove the one already holding it
    pub async fn toggle(&mut self, color: PlayerColor) -> Result<RosterChange> {
        let mut players = self.players.clone();
        let change = match players.iter().position(|p| p.color == color) {
            Some(index) => RosterChange::Removed(players.remove(index)),
            None => {
                let player = Player::new(color);
                players.push(player.clone());
                RosterChange::Added(player)
            }
        };

        // only adopt the new roster once it is stored
        self.store.save(&players).await?;
        self.players = players;

        match &change {
            RosterChange::Added(player) => {
                tracing::info!("Player {} joined with code {}", player.color, player.code)
            }
            RosterChange::Removed(player) => tracing::info!("Player {} left", player.color),
        }
        Ok(change)
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.store.save(&[]).await?;
        self.players.clear();

        tracing::info!("Roster cleared");
        Ok(())
    }
}

impl std::fmt::Debug for RosterManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterManager")
            .field("players", &self.players)
            .field("min_players", &self.min_players)
            .finish()
    }
}
