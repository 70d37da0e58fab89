//! Proposal generation for the two give rounds.
//!
//! Players are shuffled once per cycle. Round one pairs each player with its
//! cyclic successor in the shuffled order, round two with the player two
//! seats further on, so for four players nobody faces the same partner twice.
//! With three players round two is round one reversed.

use chestdeal_core::{Player, Proposal};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Proposals still waiting to be resolved by a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalPool {
    proposals: Vec<Proposal>,
}

impl ProposalPool {
    pub fn new(proposals: Vec<Proposal>) -> Self {
        Self { proposals }
    }

    /// Remove and return the proposal made by the player holding `code`.
    /// `None` means that player already used theirs, or never had one.
    pub fn take_from(&mut self, code: &str) -> Option<Proposal> {
        let index = self.proposals.iter().position(|p| p.from.code == code)?;
        Some(self.proposals.remove(index))
    }

    pub fn peek_from(&self, code: &str) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.from.code == code)
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }
}

/// Both give rounds for one game cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRounds {
    pub first: ProposalPool,
    pub second: ProposalPool,
}

/// Fisher-Yates: walk down from the last slot, swapping each with a random earlier (or same) slot
pub fn shuffle_players<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> Vec<Player> {
    let mut shuffled = players.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

fn round_with_offset(shuffled: &[Player], offset: usize) -> Vec<Proposal> {
    let n = shuffled.len();
    shuffled
        .iter()
        .enumerate()
        .map(|(i, proposer)| Proposal {
            from: proposer.clone(),
            to: shuffled[(i + offset) % n].clone(),
        })
        .collect()
}

pub fn generate_proposals<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> ProposalRounds {
    let shuffled = shuffle_players(players, rng);

    if shuffled.len() < 4 {
        tracing::warn!(
            "Only {} players: second round mirrors the first",
            shuffled.len()
        );
    }

    let rounds = ProposalRounds {
        first: ProposalPool::new(round_with_offset(&shuffled, 1)),
        second: ProposalPool::new(round_with_offset(&shuffled, 2)),
    };

    for (label, pool) in [("first", &rounds.first), ("second", &rounds.second)] {
        for proposal in pool.iter() {
            tracing::debug!(
                "{} round: {} -> {}",
                label,
                proposal.from.color,
                proposal.to.color
            );
        }
    }

    rounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use chestdeal_core::PlayerColor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster(n: usize) -> Vec<Player> {
        PlayerColor::ALL
            .iter()
            .take(n)
            .map(|&color| Player::with_code(color, color.as_str().to_lowercase()))
            .collect()
    }

    fn assert_derangement(pool: &ProposalPool, players: &[Player]) {
        assert_eq!(pool.len(), players.len());

        let proposers: HashSet<_> = pool.iter().map(|p| p.from.code.clone()).collect();
        let receivers: HashSet<_> = pool.iter().map(|p| p.to.code.clone()).collect();
        let everyone: HashSet<_> = players.iter().map(|p| p.code.clone()).collect();

        assert_eq!(proposers, everyone);
        assert_eq!(receivers, everyone);
        assert!(pool.iter().all(|p| p.from != p.to));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let players = roster(4);
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = shuffle_players(&players, &mut rng);

        let mut sorted = shuffled.clone();
        sorted.sort_by_key(|p| p.color);
        assert_eq!(sorted, players);
    }

    #[test]
    fn test_rounds_are_derangements() {
        for n in 3..=4 {
            let players = roster(n);
            for seed in 0..32 {
                let mut rng = StdRng::seed_from_u64(seed);
                let rounds = generate_proposals(&players, &mut rng);
                assert_derangement(&rounds.first, &players);
                assert_derangement(&rounds.second, &players);
            }
        }
    }

    #[test]
    fn test_second_round_changes_partner_for_four() {
        let players = roster(4);
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let rounds = generate_proposals(&players, &mut rng);

            for first in rounds.first.iter() {
                let second = rounds.second.peek_from(&first.from.code).unwrap();
                assert_ne!(first.to, second.to);
            }
        }
    }

    #[test]
    fn test_three_players_second_round_is_reversed() {
        let players = roster(3);
        let mut rng = StdRng::seed_from_u64(11);
        let rounds = generate_proposals(&players, &mut rng);

        for second in rounds.second.iter() {
            let reverse = rounds.first.peek_from(&second.to.code).unwrap();
            assert_eq!(reverse.to, second.from);
        }
    }

    #[test]
    fn test_same_seed_same_rounds() {
        let players = roster(4);
        let a = generate_proposals(&players, &mut StdRng::seed_from_u64(3));
        let b = generate_proposals(&players, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_draining_pool() {
        let players = roster(4);
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = generate_proposals(&players, &mut rng).first;

        let mut seen = Vec::new();
        for player in &players {
            let proposal = pool.take_from(&player.code).unwrap();
            assert_eq!(proposal.from, *player);
            assert!(!seen.contains(&proposal));
            seen.push(proposal);

            assert!(pool.take_from(&player.code).is_none());
        }

        assert!(pool.is_empty());
        assert!(pool.take_from("anything").is_none());
    }
}
