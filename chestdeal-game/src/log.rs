use chestdeal_core::ChestTransaction;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Bounded history of resolved scans, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLog {
    entries: VecDeque<ChestTransaction>,
    capacity: usize,
}

impl TransactionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, entry: ChestTransaction) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&ChestTransaction> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChestTransaction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_vec(&self) -> Vec<ChestTransaction> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chestdeal_core::{Phase, Player, PlayerColor};

    #[test]
    fn test_newest_first_and_bounded() {
        let mut log = TransactionLog::new(3);
        for color in PlayerColor::ALL {
            log.record(ChestTransaction::return_to(
                Player::with_code(color, color.as_str()),
                Phase::ReturnChests,
            ));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.latest().unwrap().to.color, PlayerColor::Yellow);
        let order: Vec<_> = log.iter().map(|t| t.to.color).collect();
        assert_eq!(
            order,
            vec![PlayerColor::Yellow, PlayerColor::Green, PlayerColor::Blue]
        );

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.capacity(), 3);
    }
}
