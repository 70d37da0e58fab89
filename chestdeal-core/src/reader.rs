//! Scanner capability.
//!
//! The game never decodes anything itself: a [`CodeReader`] resolves one
//! physical scan into the opaque code printed on a player's token.

use crate::error::{CoreError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[async_trait]
pub trait CodeReader: Send + Sync {
    /// Resolve a single scan. Completes exactly once, with a code or a capture error.
    async fn scan(&self) -> Result<String>;
}

/// Reader that replays a fixed list of outcomes, mostly for tests and demos.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    outcomes: Mutex<VecDeque<std::result::Result<String, String>>>,
}

impl ScriptedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reader = Self::new();
        for code in codes {
            reader.push_code(code);
        }
        reader
    }

    pub fn push_code(&self, code: impl Into<String>) {
        self.outcomes.lock().push_back(Ok(code.into()));
    }

    pub fn push_failure(&self, reason: impl Into<String>) {
        self.outcomes.lock().push_back(Err(reason.into()));
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.lock().len()
    }
}

#[async_trait]
impl CodeReader for ScriptedReader {
    async fn scan(&self) -> Result<String> {
        let next = self.outcomes.lock().pop_front();
        match next {
            Some(Ok(code)) => Ok(code),
            Some(Err(reason)) => Err(CoreError::reader(reason)),
            None => Err(CoreError::reader("no scripted scans left")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_reader_replays_in_order() {
        let reader = ScriptedReader::from_codes(["a", "b"]);
        reader.push_failure("lens covered");

        assert_eq!(reader.scan().await.unwrap(), "a");
        assert_eq!(reader.scan().await.unwrap(), "b");
        assert!(matches!(reader.scan().await, Err(CoreError::Reader(_))));
        assert!(reader.scan().await.is_err());
        assert_eq!(reader.remaining(), 0);
    }
}
