use crate::{error::GameError, words::WordSource};
use serde::Deserialize;

pub const DEFAULT_DISCUSSION_SECONDS: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Length of every discussion countdown, restored at the start of each round.
    pub discussion_seconds: u32,
    /// Catalog preselected before the word-selection screen.
    pub word_source: WordSource,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { discussion_seconds: DEFAULT_DISCUSSION_SECONDS, word_source: WordSource::Classic }
    }
}

impl GameConfig {
    pub fn validate(self) -> Result<Self, GameError> {
        if self.discussion_seconds == 0 {
            return Err(GameError::InvalidConfig("discussion_seconds must be at least 1"));
        }

        Ok(self)
    }
}
