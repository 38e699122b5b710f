use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod error;
pub mod events;
pub mod rng;
pub mod screen;
pub mod session;
pub mod timer;
pub mod view;
pub mod voting;
pub mod words;

pub use config::GameConfig;
pub use error::GameError;
pub use events::GameEvent;
pub use rng::{RandomSource, ScriptedRandom};
pub use screen::{next_phase, Phase, ScreenController, ScreenEvent};
pub use session::{GameSession, NameClaim, WinCondition};
pub use timer::{DiscussionTimer, TimerToken, TimerTick};
pub use view::SessionView;
pub use voting::{Ballot, Resolution, Tally, VotingOutcome, VotingRound, VotingState};
pub use words::{WordPair, WordSource, BLANK_WORD};

pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 8;

/// Player count from which a Blank is dealt in addition to the Echo.
pub const BLANK_THRESHOLD: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u16);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Majority role, holds the civilian word.
    Cipher,
    /// Undercover role, holds the other word of the pair.
    Echo,
    /// Holds no word at all. Sides with the Echo.
    Blank,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Cipher => "Cipher",
            Role::Echo => "Echo",
            Role::Blank => "Blank",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single state instead of a pair of flags, so "alive" and "eliminated"
/// can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Alive,
    Eliminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub word: &'static str,
    state: PlayerState,
    name_claimed: bool,
}

impl Player {
    pub fn new(id: PlayerId, role: Role, word: &'static str) -> Self {
        Self {
            id,
            name: format!("Player {}", id.0 + 1),
            role,
            word,
            state: PlayerState::Alive,
            name_claimed: false,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    pub fn is_eliminated(&self) -> bool {
        !self.is_alive()
    }

    pub fn has_claimed_name(&self) -> bool {
        self.name_claimed
    }

    /// Returns true only on the call that actually flips the player.
    pub(crate) fn eliminate(&mut self) -> bool {
        let was_alive = self.is_alive();
        self.state = PlayerState::Eliminated;
        was_alive
    }

    pub(crate) fn claim_name(&mut self, name: String) {
        self.name = name;
        self.name_claimed = true;
    }

    pub(crate) fn assign(&mut self, role: Role, word: &'static str) {
        self.role = role;
        self.word = word;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_gets_a_default_name_and_is_alive() {
        let player = Player::new(PlayerId(2), Role::Cipher, "Cat");

        assert_eq!(player.name, "Player 3");
        assert!(player.is_alive());
        assert!(!player.is_eliminated());
        assert!(!player.has_claimed_name());
    }

    #[test]
    fn elimination_is_terminal_and_reported_once() {
        let mut player = Player::new(PlayerId(0), Role::Echo, "Dog");

        assert!(player.eliminate());
        assert!(!player.eliminate());
        assert_eq!(player.state(), PlayerState::Eliminated);
        assert_eq!(player.is_alive(), !player.is_eliminated());
    }
}
