use crate::{session::WinCondition, PlayerId};
use serde::Serialize;

/// Semantic cues for the feedback surface (sound effects, haptics, toasts).
/// The core only records them; the surface drains and maps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted { players: usize },
    NameClaimed { player: PlayerId },
    NameRejected { player: PlayerId },
    RoleRevealed { player: PlayerId },
    DiscussionStarted { round: u32 },
    VotingStarted { round: u32 },
    /// Carries no voter or target, only how many ballots are still to come.
    VoteCast { remaining: usize },
    NextVoter,
    TieDeclared { tied: Vec<PlayerId> },
    RevoteCalled,
    PlayerEliminated { player: PlayerId },
    NoElimination,
    RoundAdvanced { round: u32 },
    GameOver { winner: WinCondition },
    ActionRejected,
}

/// Buffered events, handed out in the order they were raised.
#[derive(Debug, Default)]
pub struct EventQueue(Vec<GameEvent>);

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.0.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.0.drain(..)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
