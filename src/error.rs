use crate::{screen::Phase, screen::ScreenEvent, voting::VotingState, PlayerId};
use thiserror::Error;

/// Everything the core can reject. A rejected action never leaves partial
/// state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("player count {0} is outside the supported range {min}..={max}", min = crate::MIN_PLAYERS, max = crate::MAX_PLAYERS)]
    InvalidPlayerCount(usize),

    #[error("the name \"{0}\" is already taken")]
    DuplicateName(String),

    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),

    #[error("player {0} is not an eligible vote target")]
    IneligibleTarget(PlayerId),

    #[error("{event:?} is not allowed during {phase:?}")]
    InvalidTransition { phase: Phase, event: ScreenEvent },

    #[error("action needs {expected:?} but the game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("voting action not allowed while {0:?}")]
    WrongVotingState(VotingState),

    #[error("player {0} has already claimed a name")]
    NameAlreadyClaimed(PlayerId),

    #[error("player {0} must claim a name and reveal their role first")]
    RoleAssignmentIncomplete(PlayerId),

    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
