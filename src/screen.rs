//! Screen sequencing.
//!
//! [`next_phase`] is the whole transition table and has no side effects.
//! [`ScreenController`] is what a surface talks to: it validates an action,
//! runs the matching event through the table, and applies the session and
//! voting side effects that go with it.

use crate::{
    config::GameConfig,
    error::GameError,
    events::{EventQueue, GameEvent},
    rng::RandomSource,
    session::{GameSession, NameClaim, WinCondition},
    timer::{TimerTick, TimerToken},
    voting::{VotingRound, VotingState},
    words::WordSource,
    Player, PlayerId,
};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Welcome,
    ModeSelect,
    /// The simulated lobby lives outside the core. The controller only enters and leaves it.
    OnlineMode,
    WordSelection,
    PlayerCount,
    RoleAssignment,
    Discussion,
    Voting,
    EliminationAnnouncement,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenEvent {
    Begin,
    PlayOnline,
    PlayLocal,
    Back,
    WordsChosen,
    RolesAssigned,
    RolesDistributed,
    VotingCalled,
    VotingResolved,
    EliminationSkipped,
    NextRound,
    GameDecided,
    Reset,
}

pub fn next_phase(phase: Phase, event: ScreenEvent) -> Result<Phase, GameError> {
    use Phase::*;
    use ScreenEvent::*;

    let next = match (phase, event) {
        (_, Reset) => Welcome,

        (Welcome, Begin) => ModeSelect,
        (ModeSelect, PlayOnline) => OnlineMode,
        (ModeSelect, PlayLocal) => WordSelection,
        (ModeSelect, Back) => Welcome,
        (OnlineMode, Back) => ModeSelect,
        (WordSelection, WordsChosen) => PlayerCount,
        (WordSelection, Back) => ModeSelect,
        (PlayerCount, RolesAssigned) => RoleAssignment,
        (PlayerCount, Back) => WordSelection,
        (RoleAssignment, RolesDistributed) => Discussion,
        (Discussion, VotingCalled) => Voting,
        (Voting, VotingResolved) => EliminationAnnouncement,
        (Voting, EliminationSkipped) => Discussion,
        (EliminationAnnouncement, NextRound) => Discussion,
        (EliminationAnnouncement, GameDecided) => GameOver,

        (phase, event) => return Err(GameError::InvalidTransition { phase, event }),
    };

    Ok(next)
}

/// Who is holding the device during role assignment, and what they've done so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RevealCursor {
    index: usize,
    revealed: bool,
}

/// What the interstitial after a vote shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Announcement {
    pub eliminated: Option<PlayerId>,
}

pub struct ScreenController<R> {
    session: GameSession,
    rng: R,
    reveal: RevealCursor,
    voting: Option<VotingRound>,
    announcement: Option<Announcement>,
    winner: Option<WinCondition>,
    events: EventQueue,
}

impl<R: RandomSource> ScreenController<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<Self, GameError> {
        let config = config.validate()?;

        Ok(Self {
            session: GameSession::new(config),
            rng,
            reveal: RevealCursor::default(),
            voting: None,
            announcement: None,
            winner: None,
            events: EventQueue::default(),
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn voting(&self) -> Option<&VotingRound> {
        self.voting.as_ref()
    }

    pub fn announcement(&self) -> Option<Announcement> {
        self.announcement
    }

    pub fn winner(&self) -> Option<WinCondition> {
        self.winner
    }

    /// The player holding the device during role assignment.
    pub fn active_player(&self) -> Option<&Player> {
        if self.phase() != Phase::RoleAssignment {
            return None;
        }
        self.session.players().get(self.reveal.index)
    }

    pub fn is_role_revealed(&self) -> bool {
        self.active_player().is_some() && self.reveal.revealed
    }

    /// Token for the running discussion countdown, if there is one.
    pub fn timer_token(&self) -> Option<TimerToken> {
        if self.phase() == Phase::Discussion {
            self.session.timer().token()
        } else {
            None
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain().collect()
    }

    pub fn begin(&mut self) -> Result<Phase, GameError> {
        let result = self.session.apply(ScreenEvent::Begin);
        self.observe(result)
    }

    pub fn play_online(&mut self) -> Result<Phase, GameError> {
        let result = self.session.apply(ScreenEvent::PlayOnline);
        self.observe(result)
    }

    pub fn play_local(&mut self) -> Result<Phase, GameError> {
        let result = self.session.apply(ScreenEvent::PlayLocal);
        self.observe(result)
    }

    pub fn back(&mut self) -> Result<Phase, GameError> {
        let result = self.session.apply(ScreenEvent::Back);
        self.observe(result)
    }

    pub fn select_words(&mut self, source: WordSource) -> Result<Phase, GameError> {
        let result = self.session.apply(ScreenEvent::WordsChosen).map(|phase| {
            self.session.select_word_source(source);
            phase
        });
        self.observe(result)
    }

    pub fn assign_roles(&mut self, player_count: usize) -> Result<Phase, GameError> {
        let result = self.try_assign_roles(player_count);
        self.observe(result)
    }

    /// Names the player currently holding the device.
    pub fn claim_name(&mut self, name: &str) -> Result<NameClaim, GameError> {
        let result = self.try_claim_name(name);
        self.observe(result)
    }

    pub fn reveal_role(&mut self) -> Result<(), GameError> {
        let result = self.try_reveal_role();
        self.observe(result)
    }

    /// Hands the device on. After the last player this starts round one.
    pub fn next_player(&mut self) -> Result<Phase, GameError> {
        let result = self.try_next_player();
        self.observe(result)
    }

    /// Ends the discussion early.
    pub fn start_voting(&mut self) -> Result<Phase, GameError> {
        let result = self.open_voting();
        self.observe(result)
    }

    /// One second of discussion time. Ticks that arrive after the phase has
    /// moved on, or that belong to an older countdown, are ignored.
    pub fn tick(&mut self, token: TimerToken) -> Result<TimerTick, GameError> {
        if self.phase() != Phase::Discussion {
            warn!(phase = ?self.phase(), "timer tick outside discussion ignored");
            return Ok(TimerTick::Stale);
        }

        let tick = self.session.timer_mut().tick(token);
        match tick {
            TimerTick::Stale => warn!("stale timer tick ignored"),
            TimerTick::Expired => {
                info!(round = self.session.round(), "discussion time is up");
                let result = self.open_voting();
                self.observe(result)?;
            },
            TimerTick::Running { .. } => {},
        }

        Ok(tick)
    }

    pub fn cast_vote(&mut self, target: PlayerId) -> Result<VotingState, GameError> {
        let result = self.try_cast_vote(target);
        self.observe(result)
    }

    pub fn pass_device(&mut self) -> Result<(), GameError> {
        let result = self.voting_mut().and_then(|voting| voting.pass_device());
        if result.is_ok() {
            self.events.push(GameEvent::NextVoter);
        }
        self.observe(result)
    }

    pub fn revote(&mut self) -> Result<(), GameError> {
        let result = self.voting_mut().and_then(|voting| voting.revote());
        if result.is_ok() {
            self.events.push(GameEvent::RevoteCalled);
        }
        self.observe(result)
    }

    /// Accepts a tie without eliminating anyone and moves straight to the next round.
    pub fn skip_elimination(&mut self) -> Result<Phase, GameError> {
        let result = self.try_skip_elimination();
        self.observe(result)
    }

    pub fn dismiss_announcement(&mut self) -> Result<Phase, GameError> {
        let result = self.try_dismiss_announcement();
        self.observe(result)
    }

    /// Play again: drops the whole session and returns to the welcome screen.
    pub fn reset(&mut self) {
        self.session.reset();
        self.reveal = RevealCursor::default();
        self.voting = None;
        self.announcement = None;
        self.winner = None;
        self.events.clear();
    }

    fn try_assign_roles(&mut self, player_count: usize) -> Result<Phase, GameError> {
        next_phase(self.phase(), ScreenEvent::RolesAssigned)?;
        self.session.assign_roles(player_count, &mut self.rng)?;

        let phase = self.session.apply(ScreenEvent::RolesAssigned)?;
        self.reveal = RevealCursor::default();
        self.events.push(GameEvent::GameStarted { players: player_count });

        Ok(phase)
    }

    fn try_claim_name(&mut self, name: &str) -> Result<NameClaim, GameError> {
        let id = self.require_active_player()?.id;

        let claim = self.session.claim_name(self.reveal.index, name)?;
        if claim == NameClaim::Claimed {
            self.events.push(GameEvent::NameClaimed { player: id });
        }

        Ok(claim)
    }

    fn try_reveal_role(&mut self) -> Result<(), GameError> {
        let player = self.require_active_player()?;
        if !player.has_claimed_name() {
            return Err(GameError::RoleAssignmentIncomplete(player.id));
        }
        let id = player.id;

        self.reveal.revealed = true;
        self.events.push(GameEvent::RoleRevealed { player: id });

        Ok(())
    }

    fn try_next_player(&mut self) -> Result<Phase, GameError> {
        let player = self.require_active_player()?;
        if !player.has_claimed_name() || !self.reveal.revealed {
            return Err(GameError::RoleAssignmentIncomplete(player.id));
        }

        if self.reveal.index + 1 < self.session.players().len() {
            self.reveal = RevealCursor { index: self.reveal.index + 1, revealed: false };
            return Ok(Phase::RoleAssignment);
        }

        let phase = self.session.apply(ScreenEvent::RolesDistributed)?;
        self.reveal = RevealCursor::default();
        self.session.timer_mut().restart();

        let round = self.session.round();
        info!(round, "discussion started");
        self.events.push(GameEvent::DiscussionStarted { round });

        Ok(phase)
    }

    fn open_voting(&mut self) -> Result<Phase, GameError> {
        next_phase(self.phase(), ScreenEvent::VotingCalled)?;
        let round = VotingRound::new(&self.session.alive_ids())?;

        let phase = self.session.apply(ScreenEvent::VotingCalled)?;
        self.voting = Some(round);
        self.events.push(GameEvent::VotingStarted { round: self.session.round() });

        Ok(phase)
    }

    fn try_cast_vote(&mut self, target: PlayerId) -> Result<VotingState, GameError> {
        let voting = self.voting_mut()?;
        let state = voting.cast_vote(target)?;
        let remaining = voting.votes_remaining();
        let tied = voting.tied().to_vec();
        let outcome = voting.outcome();

        self.events.push(GameEvent::VoteCast { remaining });

        match (state, outcome) {
            (VotingState::Results, Some(outcome)) => {
                self.session.apply(ScreenEvent::VotingResolved)?;
                let eliminated = outcome.eliminated();
                self.session.apply_elimination(eliminated)?;
                self.announcement = Some(Announcement { eliminated });

                self.events.push(match eliminated {
                    Some(player) => GameEvent::PlayerEliminated { player },
                    None => GameEvent::NoElimination,
                });
            },
            (VotingState::TieBreaker, _) => self.events.push(GameEvent::TieDeclared { tied }),
            _ => {},
        }

        Ok(state)
    }

    fn try_skip_elimination(&mut self) -> Result<Phase, GameError> {
        next_phase(self.phase(), ScreenEvent::EliminationSkipped)?;
        self.voting_mut()?.skip_elimination()?;

        self.session.apply(ScreenEvent::EliminationSkipped)?;
        self.voting = None;
        self.events.push(GameEvent::NoElimination);
        self.advance_round();

        Ok(self.phase())
    }

    fn try_dismiss_announcement(&mut self) -> Result<Phase, GameError> {
        let expected = Phase::EliminationAnnouncement;
        if self.phase() != expected {
            return Err(GameError::WrongPhase { expected, actual: self.phase() });
        }

        let announcement = self.announcement.take().unwrap_or(Announcement { eliminated: None });
        self.voting = None;

        if announcement.eliminated.is_some() {
            let verdict = self.session.evaluate_win_condition();
            if verdict.is_decided() {
                let phase = self.session.apply(ScreenEvent::GameDecided)?;
                info!(winner = ?verdict, round = self.session.round(), "game over");
                self.winner = Some(verdict);
                self.events.push(GameEvent::GameOver { winner: verdict });
                return Ok(phase);
            }
        }

        self.session.apply(ScreenEvent::NextRound)?;
        self.advance_round();

        Ok(self.phase())
    }

    fn advance_round(&mut self) {
        self.session.advance_round();
        let round = self.session.round();
        self.events.push(GameEvent::RoundAdvanced { round });
        self.events.push(GameEvent::DiscussionStarted { round });
    }

    fn require_active_player(&self) -> Result<&Player, GameError> {
        let expected = Phase::RoleAssignment;
        if self.phase() != expected {
            return Err(GameError::WrongPhase { expected, actual: self.phase() });
        }

        self.active_player().ok_or(GameError::InvariantViolation("role assignment cursor out of range"))
    }

    fn voting_mut(&mut self) -> Result<&mut VotingRound, GameError> {
        let expected = Phase::Voting;
        let actual = self.session.phase();
        if actual != expected {
            return Err(GameError::WrongPhase { expected, actual });
        }

        self.voting.as_mut().ok_or(GameError::InvariantViolation("voting phase without a voting round"))
    }

    /// Mirrors every rejection onto the feedback channel.
    fn observe<T>(&mut self, result: Result<T, GameError>) -> Result<T, GameError> {
        if let Err(err) = &result {
            warn!(%err, phase = ?self.phase(), "action rejected");

            let event = match (err, self.active_player()) {
                (GameError::DuplicateName(_), Some(player)) => GameEvent::NameRejected { player: player.id },
                _ => GameEvent::ActionRejected,
            };
            self.events.push(event);
        }

        result
    }
}
