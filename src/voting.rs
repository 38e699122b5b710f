//! Pass-the-device anonymous voting.
//!
//! Alive players vote one after another, in seat order. Only the per-candidate
//! counts are kept, never which voter picked whom.

use crate::{error::GameError, PlayerId};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VotingState {
    /// The current voter is choosing a target.
    Voting,
    /// Vote recorded, waiting for the device to reach the next voter.
    PassDevice,
    Results,
    TieBreaker,
    /// The tie was accepted without an elimination.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "player", rename_all = "snake_case")]
pub enum VotingOutcome {
    Eliminate(PlayerId),
    NoElimination,
}

impl VotingOutcome {
    pub fn eliminated(&self) -> Option<PlayerId> {
        match self {
            VotingOutcome::Eliminate(id) => Some(*id),
            VotingOutcome::NoElimination => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Decided(VotingOutcome),
    Tie { tied: Vec<PlayerId> },
}

/// Vote counts per candidate, every alive player starting at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    entries: Vec<(PlayerId, u32)>,
}

impl Ballot {
    pub fn new(candidates: &[PlayerId]) -> Self {
        Self { entries: candidates.iter().map(|&id| (id, 0)).collect() }
    }

    pub fn record(&mut self, target: PlayerId) -> Result<(), GameError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|(id, _)| *id == target)
            .ok_or(GameError::IneligibleTarget(target))?;
        entry.1 += 1;
        Ok(())
    }

    pub fn count(&self, candidate: PlayerId) -> Option<u32> {
        self.entries.iter().find(|(id, _)| *id == candidate).map(|(_, votes)| *votes)
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, votes)| votes).sum()
    }

    pub fn tally(&self) -> Tally {
        Tally::from_counts(self.entries.iter().copied())
    }

    fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.1 = 0;
        }
    }
}

/// Counts ordered by votes, highest first. Equal counts keep seat order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    standings: Vec<(PlayerId, u32)>,
}

impl Tally {
    pub fn from_counts(counts: impl IntoIterator<Item = (PlayerId, u32)>) -> Self {
        let mut standings: Vec<_> = counts.into_iter().collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1));
        Self { standings }
    }

    pub fn standings(&self) -> &[(PlayerId, u32)] {
        &self.standings
    }

    pub fn max_votes(&self) -> u32 {
        self.standings.first().map(|(_, votes)| *votes).unwrap_or(0)
    }

    /// A unique top count eliminates, any shared top count is a tie, and a
    /// top count of zero eliminates nobody.
    pub fn resolve(&self) -> Resolution {
        let max = self.max_votes();
        if max == 0 {
            return Resolution::Decided(VotingOutcome::NoElimination);
        }

        let leaders: Vec<PlayerId> =
            self.standings.iter().take_while(|(_, votes)| *votes == max).map(|(id, _)| *id).collect();

        if leaders.len() == 1 {
            Resolution::Decided(VotingOutcome::Eliminate(leaders[0]))
        } else {
            Resolution::Tie { tied: leaders }
        }
    }
}

#[derive(Debug, Clone)]
pub struct VotingRound {
    voters: Vec<PlayerId>,
    ballot: Ballot,
    voter_index: usize,
    state: VotingState,
    tally: Option<Tally>,
    tied: Vec<PlayerId>,
    outcome: Option<VotingOutcome>,
}

impl VotingRound {
    /// Everyone alive is both a voter and a candidate. Fewer than two alive
    /// players means the game should already have ended.
    pub fn new(alive: &[PlayerId]) -> Result<Self, GameError> {
        if alive.len() < 2 {
            return Err(GameError::InvariantViolation("voting needs at least two alive players"));
        }

        Ok(Self {
            voters: alive.to_vec(),
            ballot: Ballot::new(alive),
            voter_index: 0,
            state: VotingState::Voting,
            tally: None,
            tied: Vec::new(),
            outcome: None,
        })
    }

    pub fn state(&self) -> VotingState {
        self.state
    }

    /// Only known while that voter holds the device.
    pub fn current_voter(&self) -> Option<PlayerId> {
        match self.state {
            VotingState::Voting => self.voters.get(self.voter_index).copied(),
            _ => None,
        }
    }

    pub fn candidates(&self) -> &[PlayerId] {
        &self.voters
    }

    /// 1-based position of the voter currently (or most recently) holding the device.
    pub fn voter_number(&self) -> usize {
        match self.state {
            VotingState::Voting => self.voter_index + 1,
            _ => self.voter_index,
        }
    }

    pub fn total_voters(&self) -> usize {
        self.voters.len()
    }

    pub fn votes_remaining(&self) -> usize {
        self.voters.len() - self.voter_index
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub fn tally(&self) -> Option<&Tally> {
        self.tally.as_ref()
    }

    pub fn tied(&self) -> &[PlayerId] {
        &self.tied
    }

    /// Set once the round has terminated (`Results` or `Skipped`).
    pub fn outcome(&self) -> Option<VotingOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, VotingState::Results | VotingState::Skipped)
    }

    /// Records the current voter's choice. Self-votes are allowed.
    pub fn cast_vote(&mut self, target: PlayerId) -> Result<VotingState, GameError> {
        self.expect_state(VotingState::Voting)?;
        self.ballot.record(target)?;
        self.voter_index += 1;

        if self.voter_index < self.voters.len() {
            self.state = VotingState::PassDevice;
            debug!(remaining = self.votes_remaining(), "vote recorded");
            return Ok(self.state);
        }

        let tally = self.ballot.tally();
        match tally.resolve() {
            Resolution::Decided(outcome) => {
                info!(?outcome, "voting decided");
                self.outcome = Some(outcome);
                self.state = VotingState::Results;
            },
            Resolution::Tie { tied } => {
                info!(tied = tied.len(), votes = tally.max_votes(), "voting tied");
                self.tied = tied;
                self.state = VotingState::TieBreaker;
            },
        }
        self.tally = Some(tally);

        Ok(self.state)
    }

    pub fn pass_device(&mut self) -> Result<(), GameError> {
        self.expect_state(VotingState::PassDevice)?;
        self.state = VotingState::Voting;
        Ok(())
    }

    /// Throws every ballot away and starts again from the first voter.
    pub fn revote(&mut self) -> Result<(), GameError> {
        self.expect_state(VotingState::TieBreaker)?;
        self.ballot.clear();
        self.voter_index = 0;
        self.tally = None;
        self.tied.clear();
        self.state = VotingState::Voting;
        info!("revote called");
        Ok(())
    }

    pub fn skip_elimination(&mut self) -> Result<VotingOutcome, GameError> {
        self.expect_state(VotingState::TieBreaker)?;
        self.state = VotingState::Skipped;
        self.outcome = Some(VotingOutcome::NoElimination);
        info!("tie accepted without elimination");
        Ok(VotingOutcome::NoElimination)
    }

    fn expect_state(&self, wanted: VotingState) -> Result<(), GameError> {
        if self.state == wanted {
            Ok(())
        } else {
            Err(GameError::WrongVotingState(self.state))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: PlayerId = PlayerId(0);
    const B: PlayerId = PlayerId(1);
    const C: PlayerId = PlayerId(2);

    fn run(round: &mut VotingRound, targets: &[PlayerId]) -> VotingState {
        let mut state = round.state();
        for (i, &target) in targets.iter().enumerate() {
            if i > 0 {
                round.pass_device().unwrap();
            }
            state = round.cast_vote(target).unwrap();
        }
        state
    }

    #[test]
    fn two_way_tie_goes_to_tie_breaker() {
        let tally = Tally::from_counts(vec![(A, 2), (B, 2), (C, 1)]);
        assert_eq!(tally.resolve(), Resolution::Tie { tied: vec![A, B] });
    }

    #[test]
    fn unique_leader_is_eliminated() {
        let tally = Tally::from_counts(vec![(A, 3), (B, 1), (C, 0)]);
        assert_eq!(tally.resolve(), Resolution::Decided(VotingOutcome::Eliminate(A)));
    }

    #[test]
    fn all_zero_eliminates_nobody() {
        let tally = Tally::from_counts(vec![(A, 0), (B, 0), (C, 0)]);
        assert_eq!(tally.resolve(), Resolution::Decided(VotingOutcome::NoElimination));
        assert_eq!(Tally::from_counts(vec![]).resolve(), Resolution::Decided(VotingOutcome::NoElimination));
    }

    #[test]
    fn standings_are_sorted_with_stable_ties() {
        let tally = Tally::from_counts(vec![(A, 1), (B, 3), (C, 1)]);
        assert_eq!(tally.standings(), &[(B, 3), (A, 1), (C, 1)]);
    }

    #[test]
    fn full_round_with_pass_device_hand_offs() {
        let mut round = VotingRound::new(&[A, B, C]).unwrap();
        assert_eq!(round.current_voter(), Some(A));

        assert_eq!(round.cast_vote(B).unwrap(), VotingState::PassDevice);
        assert_eq!(round.current_voter(), None);
        assert_eq!(round.votes_remaining(), 2);

        round.pass_device().unwrap();
        assert_eq!(round.current_voter(), Some(B));

        let state = run(&mut round, &[B, C]);
        assert_eq!(state, VotingState::Results);
        assert_eq!(round.outcome(), Some(VotingOutcome::Eliminate(B)));
        assert!(round.is_finished());
    }

    #[test]
    fn a_voter_cannot_vote_twice() {
        let mut round = VotingRound::new(&[A, B, C]).unwrap();
        round.cast_vote(A).unwrap();

        assert_eq!(round.cast_vote(A).unwrap_err(), GameError::WrongVotingState(VotingState::PassDevice));
        assert_eq!(round.ballot().total(), 1);
    }

    #[test]
    fn self_votes_are_allowed() {
        let mut round = VotingRound::new(&[A, B]).unwrap();
        let state = run(&mut round, &[A, A]);

        assert_eq!(state, VotingState::Results);
        assert_eq!(round.outcome(), Some(VotingOutcome::Eliminate(A)));
    }

    #[test]
    fn votes_for_non_candidates_are_rejected() {
        let mut round = VotingRound::new(&[A, B]).unwrap();

        assert_eq!(round.cast_vote(C).unwrap_err(), GameError::IneligibleTarget(C));
        assert_eq!(round.state(), VotingState::Voting);
        assert_eq!(round.current_voter(), Some(A));
    }

    #[test]
    fn revote_discards_ballots_and_restarts() {
        let mut round = VotingRound::new(&[A, B, C]).unwrap();
        assert_eq!(run(&mut round, &[A, B, C]), VotingState::TieBreaker);
        assert_eq!(round.tied(), &[A, B, C]);

        round.revote().unwrap();
        assert_eq!(round.state(), VotingState::Voting);
        assert_eq!(round.current_voter(), Some(A));
        assert_eq!(round.ballot().total(), 0);
        assert!(round.tied().is_empty());

        assert_eq!(run(&mut round, &[C, C, A]), VotingState::Results);
        assert_eq!(round.outcome(), Some(VotingOutcome::Eliminate(C)));
    }

    #[test]
    fn skip_elimination_terminates_without_target() {
        let mut round = VotingRound::new(&[A, B]).unwrap();
        run(&mut round, &[B, A]);

        assert_eq!(round.skip_elimination().unwrap(), VotingOutcome::NoElimination);
        assert_eq!(round.state(), VotingState::Skipped);
        assert!(round.is_finished());
        assert!(round.revote().is_err());
    }

    #[test]
    fn fewer_than_two_voters_is_an_invariant_violation() {
        assert!(matches!(VotingRound::new(&[A]), Err(GameError::InvariantViolation(_))));
        assert!(matches!(VotingRound::new(&[]), Err(GameError::InvariantViolation(_))));
    }
}
