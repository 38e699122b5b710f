//! The session aggregate: roster, round counter, word pair, phase and
//! discussion countdown. All mutation goes through the methods here.

use crate::{
    config::GameConfig,
    error::GameError,
    rng::RandomSource,
    screen::{next_phase, Phase, ScreenEvent},
    timer::{DiscussionTimer, TimerToken},
    words::{WordPair, WordSource, BLANK_WORD},
    Player, PlayerId, Role, BLANK_THRESHOLD, MAX_PLAYERS, MIN_PLAYERS,
};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    Ongoing,
    EchoWins,
    CiphersWin,
}

impl WinCondition {
    pub fn is_decided(&self) -> bool {
        *self != WinCondition::Ongoing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameClaim {
    Claimed,
    /// Blank input. Nothing changed.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    players: Vec<Player>,
    round: u32,
    word_pair: Option<WordPair>,
    word_source: WordSource,
    phase: Phase,
    timer: DiscussionTimer,
    config: GameConfig,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self {
            players: Vec::new(),
            round: 1,
            word_pair: None,
            word_source: config.word_source,
            phase: Phase::Welcome,
            timer: DiscussionTimer::new(config.discussion_seconds),
            config,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.alive_players().map(|p| p.id).collect()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn word_pair(&self) -> Option<WordPair> {
        self.word_pair
    }

    pub fn word_source(&self) -> WordSource {
        self.word_source
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timer(&self) -> &DiscussionTimer {
        &self.timer
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Chooses the catalog the next `assign_roles` draws from.
    pub fn select_word_source(&mut self, source: WordSource) {
        self.word_source = source;
    }

    /// Deals a fresh roster: everyone a Cipher, then one Echo, then (from six
    /// players) one Blank on a different seat. Resets the round to 1.
    pub fn assign_roles<R>(
        &mut self,
        player_count: usize,
        rng: &mut R,
    ) -> Result<(&[Player], WordPair), GameError>
    where
        R: RandomSource + ?Sized,
    {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(GameError::InvalidPlayerCount(player_count));
        }

        let catalog = self.word_source.catalog();
        let word_pair = catalog[rng.pick(catalog.len())];

        let mut players: Vec<Player> = (0..player_count)
            .map(|i| Player::new(PlayerId(i as u16), Role::Cipher, word_pair.civilian))
            .collect();

        let echo = rng.pick(player_count);
        players[echo].assign(Role::Echo, word_pair.undercover);

        if player_count >= BLANK_THRESHOLD {
            // Uniform over the seats other than the Echo's.
            let mut blank = rng.pick(player_count - 1);
            if blank >= echo {
                blank += 1;
            }
            players[blank].assign(Role::Blank, BLANK_WORD);
        }

        info!(players = player_count, source = ?self.word_source, "roles assigned");

        self.players = players;
        self.word_pair = Some(word_pair);
        self.round = 1;
        self.timer.reset(self.config.discussion_seconds);

        Ok((&self.players, word_pair))
    }

    pub fn claim_name(&mut self, index: usize, proposed: &str) -> Result<NameClaim, GameError> {
        let player = self.players.get(index).ok_or(GameError::UnknownPlayer(PlayerId(index as u16)))?;
        if player.has_claimed_name() {
            return Err(GameError::NameAlreadyClaimed(player.id));
        }

        let name = proposed.trim();
        if name.is_empty() {
            return Ok(NameClaim::Ignored);
        }

        let wanted = name.to_lowercase();
        let taken = self
            .players
            .iter()
            .enumerate()
            .any(|(i, p)| i != index && p.name.trim().to_lowercase() == wanted);

        if taken {
            debug!(seat = index, "name rejected as duplicate");
            return Err(GameError::DuplicateName(name.to_string()));
        }

        self.players[index].claim_name(name.to_string());
        Ok(NameClaim::Claimed)
    }

    /// Applies a voting outcome. `None` (tie skipped, nobody voted) changes
    /// nothing. Returns whether a player was newly eliminated; repeating an
    /// elimination is a no-op.
    pub fn apply_elimination(&mut self, target: Option<PlayerId>) -> Result<bool, GameError> {
        let id = match target {
            Some(id) => id,
            None => return Ok(false),
        };

        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::UnknownPlayer(id))?;

        let newly = player.eliminate();
        if newly {
            info!(player = %id, role = %player.role, round = self.round, "player eliminated");
        }

        Ok(newly)
    }

    /// Evaluated over alive players only. An Echo reaching the final two wins
    /// before the Cipher condition is even looked at.
    pub fn evaluate_win_condition(&self) -> WinCondition {
        let alive = self.alive_players().count();
        let echoes = self.alive_players().filter(|p| p.role == Role::Echo).count();
        let blanks = self.alive_players().filter(|p| p.role == Role::Blank).count();

        if alive <= 2 && echoes > 0 {
            WinCondition::EchoWins
        } else if echoes == 0 && blanks == 0 {
            WinCondition::CiphersWin
        } else {
            WinCondition::Ongoing
        }
    }

    /// Next round: counter up by one, a full countdown, back to discussion.
    pub fn advance_round(&mut self) -> TimerToken {
        self.round += 1;
        self.phase = Phase::Discussion;
        info!(round = self.round, "round advanced");
        self.timer.restart()
    }

    /// Back to the pre-session state, keeping only the configuration.
    pub fn reset(&mut self) {
        let mut timer = self.timer.clone();
        timer.reset(self.config.discussion_seconds);

        *self = Self::new(self.config);
        self.timer = timer;
        info!("session reset");
    }

    /// Runs `event` through the transition table and commits the new phase.
    pub(crate) fn apply(&mut self, event: ScreenEvent) -> Result<Phase, GameError> {
        let next = next_phase(self.phase, event)?;
        info!(from = ?self.phase, to = ?next, ?event, "phase transition");

        if self.phase == Phase::Discussion && next != Phase::Discussion {
            self.timer.cancel();
        }
        self.phase = next;

        Ok(next)
    }

    pub(crate) fn timer_mut(&mut self) -> &mut DiscussionTimer {
        &mut self.timer
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
