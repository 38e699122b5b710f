//! What a surface is allowed to render right now.
//!
//! Secrets (roles, words) only appear in a view when the current screen is
//! meant to show them, so a surface can render a view as-is.

use crate::{
    rng::RandomSource,
    screen::{Phase, ScreenController},
    session::WinCondition,
    timer::format_countdown,
    voting::{VotingRound, VotingState},
    words::{WordPair, WordSource},
    Player, PlayerId, Role,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub alive: bool,
    pub role: Option<Role>,
    pub word: Option<&'static str>,
}

impl PlayerView {
    fn new(player: &Player, reveal: bool) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            alive: player.is_alive(),
            role: if reveal { Some(player.role) } else { None },
            word: if reveal { Some(player.word) } else { None },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRevealView {
    pub player: PlayerId,
    /// 1-based position in the hand-around.
    pub position: usize,
    pub of: usize,
    pub name_claimed: bool,
    pub revealed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownView {
    pub seconds_remaining: u32,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VotingView {
    pub state: VotingState,
    pub current_voter: Option<PlayerId>,
    pub voter_number: usize,
    pub total_voters: usize,
    pub votes_remaining: usize,
    pub candidates: Vec<PlayerId>,
    /// Only filled once every ballot is in.
    pub standings: Vec<(PlayerId, u32)>,
    pub tied: Vec<PlayerId>,
}

impl VotingView {
    fn new(voting: &VotingRound) -> Self {
        let standings = voting.tally().map(|tally| tally.standings().to_vec()).unwrap_or_default();

        Self {
            state: voting.state(),
            current_voter: voting.current_voter(),
            voter_number: voting.voter_number(),
            total_voters: voting.total_voters(),
            votes_remaining: voting.votes_remaining(),
            candidates: voting.candidates().to_vec(),
            standings,
            tied: voting.tied().to_vec(),
        }
    }
}

/// Present only on the announcement screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnouncementView {
    /// `None` when the vote eliminated nobody.
    pub eliminated: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    pub round: u32,
    pub word_source: WordSource,
    pub players: Vec<PlayerView>,
    pub reveal: Option<RoleRevealView>,
    pub countdown: Option<CountdownView>,
    pub voting: Option<VotingView>,
    pub announcement: Option<AnnouncementView>,
    pub winner: Option<WinCondition>,
    pub word_pair: Option<WordPair>,
}

impl<R: RandomSource> ScreenController<R> {
    pub fn view(&self) -> SessionView {
        let session = self.session();
        let phase = self.phase();
        let game_over = phase == Phase::GameOver;

        let active = if self.is_role_revealed() { self.active_player().map(|p| p.id) } else { None };
        let announcement = self.announcement().map(|a| AnnouncementView { eliminated: a.eliminated });
        let announced = announcement.and_then(|a| a.eliminated);

        let players = session
            .players()
            .iter()
            .map(|p| {
                let reveal = game_over || active == Some(p.id) || announced == Some(p.id);
                PlayerView::new(p, reveal)
            })
            .collect();

        let reveal = self.active_player().map(|p| RoleRevealView {
            player: p.id,
            position: p.id.0 as usize + 1,
            of: session.players().len(),
            name_claimed: p.has_claimed_name(),
            revealed: self.is_role_revealed(),
        });

        let countdown = if phase == Phase::Discussion {
            let seconds_remaining = session.timer().remaining();
            Some(CountdownView { seconds_remaining, display: format_countdown(seconds_remaining) })
        } else {
            None
        };

        SessionView {
            phase,
            round: session.round(),
            word_source: session.word_source(),
            players,
            reveal,
            countdown,
            voting: self.voting().map(VotingView::new),
            announcement,
            winner: self.winner(),
            word_pair: if game_over { session.word_pair() } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnnouncementView;
    use crate::{
        config::GameConfig, rng::ScriptedRandom, screen::ScreenController, words::WordSource, Phase,
        PlayerId, Role, WinCondition,
    };

    fn started(players: usize, picks: Vec<usize>) -> ScreenController<ScriptedRandom> {
        let mut ctl = ScreenController::new(GameConfig::default(), ScriptedRandom::new(picks)).unwrap();
        ctl.begin().unwrap();
        ctl.play_local().unwrap();
        ctl.select_words(WordSource::Classic).unwrap();
        ctl.assign_roles(players).unwrap();
        ctl
    }

    fn hand_around(ctl: &mut ScreenController<ScriptedRandom>) {
        let count = ctl.session().players().len();
        for i in 0..count {
            ctl.claim_name(&format!("P{}", i + 1)).unwrap();
            ctl.reveal_role().unwrap();
            ctl.next_player().unwrap();
        }
    }

    #[test]
    fn only_the_revealed_active_player_is_visible() {
        let mut ctl = started(4, vec![0, 0]);

        let view = ctl.view();
        assert!(view.players.iter().all(|p| p.role.is_none() && p.word.is_none()));
        assert_eq!(view.reveal.as_ref().map(|r| (r.position, r.of)), Some((1, 4)));

        ctl.claim_name("Ada").unwrap();
        ctl.reveal_role().unwrap();
        let view = ctl.view();

        assert_eq!(view.players[0].role, Some(Role::Echo));
        assert_eq!(view.players[0].word, Some("Dog"));
        assert!(view.players[1..].iter().all(|p| p.role.is_none()));
        assert_eq!(view.word_pair, None);
    }

    #[test]
    fn discussion_view_shows_the_countdown() {
        let mut ctl = started(4, vec![0, 0]);
        hand_around(&mut ctl);

        let view = ctl.view();
        assert_eq!(view.phase, Phase::Discussion);
        assert_eq!(view.countdown.map(|c| c.display), Some("3:00".to_string()));
        assert!(view.players.iter().all(|p| p.role.is_none()));
        assert_eq!(view.reveal, None);
    }

    #[test]
    fn voting_view_hides_counts_until_all_ballots_are_in() {
        let mut ctl = started(4, vec![0, 0]);
        hand_around(&mut ctl);
        ctl.start_voting().unwrap();
        ctl.cast_vote(PlayerId(2)).unwrap();

        let voting = ctl.view().voting.unwrap();
        assert_eq!(voting.votes_remaining, 3);
        assert_eq!(voting.voter_number, 1);
        assert!(voting.standings.is_empty());
    }

    #[test]
    fn announcement_reveals_only_the_eliminated_player() {
        let mut ctl = started(4, vec![0, 0]);
        hand_around(&mut ctl);
        ctl.start_voting().unwrap();
        for i in 0..4 {
            if i > 0 {
                ctl.pass_device().unwrap();
            }
            ctl.cast_vote(PlayerId(1)).unwrap();
        }

        let view = ctl.view();
        assert_eq!(view.phase, Phase::EliminationAnnouncement);
        assert_eq!(view.announcement.map(|a| a.eliminated), Some(Some(PlayerId(1))));
        assert_eq!(view.players[1].role, Some(Role::Cipher));
        assert_eq!(view.players[1].word, Some("Cat"));
        assert!(!view.players[1].alive);
        assert_eq!(view.players[0].role, None);
        assert_eq!(view.voting.map(|v| v.standings[0]), Some((PlayerId(1), 4)));
    }

    #[test]
    fn game_over_reveals_everything() {
        let mut ctl = started(4, vec![0, 3]);
        hand_around(&mut ctl);
        ctl.start_voting().unwrap();
        for i in 0..4 {
            if i > 0 {
                ctl.pass_device().unwrap();
            }
            ctl.cast_vote(PlayerId(3)).unwrap();
        }
        ctl.dismiss_announcement().unwrap();

        let view = ctl.view();
        assert_eq!(view.winner, Some(WinCondition::CiphersWin));
        assert!(view.players.iter().all(|p| p.role.is_some() && p.word.is_some()));
        assert_eq!(view.word_pair.map(|p| (p.civilian, p.undercover)), Some(("Cat", "Dog")));
        assert_eq!(view.announcement, None);
    }

    #[test]
    fn view_serializes_to_json() {
        let ctl = started(4, vec![0, 0]);
        let json = serde_json::to_value(ctl.view()).unwrap();

        assert_eq!(json["phase"], "role_assignment");
        assert_eq!(json["players"][0]["name"], "Player 1");
        assert!(json["players"][0]["role"].is_null());
        assert!(json["announcement"].is_null());
    }

    #[test]
    fn announcement_without_elimination_is_distinct_in_json() {
        let nobody = serde_json::to_value(AnnouncementView { eliminated: None }).unwrap();

        assert!(nobody.is_object());
        assert!(nobody["eliminated"].is_null());
    }
}
