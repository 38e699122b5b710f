//! Property tests for dealing, naming, elimination and vote resolution.
//!
//! Increase cases locally with: PROPTEST_CASES=1000 cargo test --test properties

use std::{collections::HashSet, env};

use game::{
    words::WordSource, GameSession, PlayerId, Resolution, Role, ScriptedRandom, Tally, VotingOutcome,
    BLANK_THRESHOLD, BLANK_WORD, MAX_PLAYERS, MIN_PLAYERS,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES").ok().and_then(|s| s.parse().ok()).unwrap_or(64);

    ProptestConfig { cases, failure_persistence: None, ..ProptestConfig::default() }
}

fn source() -> impl Strategy<Value = WordSource> {
    prop_oneof![Just(WordSource::Classic), Just(WordSource::Generated)]
}

fn dealt(count: usize, seed: u64, source: WordSource) -> GameSession {
    let mut session = GameSession::default();
    session.select_word_source(source);
    session.assign_roles(count, &mut StdRng::seed_from_u64(seed)).unwrap();
    session
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn role_distribution(count in MIN_PLAYERS..=MAX_PLAYERS, seed in any::<u64>(), source in source()) {
        let session = dealt(count, seed, source);
        let roles: Vec<Role> = session.players().iter().map(|p| p.role).collect();

        let echoes = roles.iter().filter(|r| **r == Role::Echo).count();
        let blanks = roles.iter().filter(|r| **r == Role::Blank).count();

        prop_assert_eq!(roles.len(), count);
        prop_assert_eq!(echoes, 1);
        prop_assert_eq!(blanks, if count >= BLANK_THRESHOLD { 1 } else { 0 });
        prop_assert!(session.players().iter().all(|p| p.is_alive()));
    }

    #[test]
    fn words_follow_roles(count in MIN_PLAYERS..=MAX_PLAYERS, picks in prop::collection::vec(any::<usize>(), 0..6), source in source()) {
        let mut session = GameSession::default();
        session.select_word_source(source);
        session.assign_roles(count, &mut ScriptedRandom::new(picks)).unwrap();

        let pair = session.word_pair().unwrap();
        prop_assert!(source.catalog().contains(&pair));

        for player in session.players() {
            let expected = match player.role {
                Role::Cipher => pair.civilian,
                Role::Echo => pair.undercover,
                Role::Blank => BLANK_WORD,
            };
            prop_assert_eq!(player.word, expected);
        }
    }

    #[test]
    fn claimed_names_stay_unique(
        count in MIN_PLAYERS..=MAX_PLAYERS,
        claims in prop::collection::vec((0usize..MAX_PLAYERS, prop::sample::select(vec!["ann", "Ann", " ANN ", "bo", "Bo", "cy", "", "player 1"])), 0..24),
    ) {
        let mut session = dealt(count, 7, WordSource::Classic);

        for (seat, name) in claims {
            let before = session.players().to_vec();
            if session.claim_name(seat % count, name).is_err() {
                prop_assert_eq!(session.players(), &before[..]);
            }
        }

        let names: HashSet<String> = session.players().iter().map(|p| p.name.trim().to_lowercase()).collect();
        prop_assert_eq!(names.len(), count);
    }

    #[test]
    fn elimination_is_monotonic(count in MIN_PLAYERS..=MAX_PLAYERS, targets in prop::collection::vec(0u16..MAX_PLAYERS as u16, 0..12)) {
        let mut session = dealt(count, 1, WordSource::Classic);
        let mut out: HashSet<PlayerId> = HashSet::new();

        for target in targets {
            let id = PlayerId(target);
            let alive_before = session.alive_players().count();

            match session.apply_elimination(Some(id)) {
                Ok(newly) => {
                    prop_assert_eq!(newly, out.insert(id));
                    prop_assert_eq!(session.alive_players().count(), alive_before - newly as usize);
                },
                Err(_) => prop_assert!(usize::from(target) >= count),
            }

            for eliminated in &out {
                prop_assert!(session.player(*eliminated).unwrap().is_eliminated());
            }
        }
    }

    #[test]
    fn ties_are_detected(counts in prop::collection::vec(0u32..5, 2..9)) {
        let tally = Tally::from_counts(counts.iter().enumerate().map(|(i, &c)| (PlayerId(i as u16), c)));
        let max = counts.iter().copied().max().unwrap_or(0);
        let leaders: Vec<PlayerId> =
            counts.iter().enumerate().filter(|(_, c)| **c == max).map(|(i, _)| PlayerId(i as u16)).collect();

        let expected = if max == 0 {
            Resolution::Decided(VotingOutcome::NoElimination)
        } else if leaders.len() == 1 {
            Resolution::Decided(VotingOutcome::Eliminate(leaders[0]))
        } else {
            Resolution::Tie { tied: leaders }
        };

        prop_assert_eq!(tally.resolve(), expected);
    }
}
