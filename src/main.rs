use anyhow::Result;
use clap::Parser;
use crossbeam_channel::{select, tick, unbounded, Receiver};
use game::{
    config::DEFAULT_DISCUSSION_SECONDS,
    view::{PlayerView, SessionView},
    GameConfig, GameEvent, Phase, PlayerId, ScreenController, TimerTick, VotingState, WordSource,
    MAX_PLAYERS, MIN_PLAYERS,
};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    io::{self, BufRead, Write},
    thread,
    time::Duration,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Parser)]
#[command(name = "deepcover", about = "Pass-the-device word deduction game for 4 to 8 players")]
struct Args {
    /// Length of each discussion countdown, in seconds
    #[arg(long, env = "DEEPCOVER_DISCUSSION_SECONDS", default_value_t = DEFAULT_DISCUSSION_SECONDS)]
    discussion_seconds: u32,

    /// Seed the RNG so word pairs and roles are reproducible
    #[arg(long, env = "DEEPCOVER_SEED")]
    seed: Option<u64>,

    /// Print every screen as a JSON line instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Start,
    Online,
    Local,
    Back,
    Words(WordSource),
    Players(usize),
    Name(String),
    Reveal,
    Next,
    Vote(PlayerId),
    Pass,
    Revote,
    Skip,
    Continue,
    Again,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.find(char::is_whitespace) {
            Some(split) => (&line[..split], line[split..].trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "start" => Command::Start,
            "online" => Command::Online,
            "local" => Command::Local,
            "back" => Command::Back,
            "classic" => Command::Words(WordSource::Classic),
            "generated" | "ai" => Command::Words(WordSource::Generated),
            "players" => Command::Players(rest.parse().ok()?),
            "name" => Command::Name(rest.to_string()),
            "reveal" => Command::Reveal,
            "next" => Command::Next,
            // Seats are shown 1-based.
            "vote" => Command::Vote(PlayerId(rest.parse::<u16>().ok()?.checked_sub(1)?)),
            "pass" => Command::Pass,
            "revote" => Command::Revote,
            "skip" => Command::Skip,
            "continue" | "ok" => Command::Continue,
            "again" => Command::Again,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return None,
        };

        Some(command)
    }
}

struct Client {
    controller: ScreenController<StdRng>,
    json: bool,
}

impl Client {
    fn new(config: GameConfig, rng: StdRng, json: bool) -> Result<Self> {
        Ok(Self { controller: ScreenController::new(config, rng)?, json })
    }

    /// Rejections are not fatal. They show up as `ActionRejected` on the feedback channel.
    /// Returns false when the command means nothing on the current screen.
    fn handle(&mut self, command: Command) -> bool {
        let ctl = &mut self.controller;
        let result = match command {
            Command::Start => ctl.begin().map(drop),
            Command::Online => ctl.play_online().map(drop),
            Command::Local => ctl.play_local().map(drop),
            Command::Back => ctl.back().map(drop),
            Command::Words(source) => ctl.select_words(source).map(drop),
            Command::Players(count) => ctl.assign_roles(count).map(drop),
            Command::Name(name) => ctl.claim_name(&name).map(drop),
            Command::Reveal => ctl.reveal_role(),
            Command::Next => ctl.next_player().map(drop),
            Command::Vote(target) => ctl.cast_vote(target).map(drop),
            Command::Pass => ctl.pass_device(),
            Command::Revote => ctl.revote(),
            Command::Skip => ctl.skip_elimination().map(drop),
            Command::Continue => match ctl.phase() {
                Phase::Discussion => ctl.start_voting().map(drop),
                Phase::EliminationAnnouncement => ctl.dismiss_announcement().map(drop),
                _ => return false,
            },
            Command::Again => {
                ctl.reset();
                Ok(())
            },
            Command::Help | Command::Quit => Ok(()),
        };

        if let Err(err) = result {
            if !self.json {
                println!("! {}", err);
            }
        }
        true
    }

    fn on_tick(&mut self) -> Result<bool> {
        let token = match self.controller.timer_token() {
            Some(token) => token,
            None => return Ok(false),
        };

        let redraw = match self.controller.tick(token)? {
            TimerTick::Running { remaining } => remaining % 30 == 0 || remaining <= 10,
            TimerTick::Expired => true,
            TimerTick::Stale => false,
        };

        Ok(redraw)
    }

    fn flush_events(&mut self) -> Result<()> {
        for event in self.controller.drain_events() {
            if self.json {
                println!("{}", serde_json::to_string(&event)?);
            } else {
                debug!(cue = cue(&event), "feedback");
            }
        }
        Ok(())
    }

    fn render(&self) -> Result<()> {
        let view = self.controller.view();
        if self.json {
            println!("{}", serde_json::to_string(&view)?);
        } else {
            print!("{}", render_text(&view));
        }
        io::stdout().flush()?;
        Ok(())
    }
}

/// The sound a richer surface would play for `event`.
fn cue(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::GameStarted { .. } | GameEvent::DiscussionStarted { .. } => "start",
        GameEvent::NameClaimed { .. } | GameEvent::GameOver { .. } => "success",
        GameEvent::NameRejected { .. } | GameEvent::ActionRejected => "error",
        GameEvent::RoleRevealed { .. } | GameEvent::VoteCast { .. } => "select",
        GameEvent::NextVoter | GameEvent::RevoteCalled => "click",
        GameEvent::VotingStarted { .. }
        | GameEvent::TieDeclared { .. }
        | GameEvent::PlayerEliminated { .. }
        | GameEvent::NoElimination
        | GameEvent::RoundAdvanced { .. } => "notification",
    }
}

fn name_of(view: &SessionView, id: PlayerId) -> &str {
    view.players.iter().find(|p| p.id == id).map(|p| p.name.as_str()).unwrap_or("?")
}

fn seat_list(players: &[PlayerView], only_alive: bool) -> String {
    let mut out = String::new();
    for p in players.iter().filter(|p| p.alive || !only_alive) {
        let status = if p.alive { "" } else { " (out)" };
        out.push_str(&format!("  [{}] {}{}\n", p.id.0 + 1, p.name, status));
    }
    out
}

fn render_text(view: &SessionView) -> String {
    let mut out = String::from("\n");

    match view.phase {
        Phase::Welcome => out.push_str("DEEP COVER\n> start\n"),
        Phase::ModeSelect => out.push_str("How do you want to play?\n> local | online | back\n"),
        Phase::OnlineMode => out.push_str("Online lobbies are not available here.\n> back\n"),
        Phase::WordSelection => out.push_str("Choose a word list.\n> classic | generated | back\n"),
        Phase::PlayerCount => out.push_str(&format!(
            "How many players? ({}-{}, a Blank joins from 6)\n> players N | back\n",
            MIN_PLAYERS, MAX_PLAYERS
        )),
        Phase::RoleAssignment => {
            if let Some(reveal) = &view.reveal {
                let name = name_of(view, reveal.player);
                out.push_str(&format!("Player {} of {}: hand the device to {}.\n", reveal.position, reveal.of, name));
                if !reveal.name_claimed {
                    out.push_str("> name YOUR NAME\n");
                } else if !reveal.revealed {
                    out.push_str("> reveal\n");
                } else {
                    if let Some(me) = view.players.iter().find(|p| p.id == reveal.player) {
                        if let (Some(role), Some(word)) = (me.role, me.word) {
                            out.push_str(&format!("  You are {}. Your word: {}\n", role, word));
                        }
                    }
                    let action = if reveal.position == reveal.of { "start the game" } else { "hide and pass" };
                    out.push_str(&format!("> next ({})\n", action));
                }
            }
        },
        Phase::Discussion => {
            out.push_str(&format!("Round {}. Discuss!\n", view.round));
            if let Some(countdown) = &view.countdown {
                out.push_str(&format!("  time left {}\n", countdown.display));
            }
            out.push_str(&seat_list(&view.players, true));
            out.push_str("> continue (vote now)\n");
        },
        Phase::Voting => {
            if let Some(voting) = &view.voting {
                match voting.state {
                    VotingState::Voting => {
                        let voter = voting.current_voter.map(|id| name_of(view, id)).unwrap_or("?");
                        out.push_str(&format!(
                            "Voter {} of {}: {}, who is undercover?\n",
                            voting.voter_number, voting.total_voters, voter
                        ));
                        out.push_str(&seat_list(&view.players, true));
                        out.push_str("> vote N\n");
                    },
                    VotingState::PassDevice => out.push_str(&format!(
                        "Vote recorded. {} to go. Pass the device.\n> pass\n",
                        voting.votes_remaining
                    )),
                    VotingState::TieBreaker => {
                        let tied: Vec<&str> = voting.tied.iter().map(|&id| name_of(view, id)).collect();
                        out.push_str(&format!("It's a tie between {}.\n> revote | skip\n", tied.join(", ")));
                    },
                    VotingState::Results | VotingState::Skipped => {},
                }
            }
        },
        Phase::EliminationAnnouncement => {
            if let Some(voting) = &view.voting {
                for (id, votes) in &voting.standings {
                    out.push_str(&format!("  {:>2}  {}\n", votes, name_of(view, *id)));
                }
            }
            let eliminated = view.announcement.and_then(|a| a.eliminated);
            match eliminated.and_then(|id| view.players.iter().find(|p| p.id == id)) {
                Some(p) => {
                    let role = p.role.map(|r| r.label()).unwrap_or("?");
                    out.push_str(&format!("{} was eliminated. They were {} ({}).\n", p.name, role, p.word.unwrap_or("?")));
                },
                None => out.push_str("No one was eliminated.\n"),
            }
            out.push_str("> continue\n");
        },
        Phase::GameOver => {
            if let Some(winner) = view.winner {
                out.push_str(&format!("GAME OVER: {:?}\n", winner));
            }
            if let Some(pair) = view.word_pair {
                out.push_str(&format!("  words: {} / {}\n", pair.civilian, pair.undercover));
            }
            for p in &view.players {
                let status = if p.alive { "survived" } else { "eliminated" };
                let role = p.role.map(|r| r.label()).unwrap_or("?");
                out.push_str(&format!("  {} - {} ({}) {}\n", p.name, role, p.word.unwrap_or("?"), status));
            }
            out.push_str("> again\n");
        },
    }

    out
}

fn print_help(json: bool) {
    if !json {
        println!("commands: start local online back classic generated players N name X reveal next vote N pass revote skip continue again quit");
    }
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    rx
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = GameConfig { discussion_seconds: args.discussion_seconds, ..GameConfig::default() };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(seed = ?args.seed, discussion_seconds = config.discussion_seconds, "starting client");

    let mut client = Client::new(config, rng, args.json)?;
    let lines = spawn_stdin_reader();
    let ticker = tick(TICK_INTERVAL);

    client.render()?;

    loop {
        select! {
            recv(lines) -> line => {
                // Stdin closed.
                let line = match line {
                    Ok(line) => line,
                    Err(_) => break,
                };

                match Command::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Help) | None => print_help(args.json),
                    Some(command) => {
                        if !client.handle(command) {
                            print_help(args.json);
                            continue;
                        }
                        client.flush_events()?;
                        client.render()?;
                    },
                }
            },
            recv(ticker) -> _ => {
                if client.on_tick()? {
                    client.flush_events()?;
                    client.render()?;
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(Command::parse("players 6"), Some(Command::Players(6)));
        assert_eq!(Command::parse("  name   Ada Lovelace "), Some(Command::Name("Ada Lovelace".to_string())));
        assert_eq!(Command::parse("vote 3"), Some(Command::Vote(PlayerId(2))));
        assert_eq!(Command::parse("AI"), Some(Command::Words(WordSource::Generated)));
    }

    #[test]
    fn continue_outside_discussion_and_announcement_is_not_handled() {
        let mut client = Client::new(GameConfig::default(), StdRng::seed_from_u64(1), true).unwrap();

        assert!(!client.handle(Command::Continue));
        assert_eq!(client.controller.phase(), Phase::Welcome);
        assert!(client.controller.drain_events().is_empty());

        assert!(client.handle(Command::Start));
        assert_eq!(client.controller.phase(), Phase::ModeSelect);
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(Command::parse("vote 0"), None);
        assert_eq!(Command::parse("players many"), None);
        assert_eq!(Command::parse("dance"), None);
    }
}
