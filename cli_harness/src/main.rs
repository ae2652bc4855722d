//! Headless harness: plays pong_core matches with scripted key pressers and
//! prints a summary per match.

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use pong_core::*;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "cli_harness")]
#[command(about = "Run Pong matches headless with scripted players")]
struct Cli {
    /// Number of matches to play
    #[arg(long, default_value_t = 1)]
    matches: u32,

    /// Give up on a match after this many ticks
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u64,

    /// Seed for serve directions
    #[arg(long)]
    seed: Option<u64>,

    /// Both paddles played by scripted humans
    #[arg(long, short = 'm')]
    two_player: bool,

    /// JSON file with config overrides; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Right-hand player presses nothing
    #[arg(long)]
    idle: bool,

    /// Ticks of title-screen attract mode before the first match starts
    #[arg(long, default_value_t = 0)]
    demo_ticks: u64,
}

/// Scripted key presser that chases the ball with a dead zone, and only
/// while the ball is coming its way
#[derive(Debug, Clone, Copy)]
struct Bot {
    side: Side,
    slack: f32,
    idle: bool,
}

impl Bot {
    fn new(side: Side, slack: f32) -> Self {
        Self {
            side,
            slack,
            idle: false,
        }
    }

    fn idle(side: Side) -> Self {
        Self {
            side,
            slack: 0.0,
            idle: true,
        }
    }

    fn keys(&self, game: &Game) -> PaddleKeys {
        if self.idle || !self.side.is_approached_by(game.ball.vel.x) {
            return PaddleKeys::default();
        }
        let paddle = game.paddles[self.side.index()].center().y;
        let ball = game.ball.center().y;
        PaddleKeys::new(ball < paddle - self.slack, ball > paddle + self.slack)
    }
}

/// Outcome of one match
#[derive(Debug, Default)]
struct MatchReport {
    winner: Option<Side>,
    score: [u8; 2],
    ticks: u64,
    hits: [u32; 2],
    points: u32,
}

/// CLI application state
struct Harness {
    game: Game,
    bots: [Bot; 2],
    running: Arc<AtomicBool>,
    max_ticks: u64,
}

impl Harness {
    fn new(config: Config, cli: &Cli, running: Arc<AtomicBool>) -> color_eyre::Result<Self> {
        let game = Game::new(config).wrap_err("invalid config")?;
        let right = if cli.idle {
            Bot::idle(Side::Right)
        } else {
            Bot::new(Side::Right, 6.0)
        };

        Ok(Self {
            game,
            bots: [Bot::new(Side::Left, 10.0), right],
            running,
            max_ticks: cli.max_ticks,
        })
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    fn input(&self) -> Input {
        Input::new(
            self.bots[0].keys(&self.game),
            self.bots[1].keys(&self.game),
            0,
        )
    }

    /// Let the title attract mode run on its own
    fn demo(&mut self, ticks: u64) {
        let mut hits = 0;
        for _ in 0..ticks {
            if !self.is_running() {
                break;
            }
            if let Some(Event::PaddleHit(_)) = self.game.step(&Input::zero()) {
                hits += 1;
            }
        }
        log::info!("attract mode: {ticks} ticks, {hits} paddle hits");
    }

    /// Start (or restart) a match and play it out
    fn play_match(&mut self) -> MatchReport {
        let start = match self.game.state {
            MatchState::GameOver(_) => BUTTON_RESTART,
            _ => BUTTON_START,
        };
        self.game.step(&Input::buttons(start));

        let mut report = MatchReport::default();
        while self.is_running() && report.ticks < self.max_ticks {
            let input = self.input();
            report.ticks += 1;

            match self.game.step(&input) {
                Some(Event::PaddleHit(side)) => report.hits[side.index()] += 1,
                Some(Event::Scored { scorer, score }) => {
                    report.points += 1;
                    log::debug!("point {scorer:?}: {} - {}", score[0], score[1]);
                }
                Some(Event::MatchWon { winner, score }) => {
                    report.points += 1;
                    log::info!("{winner:?} wins {} - {}", score[0], score[1]);
                    break;
                }
                None => {}
            }
        }

        report.winner = self.game.winner();
        report.score = self.game.score;
        report
    }
}

fn load_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .wrap_err_with(|| format!("failed to parse {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.two_player {
        config.two_player = true;
    }
    Ok(config)
}

fn describe(side: Option<Side>, two_player: bool) -> &'static str {
    match (side, two_player) {
        (None, _) => "nobody",
        (Some(Side::Left), true) => "left bot",
        (Some(Side::Left), false) => "computer",
        (Some(Side::Right), _) => "right bot",
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.matches == 0 {
        bail!("--matches must be at least 1");
    }
    let config = load_config(&cli)?;

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::Relaxed))
        .wrap_err("failed to install Ctrl-C handler")?;

    let mut harness = Harness::new(config, &cli, running)?;
    harness.demo(cli.demo_ticks);

    let started = Instant::now();
    let mut wins = [0u32; 2];
    let mut total_ticks = 0;

    for n in 1..=cli.matches {
        if !harness.is_running() {
            log::warn!("interrupted before match {n}");
            break;
        }

        let report = harness.play_match();
        if let Some(winner) = report.winner {
            wins[winner.index()] += 1;
        }
        total_ticks += report.ticks;

        println!(
            "match {n}: winner {:<9} score {:>2} - {:<2} ticks {:>7} points {:>2} hits L{} R{}",
            describe(report.winner, config.two_player),
            report.score[0],
            report.score[1],
            report.ticks,
            report.points,
            report.hits[0],
            report.hits[1],
        );
    }

    let elapsed = started.elapsed();
    println!(
        "wins L{} R{}, {total_ticks} ticks in {:.2?} ({:.0} ticks/s)",
        wins[0],
        wins[1],
        elapsed,
        total_ticks as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("cli_harness").chain(args.iter().copied()))
    }

    #[test]
    fn test_bot_chases_ball() {
        let mut game = Game::new(Config::default()).unwrap();
        let bot = Bot::new(Side::Right, 6.0);
        game.ball.vel = Vec2::new(4.0, 0.0);

        game.ball.pos.y = 10.0;
        assert_eq!(bot.keys(&game), PaddleKeys::up());

        game.ball.pos.y = 400.0;
        assert_eq!(bot.keys(&game), PaddleKeys::down());

        game.ball.pos.y = game.paddles[1].center().y - game.ball.size.y * 0.5;
        assert_eq!(bot.keys(&game), PaddleKeys::default());

        // Ball heading away
        game.ball.pos.y = 10.0;
        game.ball.vel.x = -4.0;
        assert_eq!(bot.keys(&game), PaddleKeys::default());
    }

    #[test]
    fn test_idle_bot_presses_nothing() {
        let mut game = Game::new(Config::default()).unwrap();
        game.ball.pos.y = 10.0;

        assert_eq!(Bot::idle(Side::Right).keys(&game), PaddleKeys::default());
    }

    #[test]
    fn test_short_match_finishes() {
        let cli = cli(&["--seed", "7", "--idle"]);
        let config = Config {
            win_score: 2,
            ..load_config(&cli).unwrap()
        };
        let mut harness = Harness::new(config, &cli, Arc::new(AtomicBool::new(true))).unwrap();

        let report = harness.play_match();

        let winner = report.winner.expect("match should finish");
        assert_eq!(report.score[winner.index()], 2);
        assert_eq!(report.points, u32::from(report.score[0] + report.score[1]));

        // Second match starts from a restart
        let report = harness.play_match();
        assert!(report.winner.is_some());
    }

    #[test]
    fn test_interrupted_match_stops() {
        let cli = cli(&[]);
        let mut harness =
            Harness::new(Config::default(), &cli, Arc::new(AtomicBool::new(false))).unwrap();

        let report = harness.play_match();

        assert_eq!(report.ticks, 0);
        assert_eq!(report.winner, None);
    }

    #[test]
    fn test_config_overrides() {
        let cli = cli(&["-m", "--seed", "42"]);
        let config = load_config(&cli).unwrap();

        assert!(config.two_player);
        assert_eq!(config.seed, 42);
        assert_eq!(config.win_score, Config::default().win_score);
    }
}
