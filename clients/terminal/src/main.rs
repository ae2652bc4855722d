//! Terminal Pong client.

use crate::app::App;
use clap::Parser;
use color_eyre::eyre::WrapErr;
use pong_core::Config;
use std::fs::File;
use std::path::PathBuf;

pub mod app;
pub mod event;
pub mod ui;

#[derive(Parser)]
#[command(name = "pong")]
#[command(author, version, about = "Pong in the terminal")]
struct Cli {
    /// Fill the whole terminal instead of a centred box
    #[arg(long, short = 'f')]
    fullscreen: bool,

    /// Two players on one keyboard (W/S and ↑/↓)
    #[arg(long, short = 'm')]
    two_player: bool,

    /// Seed for serve directions
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (RUST_LOG sets the level). Nothing is logged otherwise,
    /// since stderr belongs to the terminal UI.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }

    let mut config = Config {
        two_player: cli.two_player,
        ..Config::default()
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let terminal = ratatui::init();
    let result = App::new(config, cli.fullscreen).and_then(|app| app.run(terminal));
    ratatui::restore();
    result
}
