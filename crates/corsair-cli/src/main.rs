//! Command-line front end for Corsair.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use corsair_engine::{BackPolicy, Game, GameConfig, GameError, WorldContent};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "corsair",
    about = "Corsair, une aventure de pirates en mode texte",
    version
)]
struct Cli {
    /// RNG seed for character wandering
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Print character movements after each move
    #[arg(short, long)]
    debug: bool,

    /// Make `back` replay room events and visit objectives
    #[arg(long)]
    back_replays_events: bool,

    /// Player name (asked for when absent)
    #[arg(short, long)]
    name: Option<String>,

    /// JSON world file replacing the built-in archipelago
    #[arg(short, long)]
    world: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> GameConfig {
        let policy = if self.back_replays_events {
            BackPolicy::Replay
        } else {
            BackPolicy::Correction
        };
        GameConfig::default()
            .with_seed(self.seed)
            .with_debug(self.debug)
            .with_back_policy(policy)
    }

    fn content(&self) -> Result<WorldContent, String> {
        let content = match &self.world {
            Some(path) => {
                debug!(path = %path.display(), "loading world file");
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
                WorldContent::from_json(&text)
            }
            None => WorldContent::archipelago(),
        }
        .map_err(|e| e.to_string())?;
        // fail before asking for a name
        content.build().map_err(|e| e.to_string())?;
        Ok(content)
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corsair=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let content = cli.content()?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let mut game = start(&content, cli.name.clone(), cli.config(), &mut lines)?;
    println!("\n{}\n", game.welcome());

    while !game.is_finished() {
        prompt("> ")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| e.to_string())?;
        match game.process(&line) {
            Ok(text) if text.is_empty() => {}
            Ok(text) => println!("\n{text}\n"),
            Err(e) => println!("\n{e}\n"),
        }
    }
    Ok(())
}

/// Create the game, asking for a name until one is accepted.
fn start(
    content: &WorldContent,
    mut name: Option<String>,
    config: GameConfig,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Game, String> {
    loop {
        let candidate = match name.take() {
            Some(n) => n,
            None => {
                prompt("\nEntrez votre nom: ")?;
                match lines.next() {
                    Some(line) => line.map_err(|e| e.to_string())?,
                    None => return Err("no player name given".into()),
                }
            }
        };
        match Game::with_world(content, &candidate, config.clone()) {
            Ok(game) => return Ok(game),
            Err(GameError::Core(e)) => println!("\n{e}"),
            Err(e) => return Err(e.to_string()),
        }
    }
}

fn prompt(text: &str) -> Result<(), String> {
    print!("{text}");
    io::stdout().flush().map_err(|e| e.to_string())
}
