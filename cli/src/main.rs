use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use arcade_core::{GameManager, MemoryStore, SharedStore, shared_store};
use arcade_protocol::{ClientMessage, GamesPanel};
use clap::Parser;

use crate::store::JsonFileStore;

mod store;

/// Line-oriented host for the games panel: one JSON client message per stdin
/// line in, one JSON server message per stdout line out.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// JSON file keeping the best score and last selected game
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Force a seed instead of random
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let store: SharedStore = match &args.store {
        Some(path) => {
            let store = JsonFileStore::open(path)?;
            log::debug!("Settings loaded from {}", store.path().display());
            shared_store(store)
        }
        None => shared_store(MemoryStore::new()),
    };

    let manager = match args.seed {
        Some(seed) => {
            log::debug!("seed: {seed}");
            GameManager::with_seed(store, seed)
        }
        None => GameManager::new(store),
    };
    let mut panel = GamesPanel::new(manager);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("Could not read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let message: ClientMessage = match serde_json::from_str(&line) {
            Ok(message) => message,
            Err(err) => {
                log::warn!("Skipping malformed message: {err}");
                continue;
            }
        };

        let reply = panel.handle_message(message);
        serde_json::to_writer(&mut stdout, &reply).context("Could not encode reply")?;
        writeln!(stdout)?;
        stdout.flush()?;
    }

    log::debug!("Input closed, shutting down");
    Ok(())
}
