mod game;
mod term;

use std::{fs::File, path::{Path, PathBuf}, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snake::Config;

/// Grid snake in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML file with game settings; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Play-field width in pixels.
    #[arg(long)]
    width: Option<i32>,

    /// Play-field height in pixels.
    #[arg(long)]
    height: Option<i32>,

    #[arg(long)]
    cell_size: Option<i32>,

    /// Base ticks per second.
    #[arg(long)]
    fps: Option<u32>,

    #[arg(long)]
    max_length: Option<usize>,

    /// Write logs here. The terminal belongs to the game, so without this
    /// nothing is logged. Filter with RUST_LOG.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(width) = self.width {
            config.screen_width = width;
        }
        if let Some(height) = self.height {
            config.screen_height = height;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(max_length) = self.max_length {
            config.max_length = max_length;
        }

        config.validate().context("invalid game settings")?;
        Ok(config)
    }
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {}", err))
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_tracing(path)?;
    }

    let config = args.config()?;
    let rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    info!(?config, seed = ?args.seed, "starting");

    let mut game = game::SnakeGame::new(config, rng)?;
    game.run()
}
