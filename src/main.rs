use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;
use neon_snake::game::GameConfig;
use neon_snake::logging;
use neon_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "neon_snake")]
#[command(version, about = "A level-based snake game for the terminal")]
struct Cli {
    /// Starting grid size (the grid grows with each level)
    #[arg(
        long,
        default_value = "20",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(4..=40)
    )]
    grid_size: usize,

    /// Seed for reproducible food and obstacle placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the session log
    #[arg(long, default_value = "neon-snake.log")]
    log_file: PathBuf,

    /// Disable logging entirely
    #[arg(long)]
    no_log: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.no_log {
        logging::init(&cli.log_file)?;
    }
    info!("Starting neon snake (grid size {})", cli.grid_size);

    let config = GameConfig::new(cli.grid_size);

    let mut human_mode = HumanMode::new(config, cli.seed);
    human_mode.run().await?;

    Ok(())
}
