use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use noughts_and_crosses::{
    config::{Cli, Config},
    game::Game,
    storage::FileStorage,
    term,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the game, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = Config::from_cli(Cli::parse())?;
    info!(?config, "starting");

    let storage = FileStorage::new(&config.data_dir);
    info!(data_dir = %storage.dir().display(), "using storage");

    term::play(
        Game::new(storage),
        config.strategy.opponent(),
        config.computer_delay(),
        config.mode,
        config.names(),
    )
    .await
}
