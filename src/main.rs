//! Concierge CLI binary entry point.

use clap::Parser;
use concierge::cli::commands::{handle_chat, handle_inquire, handle_kb};
use concierge::cli::{Cli, Commands};
use concierge::config::ConciergeConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match ConciergeConfig::load().and_then(|c| c.validate().map(|()| c)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Chat(args) => handle_chat(&config, args).await,
        Commands::Inquire(args) => handle_inquire(&config, args).await,
        Commands::Kb(kb_args) => handle_kb(&config, kb_args.command).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
