mod cmd;
mod config;
mod error;

use clap::Parser;
use config::{Cli, Commands, RowwireConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = RowwireConfig::load(cli.config.as_deref())
        .map(|cfg| cfg.with_zone(cli.zone.clone()))
        .and_then(|cfg| match cli.command {
            Commands::Decode(args) => cmd::decode::run(&args, &cfg),
            Commands::Encode(args) => cmd::encode::run(&args, &cfg),
            Commands::Rows(args) => cmd::rows::run(&args, &cfg),
        });
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
