//! Solarcharge binary entry point.

use clap::Parser;
use solarcharge::cli::{commands, Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Login(args) => commands::handle_login(&args).await,
        Commands::Run(args) => commands::handle_run(&args).await,
        Commands::Power(args) => commands::handle_power(&args).await,
        Commands::Vehicles(args) => commands::handle_vehicles(&args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
