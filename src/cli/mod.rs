//! CLI surface for the solarcharge binary.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Charge Tesla vehicles from surplus solar production.
#[derive(Parser, Debug)]
#[command(name = "solarcharge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to the Tesla SSO service and print the token pair
    Login(LoginArgs),
    /// Run one charging sweep over all configured sites and cars
    Run(RunArgs),
    /// Show the current production of a SolarEdge site
    Power(PowerArgs),
    /// List the vehicles on a Tesla account
    Vehicles(VehiclesArgs),
}

/// Arguments for `solarcharge login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Account identity (email)
    pub identity: String,
    /// Account password
    pub credential: String,
}

/// Arguments for `solarcharge run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the config file (defaults to the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Evaluate the rules without sending charge commands
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `solarcharge power`.
#[derive(Parser, Debug)]
pub struct PowerArgs {
    /// SolarEdge site id
    #[arg(long)]
    pub site_id: u64,
    /// SolarEdge API key
    #[arg(long)]
    pub api_key: String,
}

/// Arguments for `solarcharge vehicles`.
#[derive(Parser, Debug)]
pub struct VehiclesArgs {
    /// Owner API access token
    #[arg(long)]
    pub access_token: String,
}
