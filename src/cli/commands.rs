//! CLI command handlers.

use crate::auth::SsoClient;
use crate::charge::{ChargeLedger, Controller};
use crate::cli::{LoginArgs, PowerArgs, RunArgs, VehiclesArgs};
use crate::config::Config;
use crate::solar::SolarEdgeClient;
use crate::tesla::OwnerApiClient;

/// Handle `solarcharge login <identity> <credential>`.
pub async fn handle_login(args: &LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let sso = SsoClient::new()?;
    let token = sso.login(&args.identity, &args.credential).await?;
    println!("access_token is {}", token.access_token);
    println!("refresh_token is {}", token.refresh_token);
    Ok(())
}

/// Handle `solarcharge run`.
pub async fn handle_run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args.config.as_deref())?;
    let ledger = ChargeLedger::open_default()?;
    let mut controller = Controller::new(ledger).with_dry_run(args.dry_run);
    let charging = controller.run_once(&config.sites, &config.cars).await?;
    println!("charging: {charging}");
    Ok(())
}

/// Handle `solarcharge power`.
pub async fn handle_power(args: &PowerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let solar = SolarEdgeClient::new(args.api_key.clone(), args.site_id)?;
    let power = solar.current_power().await?;
    println!("current power is {power} W");
    Ok(())
}

/// Handle `solarcharge vehicles`.
pub async fn handle_vehicles(args: &VehiclesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let api = OwnerApiClient::new(args.access_token.clone())?;
    for vehicle in api.vehicles().await? {
        println!("{} {} ({})", vehicle.id, vehicle.state, vehicle.vehicle_id);
    }
    Ok(())
}
