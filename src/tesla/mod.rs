//! Tesla Owner API: vehicle listing, wake-up, charge state, and commands.

pub mod client;
pub mod types;

pub use client::OwnerApiClient;
pub use types::{CarStatus, ChargeState, DriveState, Vehicle, VehicleData};
