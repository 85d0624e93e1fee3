//! Solarcharge: charge Tesla vehicles from surplus solar production.
//!
//! Three thin API clients and a small controller:
//!
//! - [`auth`] logs in to the Tesla SSO service (authorization code with
//!   PKCE) and returns an access/refresh token pair.
//! - [`tesla`] talks to the Owner API: vehicle listing, wake-up, charge
//!   state, and charge commands.
//! - [`solar`] reads the current production of a SolarEdge site.
//! - [`charge`] pairs configured sites with configured cars and starts or
//!   stops charging based on live surplus.
//!
//! # Quick start
//!
//! ```no_run
//! use solarcharge::auth::SsoClient;
//!
//! # async fn example() -> Result<(), solarcharge::auth::AuthError> {
//! let sso = SsoClient::new()?;
//! let token = sso.login("owner@example.com", "hunter2").await?;
//! println!("access_token is {}", token.access_token);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod charge;
pub mod cli;
pub mod config;
pub mod error;
pub mod solar;
pub mod tesla;

pub use error::{Error, Result};
