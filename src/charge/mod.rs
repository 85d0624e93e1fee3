//! Solar-surplus charging controller.
//!
//! One sweep pairs every configured site with every configured car, keeps
//! the pairs that are physically co-located, and applies two rules: start
//! charging when the site produces surplus and the car can take it, stop
//! charging the controller started once the surplus is gone.

pub mod ledger;

pub use ledger::ChargeLedger;

use tracing::{debug, info, warn};

use crate::config::{CarConfig, SiteConfig};
use crate::error::Result;
use crate::solar::SolarEdgeClient;
use crate::tesla::{CarStatus, OwnerApiClient};

/// Minimum head-room between charge limit and battery level before a start
/// command is worth issuing.
const START_CHARGE_DIFF: i32 = 5;
/// A car counts as "at" a site when within this many kilometres.
const MAX_SITE_DISTANCE_KM: f64 = 0.01;

/// What one site/car evaluation concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeAction {
    Start,
    Stop,
    Leave,
}

/// The two charging rules, on already-fetched data.
pub fn decide(
    status: &CarStatus,
    site_power: f64,
    site: &SiteConfig,
    charging_by_solar: bool,
) -> ChargeAction {
    if !status.is_charging
        && status.is_plugged_in
        && site_power > site.start_charge_threshold
    {
        if status.charge_limit - status.battery_level > START_CHARGE_DIFF {
            return ChargeAction::Start;
        }
    } else if charging_by_solar && status.is_charging && site_power < site.stop_charge_threshold {
        return ChargeAction::Stop;
    }
    ChargeAction::Leave
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Sweeps sites and cars and issues charge commands.
pub struct Controller {
    ledger: ChargeLedger,
    dry_run: bool,
    owner_api_base: Option<String>,
    solar_base: Option<String>,
}

impl Controller {
    pub fn new(ledger: ChargeLedger) -> Self {
        Self {
            ledger,
            dry_run: false,
            owner_api_base: None,
            solar_base: None,
        }
    }

    /// Evaluate the rules without sending charge commands or touching the
    /// ledger.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_owner_api_base(mut self, url: impl Into<String>) -> Self {
        self.owner_api_base = Some(url.into());
        self
    }

    pub fn with_solar_base(mut self, url: impl Into<String>) -> Self {
        self.solar_base = Some(url.into());
        self
    }

    /// One sweep over all site/car pairs. Per-car failures are logged and
    /// skipped; the sweep continues. Returns how many cars are charging by
    /// solar when the sweep ends.
    pub async fn run_once(&mut self, sites: &[SiteConfig], cars: &[CarConfig]) -> Result<usize> {
        let mut charging = 0;
        for site in sites {
            let power = match self.site_power(site).await {
                Ok(power) => power,
                Err(err) => {
                    warn!(site = %site.name, %err, "skipping site, power reading failed");
                    continue;
                }
            };
            debug!(site = %site.name, power, "site power read");
            for car in cars {
                match self.evaluate_pair(site, power, car).await {
                    Ok(true) => charging += 1,
                    Ok(false) => {}
                    Err(err) => warn!(car = %car.name, %err, "car evaluation failed"),
                }
            }
        }
        if !self.dry_run {
            self.ledger.persist()?;
        }
        Ok(charging)
    }

    async fn site_power(&self, site: &SiteConfig) -> Result<f64> {
        let mut solar = SolarEdgeClient::new(site.api_key.clone(), site.site_id)?;
        if let Some(base) = &self.solar_base {
            solar = solar.with_base_url(base.clone());
        }
        solar.current_power().await
    }

    /// Evaluate one pair; returns whether the car is charging by solar.
    async fn evaluate_pair(
        &mut self,
        site: &SiteConfig,
        power: f64,
        car: &CarConfig,
    ) -> Result<bool> {
        let mut api = OwnerApiClient::new(car.access_token.clone())?;
        if let Some(base) = &self.owner_api_base {
            api = api.with_base_url(base.clone());
        }
        let status = api.car_status(car.vehicle_id).await?;
        let km = haversine_km(site.latitude, site.longitude, status.latitude, status.longitude);
        if km > MAX_SITE_DISTANCE_KM {
            debug!(car = %car.name, site = %site.name, km, "car is not at this site");
            return Ok(false);
        }
        let by_solar = self.ledger.is_charging_by_solar(car.vehicle_id);
        match decide(&status, power, site, by_solar) {
            ChargeAction::Start => {
                info!(car = %car.name, site = %site.name, power, "starting solar charge");
                if self.dry_run {
                    return Ok(true);
                }
                api.start_charging(car.vehicle_id).await?;
                self.ledger.mark_started(car.vehicle_id);
                Ok(true)
            }
            ChargeAction::Stop => {
                info!(car = %car.name, site = %site.name, power, "stopping solar charge");
                if self.dry_run {
                    return Ok(false);
                }
                api.stop_charging(car.vehicle_id).await?;
                self.ledger.mark_stopped(car.vehicle_id);
                Ok(false)
            }
            ChargeAction::Leave => Ok(by_solar && status.is_charging),
        }
    }
}
