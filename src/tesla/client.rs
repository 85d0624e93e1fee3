use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::tesla::types::{
    CarStatus, CommandResponse, Vehicle, VehicleDataResponse, VehiclesResponse, WakeResponse,
};

const DEFAULT_BASE_URL: &str = "https://owner-api.teslamotors.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// One initial wake request plus this many further polls.
const WAKE_ATTEMPTS: u32 = 14;
const DEFAULT_WAKE_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Owner API client authenticated with a bearer access token.
///
/// # Example
/// ```no_run
/// use solarcharge::tesla::OwnerApiClient;
///
/// # async fn example() -> solarcharge::Result<()> {
/// let api = OwnerApiClient::new("access-token")?;
/// for vehicle in api.vehicles().await? {
///     println!("{} is {}", vehicle.id, vehicle.state);
/// }
/// # Ok(())
/// # }
/// ```
pub struct OwnerApiClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    wake_poll_interval: Duration,
}

impl OwnerApiClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
            wake_poll_interval: DEFAULT_WAKE_POLL_INTERVAL,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_wake_poll_interval(mut self, interval: Duration) -> Self {
        self.wake_poll_interval = interval;
        self
    }

    /// List the vehicles on the account.
    pub async fn vehicles(&self) -> Result<Vec<Vehicle>> {
        let payload: VehiclesResponse = self.get("/api/1/vehicles").await?;
        Ok(payload.response)
    }

    /// Look up one vehicle's reported state (`online`, `asleep`, ...).
    pub async fn vehicle_state(&self, vehicle_id: i64) -> Result<String> {
        self.vehicles()
            .await?
            .into_iter()
            .find(|v| v.id == vehicle_id)
            .map(|v| v.state)
            .ok_or_else(|| Error::InvalidState(format!("no vehicle with id {vehicle_id}")))
    }

    /// Poll the wake endpoint until the vehicle reports online.
    pub async fn wake(&self, vehicle_id: i64) -> Result<()> {
        let mut state = String::from("unknown");
        for attempt in 1..=WAKE_ATTEMPTS {
            info!(vehicle_id, attempt, "waking vehicle");
            let payload: WakeResponse = self
                .post(&format!("/api/1/vehicles/{vehicle_id}/wake_up"))
                .await?;
            state = payload.response.state;
            if state == "online" {
                return Ok(());
            }
            tokio::time::sleep(self.wake_poll_interval).await;
        }
        Err(Error::InvalidState(format!(
            "vehicle {vehicle_id} is not waking, still {state}"
        )))
    }

    /// Wake the vehicle unless it already reports online.
    pub async fn ensure_awake(&self, vehicle_id: i64) -> Result<()> {
        if self.vehicle_state(vehicle_id).await? == "online" {
            return Ok(());
        }
        self.wake(vehicle_id).await
    }

    /// Fetch `vehicle_data` and condense it for the controller. Wakes the
    /// vehicle first; a sleeping vehicle serves no data.
    pub async fn car_status(&self, vehicle_id: i64) -> Result<CarStatus> {
        self.ensure_awake(vehicle_id).await?;
        let payload: VehicleDataResponse = self
            .get(&format!("/api/1/vehicles/{vehicle_id}/vehicle_data"))
            .await?;
        Ok(CarStatus::from(payload.response))
    }

    /// Send a named vehicle command. The API can accept the request yet
    /// refuse the command, so the embedded result flag is checked too.
    pub async fn command(&self, vehicle_id: i64, name: &str) -> Result<()> {
        self.ensure_awake(vehicle_id).await?;
        let payload: CommandResponse = self
            .post(&format!("/api/1/vehicles/{vehicle_id}/command/{name}"))
            .await?;
        if !payload.response.result {
            return Err(Error::InvalidState(format!(
                "command {name} rejected: {}",
                payload.response.reason
            )));
        }
        debug!(vehicle_id, command = name, "command accepted");
        Ok(())
    }

    pub async fn start_charging(&self, vehicle_id: i64) -> Result<()> {
        self.command(vehicle_id, "charge_start").await
    }

    pub async fn stop_charging(&self, vehicle_id: i64) -> Result<()> {
        self.command(vehicle_id, "charge_stop").await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::api(status.as_u16(), format!("GET {path} failed")));
        }
        Ok(resp.json().await?)
    }

    async fn post<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::api(status.as_u16(), format!("POST {path} failed")));
        }
        Ok(resp.json().await?)
    }
}
