//! SolarEdge monitoring API: current production of a site.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://monitoringapi.solaredge.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// SolarEdge monitoring client for a single site.
///
/// # Example
/// ```no_run
/// use solarcharge::solar::SolarEdgeClient;
///
/// # async fn example() -> solarcharge::Result<()> {
/// let solar = SolarEdgeClient::new("api-key", 117)?;
/// println!("{} W", solar.current_power().await?);
/// # Ok(())
/// # }
/// ```
pub struct SolarEdgeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    site_id: u64,
}

impl SolarEdgeClient {
    pub fn new(api_key: impl Into<String>, site_id: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            site_id,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Current production of the site in watts.
    pub async fn current_power(&self) -> Result<f64> {
        let resp = self
            .client
            .get(format!("{}/sites/{}/overview", self.base_url, self.site_id))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::api(
                status.as_u16(),
                "SolarEdge overview request failed",
            ));
        }
        let payload: OverviewResponse = resp.json().await?;
        if payload.sites_overviews.count == 0 {
            return Err(Error::InvalidState(
                "no sites overviews in SolarEdge response".to_string(),
            ));
        }
        let site = payload
            .sites_overviews
            .site_energy_list
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::InvalidState("empty site energy list in SolarEdge response".to_string())
            })?;
        let power = site.site_overview.current_power.power;
        debug!(site_id = self.site_id, power, "read site power");
        Ok(power)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverviewResponse {
    sites_overviews: SitesOverviews,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SitesOverviews {
    count: u32,
    site_energy_list: Vec<SiteEnergy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteEnergy {
    #[allow(dead_code)]
    site_id: u64,
    site_overview: SiteOverview,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteOverview {
    current_power: CurrentPower,
}

#[derive(Debug, Deserialize)]
struct CurrentPower {
    power: f64,
}
