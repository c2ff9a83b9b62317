use async_trait::async_trait;
use reqwest::Client;

use crate::aircraft::AircraftState;
use crate::airport::Airport;
use crate::web::config::OpenSkyConfig;

use super::error::FetchError;
use super::parsing::{parse_states, StatesResponse};
use super::SnapshotSource;

/// Fetches live state vectors from the OpenSky REST API.
pub struct OpenSkyClient {
    client: Client,
    config: OpenSkyConfig,
}

impl OpenSkyClient {
    pub fn new(config: OpenSkyConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn states_url(&self) -> String {
        format!("{}/states/all", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SnapshotSource for OpenSkyClient {
    async fn fetch(&self, airport: &Airport) -> Result<Vec<AircraftState>, FetchError> {
        let span = self.config.box_half_span_deg;
        let params = [
            ("lamin", airport.latitude - span),
            ("lamax", airport.latitude + span),
            ("lomin", airport.longitude - span),
            ("lomax", airport.longitude + span),
        ];

        let response = self
            .client
            .get(self.states_url())
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let states: StatesResponse = serde_json::from_str(&body)?;
        let aircraft = parse_states(&states, airport, self.config.radius_m);

        log::info!(
            "fetched {} aircraft within {:.0} m of {}",
            aircraft.len(),
            self.config.radius_m,
            airport.code
        );
        Ok(aircraft)
    }
}
