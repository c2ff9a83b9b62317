mod error;
mod opensky;
mod parsing;

use async_trait::async_trait;

use crate::aircraft::AircraftState;
use crate::airport::Airport;

pub use error::FetchError;
pub use opensky::OpenSkyClient;
pub use parsing::{parse_states, StatesResponse};

/// Producer of raw snapshots around an airport.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self, airport: &Airport) -> Result<Vec<AircraftState>, FetchError>;
}
