use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geodesy::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Airport {
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Airport {
    fn new(code: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::surface(self.latitude, self.longitude)
    }
}

pub fn default_airports() -> Vec<Airport> {
    vec![
        Airport::new("SEA", "Seattle-Tacoma", 47.450237, -122.3088),
        Airport::new("LHR", "London Heathrow", 51.4700, -0.4543),
        Airport::new("SIN", "Singapore Changi", 1.3644, 103.9915),
        Airport::new("DEL", "Delhi IGI", 28.5562, 77.1000),
        Airport::new("BLR", "Bengaluru KIA", 13.1982, 77.7065),
        Airport::new("ATL", "Atlanta Hartsfield", 33.6407, -84.4277),
        Airport::new("SFO", "San Francisco International", 37.6213, -122.3790),
        Airport::new("JFK", "New York JFK", 40.6413, -73.7781),
        Airport::new("ORD", "Chicago O'Hare", 41.9742, -87.9073),
    ]
}

pub fn find_airport<'a>(airports: &'a [Airport], code: &str) -> Option<&'a Airport> {
    airports.iter().find(|a| a.code.eq_ignore_ascii_case(code))
}
