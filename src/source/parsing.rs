use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::aircraft::{classify_all, AircraftState};
use crate::airport::Airport;
use crate::geodesy::{within_radius, GeoPoint};

/// Body of `GET /states/all`. Each state vector is a positional array.
#[derive(Debug, Deserialize)]
pub struct StatesResponse {
    #[serde(default)]
    pub states: Option<Vec<Vec<Value>>>,
}

const IDX_ICAO24: usize = 0;
const IDX_CALLSIGN: usize = 1;
const IDX_ORIGIN_COUNTRY: usize = 2;
const IDX_LAST_CONTACT: usize = 4;
const IDX_LONGITUDE: usize = 5;
const IDX_LATITUDE: usize = 6;
const IDX_BARO_ALTITUDE: usize = 7;
const IDX_VELOCITY: usize = 9;
const IDX_HEADING: usize = 10;
const IDX_VERTICAL_RATE: usize = 11;
const IDX_GEO_ALTITUDE: usize = 13;

fn number(sv: &[Value], idx: usize) -> Option<f64> {
    sv.get(idx).and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn text(sv: &[Value], idx: usize) -> Option<&str> {
    sv.get(idx).and_then(Value::as_str)
}

/// Turns raw state vectors into classified snapshot records, keeping only
/// positioned aircraft within `radius_m` of the airport.
pub fn parse_states(response: &StatesResponse, airport: &Airport, radius_m: f64) -> Vec<AircraftState> {
    let center = airport.location();
    let mut aircraft: Vec<AircraftState> = response
        .states
        .iter()
        .flatten()
        .filter_map(|sv| parse_state_vector(sv, &center, radius_m))
        .collect();

    classify_all(&mut aircraft);
    aircraft
}

fn parse_state_vector(sv: &[Value], center: &GeoPoint, radius_m: f64) -> Option<AircraftState> {
    let icao24 = text(sv, IDX_ICAO24)?;
    let latitude = number(sv, IDX_LATITUDE)?;
    let longitude = number(sv, IDX_LONGITUDE)?;

    let distance = within_radius(center, &GeoPoint::surface(latitude, longitude), radius_m)?;

    // barometric first, geometric fallback, never below the surface
    let altitude = number(sv, IDX_BARO_ALTITUDE)
        .or_else(|| number(sv, IDX_GEO_ALTITUDE))
        .unwrap_or(0.0)
        .max(0.0)
        .round();

    let callsign = text(sv, IDX_CALLSIGN)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("N/A");

    let mut state = AircraftState::new(icao24, callsign)
        .with_position(latitude, longitude, Some(altitude))
        .with_kinematics(number(sv, IDX_VELOCITY), number(sv, IDX_VERTICAL_RATE));
    state.origin_country = text(sv, IDX_ORIGIN_COUNTRY).map(String::from);
    state.last_contact = sv
        .get(IDX_LAST_CONTACT)
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    state.heading_deg = number(sv, IDX_HEADING);
    state.distance_from_airport_m = Some(distance.round());

    Some(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::Status;
    use crate::airport::{default_airports, find_airport};
    use crate::geodesy::AIRPORT_RADIUS_M;

    fn sea() -> Airport {
        find_airport(&default_airports(), "SEA").cloned().unwrap()
    }

    fn response(json: &str) -> StatesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_state_vectors() {
        let r = response(
            r#"{"time": 1700000000, "states": [
                ["a1b2c3", "ASA123  ", "United States", 1699999990, 1699999999,
                 -122.30, 47.46, 1500.4, false, 120.0, 180.0, -5.0, null, 1520.0, "1200", false, 0],
                ["d4e5f6", "", "Canada", null, 1699999999,
                 -122.31, 47.45, null, true, null, 90.0, null, null, null, null, false, 0]
            ]}"#,
        );
        let aircraft = parse_states(&r, &sea(), AIRPORT_RADIUS_M);
        assert_eq!(aircraft.len(), 2);

        let a = &aircraft[0];
        assert_eq!(a.icao24, "a1b2c3");
        assert_eq!(a.callsign, "ASA123");
        assert_eq!(a.origin_country.as_deref(), Some("United States"));
        assert_eq!(a.altitude_m, Some(1500.0));
        assert_eq!(a.velocity_mps, Some(120.0));
        assert_eq!(a.vertical_rate_mps, Some(-5.0));
        assert_eq!(a.status, Status::Airborne);
        assert!(a.last_contact.is_some());

        let b = &aircraft[1];
        assert_eq!(b.callsign, "N/A");
        assert_eq!(b.altitude_m, Some(0.0));
        assert_eq!(b.velocity_mps, None);
        assert_eq!(b.status, Status::Ground);
    }

    #[test]
    fn falls_back_to_geometric_altitude_and_clamps_negative() {
        let r = response(
            r#"{"time": 0, "states": [
                ["aaaaaa", "X", "US", null, 0, -122.30, 47.45, null, false, 0, 0, 0, null, 812.6],
                ["bbbbbb", "Y", "US", null, 0, -122.30, 47.45, -20.0, true, 0, 0, 0, null, null]
            ]}"#,
        );
        let aircraft = parse_states(&r, &sea(), AIRPORT_RADIUS_M);
        assert_eq!(aircraft[0].altitude_m, Some(813.0));
        assert_eq!(aircraft[1].altitude_m, Some(0.0));
    }

    #[test]
    fn drops_unpositioned_and_distant_reports() {
        let r = response(
            r#"{"time": 0, "states": [
                ["aaaaaa", "X", "US", null, 0, null, 47.45, 100.0, false, 0, 0, 0, null, null],
                ["bbbbbb", "Y", "US", null, 0, -121.80, 47.95, 100.0, false, 0, 0, 0, null, null],
                ["cccccc", "Z", "US", null, 0, -122.30, 47.45, 100.0, false, 0, 0, 0, null, null]
            ]}"#,
        );
        let aircraft = parse_states(&r, &sea(), AIRPORT_RADIUS_M);
        assert_eq!(aircraft.len(), 1);
        assert_eq!(aircraft[0].icao24, "cccccc");
        assert!(aircraft[0].distance_from_airport_m.unwrap() < 1000.0);
    }

    #[test]
    fn null_states_is_empty() {
        let r = response(r#"{"time": 0, "states": null}"#);
        assert!(parse_states(&r, &sea(), AIRPORT_RADIUS_M).is_empty());
    }
}
