use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::geodesy::GeoPoint;

/// Ground status of one aircraft within one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
pub enum Status {
    #[serde(rename = "On Ground")]
    #[strum(serialize = "On Ground")]
    Ground,
    #[default]
    #[serde(rename = "In Air")]
    #[strum(serialize = "In Air")]
    Airborne,
}

/// Ordered alert severity, `None < Warning < Alert < Alarm`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AlertLevel {
    #[default]
    None,
    Warning,
    Alert,
    Alarm,
}

/// Pairing class of two aircraft, derived from both ground statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, ToSchema)]
pub enum Category {
    #[serde(rename = "Ground-Ground")]
    #[strum(serialize = "Ground-Ground")]
    GroundGround,
    #[serde(rename = "Air-Air")]
    #[strum(serialize = "Air-Air")]
    AirAir,
    #[serde(rename = "Air-Ground")]
    #[strum(serialize = "Air-Ground")]
    AirGround,
}

impl Category {
    pub fn of(a: Status, b: Status) -> Self {
        match (a, b) {
            (Status::Ground, Status::Ground) => Category::GroundGround,
            (Status::Airborne, Status::Airborne) => Category::AirAir,
            _ => Category::AirGround,
        }
    }
}

/// One entry of an aircraft's conflict list, describing the other party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConflictRecord {
    pub icao24: String,
    pub callsign: String,
    /// 3D separation, rounded to whole meters
    pub distance_m: u32,
    pub alert: AlertLevel,
    pub category: Category,
}

/// State report of one tracked aircraft, plus the results of the last
/// assessment pass over the snapshot it belongs to.
///
/// Numeric kinematics are optional. Altitude, speed and vertical rate
/// read as 0 when absent; records without latitude or longitude take no
/// part in conflict checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AircraftState {
    /// Transponder address, the identity used for pair deduplication
    pub icao24: String,
    #[serde(default = "default_callsign")]
    pub callsign: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact: Option<DateTime<Utc>>,

    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub altitude_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_from_airport_m: Option<f64>,

    #[serde(default)]
    pub velocity_mps: Option<f64>,
    /// Display only
    #[serde(default)]
    pub heading_deg: Option<f64>,
    #[serde(default)]
    pub vertical_rate_mps: Option<f64>,

    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub alert_level: AlertLevel,
    #[serde(default)]
    pub conflicts: Vec<ConflictRecord>,
}

fn default_callsign() -> String {
    "N/A".to_string()
}

impl AircraftState {
    pub fn new(icao24: impl Into<String>, callsign: impl Into<String>) -> Self {
        Self {
            icao24: icao24.into(),
            callsign: callsign.into(),
            origin_country: None,
            last_contact: None,
            latitude: None,
            longitude: None,
            altitude_m: None,
            distance_from_airport_m: None,
            velocity_mps: None,
            heading_deg: None,
            vertical_rate_mps: None,
            status: Status::default(),
            alert_level: AlertLevel::None,
            conflicts: Vec::new(),
        }
    }

    pub fn with_position(mut self, latitude: f64, longitude: f64, altitude_m: Option<f64>) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.altitude_m = altitude_m;
        self
    }

    pub fn with_kinematics(mut self, velocity_mps: Option<f64>, vertical_rate_mps: Option<f64>) -> Self {
        self.velocity_mps = velocity_mps;
        self.vertical_rate_mps = vertical_rate_mps;
        self
    }

    pub fn altitude_or_zero(&self) -> f64 {
        self.altitude_m.unwrap_or(0.0)
    }

    pub fn velocity_or_zero(&self) -> f64 {
        self.velocity_mps.unwrap_or(0.0)
    }

    pub fn vertical_rate_or_zero(&self) -> f64 {
        self.vertical_rate_mps.unwrap_or(0.0)
    }

    /// Position for distance computation, `None` when latitude or longitude
    /// is unknown.
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon, self.altitude_m)),
            _ => None,
        }
    }

    /// Clears the results of a previous assessment pass.
    pub fn reset(&mut self) {
        self.alert_level = AlertLevel::None;
        self.conflicts.clear();
    }

    /// Raises the overall alert level, never lowering it.
    pub fn raise_alert(&mut self, level: AlertLevel) {
        if level > self.alert_level {
            self.alert_level = level;
        }
    }
}
