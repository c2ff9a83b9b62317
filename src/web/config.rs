use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use crate::airport::{default_airports, find_airport, Airport};
use crate::conflict::ThresholdTable;
use crate::geodesy::AIRPORT_RADIUS_M;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub opensky: OpenSkyConfig,
    #[serde(default = "default_airport_code")]
    pub default_airport: String,
    #[serde(default = "default_airports")]
    pub airports: Vec<Airport>,
    #[serde(default)]
    pub thresholds: ThresholdTable,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_airport_code() -> String {
    "SEA".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Maximum age of a cached snapshot
    #[serde(default = "default_refresh_interval", deserialize_with = "deserialize_duration")]
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: default_refresh_interval(),
        }
    }
}

fn default_refresh_interval() -> Duration {
    Duration::from_secs(3600)
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenSkyConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Half width of the query box around the airport, in degrees
    #[serde(default = "default_box_half_span")]
    pub box_half_span_deg: f64,
    #[serde(default = "default_radius")]
    pub radius_m: f64,
}

impl Default for OpenSkyConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            box_half_span_deg: default_box_half_span(),
            radius_m: default_radius(),
        }
    }
}

fn default_base_url() -> String {
    "https://opensky-network.org/api".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_box_half_span() -> f64 {
    0.5
}

fn default_radius() -> f64 {
    AIRPORT_RADIUS_M
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub name: String,
    pub permissions: HashSet<Permission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewTraffic,
    ForceRefresh,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewTraffic => "view_traffic",
            Permission::ForceRefresh => "force_refresh",
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.airports.is_empty() {
            return Err(ConfigError::Invalid("no airports configured".into()));
        }
        if self.find_airport(&self.default_airport).is_none() {
            return Err(ConfigError::Invalid(format!(
                "default airport {} is not in the airport list",
                self.default_airport
            )));
        }
        if let Some(a) = self
            .airports
            .iter()
            .find(|a| !(a.latitude.is_finite() && a.longitude.is_finite()))
        {
            return Err(ConfigError::Invalid(format!("airport {} has invalid coordinates", a.code)));
        }
        if !(self.opensky.radius_m.is_finite() && self.opensky.radius_m > 0.0) {
            return Err(ConfigError::Invalid("opensky.radius_m must be positive".into()));
        }
        if self.refresh.interval.is_zero() {
            return Err(ConfigError::Invalid("refresh.interval must not be zero".into()));
        }
        Ok(())
    }

    pub fn find_api_key(&self, key: &str) -> Option<&ApiKey> {
        self.api_keys.iter().find(|k| k.key == key)
    }

    pub fn find_airport(&self, code: &str) -> Option<&Airport> {
        find_airport(&self.airports, code)
    }
}
