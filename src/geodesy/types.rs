/// Geographic position in degrees, with an optional height above the
/// WGS-84 ellipsoid in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: Option<f64>,
}

impl GeoPoint {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: Option<f64>) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    pub fn surface(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self::new(latitude_deg, longitude_deg, None)
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}
