use super::types::GeoPoint;

// WGS-84 constants
const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Horizontal cutoff (~30 mi) used to admit reports around an airport.
pub const AIRPORT_RADIUS_M: f64 = 48_280.0;

fn position_ecef_m(p: &GeoPoint) -> [f64; 3] {
    let alt = p.altitude_m.unwrap_or(0.0);
    let lat = p.lat_rad();
    let lon = p.lon_rad();
    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let sin_lon = lon.sin();
    let cos_lon = lon.cos();
    let n = WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let x = (n + alt) * cos_lat * cos_lon;
    let y = (n + alt) * cos_lat * sin_lon;
    let z = (n * (1.0 - WGS84_E2) + alt) * sin_lat;
    [x, y, z]
}

/// Straight-line separation in meters between two points, including the
/// vertical component. Missing altitude counts as 0.
///
/// Inputs must be finite.
pub fn distance_3d(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let [x1, y1, z1] = position_ecef_m(p1);
    let [x2, y2, z2] = position_ecef_m(p2);
    let (dx, dy, dz) = (x1 - x2, y1 - y2, z1 - z2);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Great-circle (haversine) distance in meters on a spherical Earth.
/// Altitude is ignored.
pub fn ground_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let phi1 = p1.lat_rad();
    let phi2 = p2.lat_rad();
    let dphi = phi2 - phi1;
    let dlambda = (p2.longitude_deg - p1.longitude_deg).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Returns the horizontal distance to `center` if it is within `radius_m`.
pub fn within_radius(center: &GeoPoint, p: &GeoPoint, radius_m: f64) -> Option<f64> {
    let d = ground_distance(center, p);
    (d <= radius_m).then_some(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEA: GeoPoint = GeoPoint {
        latitude_deg: 47.450237,
        longitude_deg: -122.3088,
        altitude_m: Some(130.0),
    };

    #[test]
    fn distance_3d_is_zero_for_same_point() {
        assert_eq!(distance_3d(&SEA, &SEA), 0.0);
        let p = GeoPoint::new(-33.9, 151.2, None);
        assert_eq!(distance_3d(&p, &p), 0.0);
    }

    #[test]
    fn distance_3d_is_symmetric() {
        let a = GeoPoint::new(47.45, -122.30, Some(300.0));
        let b = GeoPoint::new(47.46, -122.31, Some(1200.0));
        assert_eq!(distance_3d(&a, &b), distance_3d(&b, &a));
    }

    #[test]
    fn distance_3d_measures_vertical_separation() {
        let low = GeoPoint::new(47.45, -122.30, Some(100.0));
        let high = GeoPoint::new(47.45, -122.30, Some(250.0));
        assert!((distance_3d(&low, &high) - 150.0).abs() < 1e-6);
    }

    #[test]
    fn distance_3d_treats_missing_altitude_as_zero() {
        let a = GeoPoint::new(10.0, 20.0, None);
        let b = GeoPoint::new(10.0, 20.0, Some(0.0));
        assert_eq!(distance_3d(&a, &b), 0.0);
    }

    #[test]
    fn ground_distance_ignores_altitude() {
        let a = GeoPoint::new(47.45, -122.30, Some(0.0));
        let b = GeoPoint::new(47.46, -122.31, Some(9000.0));
        let b_surface = GeoPoint::surface(47.46, -122.31);
        assert_eq!(ground_distance(&a, &b), ground_distance(&a, &b_surface));
        assert_eq!(ground_distance(&a, &b), ground_distance(&b, &a));
        assert_eq!(ground_distance(&a, &a), 0.0);
    }

    #[test]
    fn ground_distance_one_degree_of_latitude() {
        let a = GeoPoint::surface(0.0, 0.0);
        let b = GeoPoint::surface(1.0, 0.0);
        let expected = MEAN_EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert!((ground_distance(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn within_radius_cutoff() {
        let center = GeoPoint::surface(0.0, 0.0);
        // ~44.5 km
        let inside = GeoPoint::surface(0.4, 0.0);
        // ~55.6 km
        let outside = GeoPoint::surface(0.5, 0.0);
        assert!(within_radius(&center, &inside, AIRPORT_RADIUS_M).is_some());
        assert!(within_radius(&center, &outside, AIRPORT_RADIUS_M).is_none());
    }
}
