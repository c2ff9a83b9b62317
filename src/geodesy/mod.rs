mod distance;
mod types;

pub use distance::{distance_3d, ground_distance, within_radius, AIRPORT_RADIUS_M};
pub use types::GeoPoint;
