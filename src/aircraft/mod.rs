mod classifier;
mod types;

pub use classifier::{classify_all, is_ground, status_of};
pub use types::{AircraftState, AlertLevel, Category, ConflictRecord, Status};
