mod detector;
mod thresholds;

pub use detector::{assess, detect_conflicts, reset};
pub use thresholds::{DistanceBands, ThresholdError, ThresholdTable};
