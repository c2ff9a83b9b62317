mod error;
mod store;

pub use error::CacheError;
pub use store::{CachedSnapshot, SnapshotCache};
