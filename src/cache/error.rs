use thiserror::Error;

use crate::source::FetchError;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("refresh for {airport} failed and no earlier snapshot is available: {source}")]
    Fetch { airport: String, source: FetchError },
}
