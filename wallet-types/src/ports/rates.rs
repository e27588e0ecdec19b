//! Exchange-rate provider port.
//!
//! This trait is the rate-lookup interface the wallet-report logic consumes.
//! The production implementation is the cache-backed NBP manager; tests
//! inject fixed-table fakes.

use crate::domain::RateTable;

/// Error type for rate acquisition.
///
/// Serving a stale table is NOT an error: callers detect staleness through
/// the returned effective date. Only a completely exhausted cache combined
/// with an unreachable upstream is fatal to a request.
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("Upstream rate service unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Upstream rate response malformed: {0}")]
    UpstreamMalformed(String),

    #[error(
        "Currently, it is not possible to access the Polish National Bank's public API - NBP. \
         Please contact support via email: {contact}"
    )]
    NoCachedData { contact: String },
}

/// Port trait for daily PLN rate tables.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Returns the current rate table, possibly served from cache and
    /// possibly stale (see [`RateTable::effective_date`]).
    async fn get_rates(&self) -> Result<RateTable, RateError>;
}
