//! Rate acquisition orchestration.
//!
//! The manager composes the upstream source and the day-partitioned cache
//! into a single `RateProvider`. Refresh and pruning are pull-based: they
//! happen lazily on request traffic, so the system self-heals on the first
//! request after a TTL boundary instead of running a timer.

use std::time::Duration;

use chrono::Utc;

use wallet_types::ports::rates::{RateError, RateProvider};
use wallet_types::RateTable;

use crate::cache::RateCache;
use crate::source::RateSource;
use crate::store::RateStore;

/// Default bound on a single upstream fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Cache-first rate provider with stale fallback.
///
/// Per request, one of three outcomes:
/// - FRESH: today's partition exists and is served without a network call;
/// - STALE_FALLBACK: the upstream is down, the most recent surviving
///   partition is served with its own stored effective date;
/// - UNAVAILABLE: the upstream is down and nothing survives in the cache.
///
/// No state beyond the cache partitions persists across requests, so
/// concurrent misses may fetch in parallel; all of them compute the same
/// table and last-write-wins on the partition key is safe.
pub struct RateCacheManager<S, F> {
    cache: RateCache<S>,
    source: F,
    fetch_timeout: Duration,
    support_contact: String,
}

impl<S: RateStore, F: RateSource> RateCacheManager<S, F> {
    pub fn new(store: S, source: F, support_contact: impl Into<String>) -> Self {
        Self {
            cache: RateCache::new(store),
            source,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            support_contact: support_contact.into(),
        }
    }

    /// Overrides the upstream fetch bound.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Serves the most recent surviving partition, if any.
    ///
    /// Partitions are enumerated at read time, so a concurrently pruned day
    /// simply is not chosen. Store errors here count as "no cached data".
    async fn fallback(&self) -> Option<RateTable> {
        let days = match self.cache.list_days().await {
            Ok(days) => days,
            Err(e) => {
                tracing::warn!(error = %e, "rate cache enumeration failed during fallback");
                return None;
            }
        };

        // Greatest day key; fixed-width keys sort with calendar order.
        let latest = days.into_iter().max()?;

        match self.cache.get(latest).await {
            Ok(Some(table)) => {
                tracing::warn!(
                    partition = %latest,
                    effective_date = %table.effective_date(),
                    "serving stale exchange rates"
                );
                Some(table)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, partition = %latest, "stale partition read failed");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: RateStore, F: RateSource> RateProvider for RateCacheManager<S, F> {
    async fn get_rates(&self) -> Result<RateTable, RateError> {
        let today = Utc::now().date_naive();

        // Fast path: today's partition, no network call. A store read error
        // degrades to an upstream fetch instead of failing the request.
        match self.cache.get(today).await {
            Ok(Some(table)) => {
                tracing::debug!(%today, "rate cache hit");
                return Ok(table);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "rate cache read failed; fetching upstream")
            }
        }

        let fetched = match tokio::time::timeout(self.fetch_timeout, self.source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(RateError::UpstreamUnreachable(format!(
                "fetch timed out after {:?}",
                self.fetch_timeout
            ))),
        };

        match fetched {
            Ok(table) => {
                match self.cache.put(today, &table).await {
                    Ok(()) => {
                        // Prune only after today's write landed; otherwise a
                        // failed write followed by pruning could destroy the
                        // only surviving fallback data.
                        if let Err(e) = self.cache.prune(today).await {
                            tracing::warn!(error = %e, "rate partition pruning failed");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to cache fetched rate table");
                    }
                }
                Ok(table)
            }
            Err(err) => {
                tracing::warn!(error = %err, "upstream rate fetch failed; trying cached fallback");
                match self.fallback().await {
                    Some(table) => Ok(table),
                    None => Err(RateError::NoCachedData {
                        contact: self.support_contact.clone(),
                    }),
                }
            }
        }
    }
}
