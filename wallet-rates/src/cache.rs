//! Day-partitioned rate cache over a [`RateStore`].

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wallet_types::{Currency, RateTable};

use crate::store::{RateStore, StoreError};

/// Namespace for partition keys in the shared store.
pub const KEY_PREFIX: &str = "exchange_rates:";

/// Partition lifetime: one day from the moment it was written.
pub const PARTITION_TTL: Duration = Duration::from_secs(86_400);

/// Wire format of a cached partition.
///
/// The partition key carries the day the table was FETCHED; the payload
/// carries the day the upstream PUBLISHED it. The two legitimately differ
/// when a fetch happens before the upstream posts the current day's table.
#[derive(Debug, Serialize, Deserialize)]
struct CachedTable {
    rates: HashMap<Currency, Decimal>,
    #[serde(rename = "effectiveDate")]
    effective_date: NaiveDate,
}

/// One-partition-per-day cache of rate tables.
pub struct RateCache<S> {
    store: S,
}

impl<S: RateStore> RateCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(day: NaiveDate) -> String {
        // Fixed-width date keys sort consistently with calendar order.
        format!("{KEY_PREFIX}{}", day.format("%Y-%m-%d"))
    }

    /// Returns the partition for `day` if present and not expired.
    pub async fn get(&self, day: NaiveDate) -> Result<Option<RateTable>, StoreError> {
        let Some(payload) = self.store.get(&Self::key(day)).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<CachedTable>(&payload) {
            Ok(cached) => Ok(Some(RateTable::new(cached.rates, cached.effective_date))),
            Err(e) => {
                // A corrupt partition is treated as a miss; the next
                // successful fetch overwrites it.
                tracing::warn!(%day, error = %e, "discarding unreadable rate partition");
                Ok(None)
            }
        }
    }

    /// Writes (or overwrites) the partition for `day`, resetting its TTL.
    pub async fn put(&self, day: NaiveDate, table: &RateTable) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&CachedTable {
            rates: table.rates().clone(),
            effective_date: table.effective_date(),
        })
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        self.store
            .set_ex(&Self::key(day), &payload, PARTITION_TTL)
            .await
    }

    /// All days with a live partition, in ascending calendar order.
    pub async fn list_days(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let keys = self.store.keys_with_prefix(KEY_PREFIX).await?;
        let mut days: Vec<NaiveDate> = keys
            .iter()
            .filter_map(|key| key.strip_prefix(KEY_PREFIX))
            .filter_map(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .collect();
        days.sort();
        Ok(days)
    }

    /// Removes the partition for `day` immediately.
    pub async fn delete(&self, day: NaiveDate) -> Result<(), StoreError> {
        self.store.delete(&Self::key(day)).await
    }

    /// Deletes every live partition except `keep`.
    pub async fn prune(&self, keep: NaiveDate) -> Result<(), StoreError> {
        for day in self.list_days().await? {
            if day != keep {
                tracing::debug!(%day, "pruning stale rate partition");
                self.delete(day).await?;
            }
        }
        Ok(())
    }
}
