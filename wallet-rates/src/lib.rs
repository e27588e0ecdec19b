//! # Wallet Rates
//!
//! Exchange-rate acquisition and caching for the PLN wallet service.
//!
//! ## Architecture
//!
//! - `source/` - one-shot fetch of the daily NBP table-C rate feed
//! - `store/`  - key-value store port with Redis and in-memory adapters
//! - `cache/`  - day-partitioned rate cache over the store
//! - `manager/` - orchestration: fast path, refresh, stale fallback, pruning
//!
//! The manager implements the `RateProvider` port from `wallet-types`, so
//! the service layer never sees this crate's internals.

pub mod cache;
pub mod manager;
pub mod source;
pub mod store;

pub use cache::RateCache;
pub use manager::RateCacheManager;
pub use source::{NBP_API_URL, NbpRateSource, RateSource};
pub use store::{InMemoryRateStore, RateStore, RedisRateStore, StoreError};
