//! Upstream NBP rate-table source.

use std::collections::HashMap;

use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use rust_decimal::Decimal;
use serde::Deserialize;

use wallet_types::{Currency, RateError, RateTable};

/// Table C of the NBP public feed: buy/sell prices for the supported set.
pub const NBP_API_URL: &str = "https://api.nbp.pl/api/exchangerates/tables/c";

/// Port trait for the upstream rate feed.
///
/// One outbound call per `fetch`, no internal retries - retry and fallback
/// policy belongs to [`crate::RateCacheManager`].
#[async_trait::async_trait]
pub trait RateSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<RateTable, RateError>;
}

// The feed returns an array of table objects; the first element is
// authoritative and an empty array is a malformed response, not an
// index error.
#[derive(Debug, Deserialize)]
struct NbpTable {
    #[serde(rename = "effectiveDate")]
    effective_date: String,
    rates: Vec<NbpQuote>,
}

#[derive(Debug, Deserialize)]
struct NbpQuote {
    code: String,
    /// Sell-side price: what a customer pays in PLN for 1 unit.
    ask: Decimal,
}

/// HTTP client for the NBP table-C endpoint.
pub struct NbpRateSource {
    http: reqwest::Client,
    url: String,
}

impl NbpRateSource {
    /// Creates a source against the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for NbpRateSource {
    fn default() -> Self {
        Self::new(NBP_API_URL)
    }
}

#[async_trait::async_trait]
impl RateSource for NbpRateSource {
    async fn fetch(&self) -> Result<RateTable, RateError> {
        let response = self
            .http
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| RateError::UpstreamUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RateError::UpstreamUnreachable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let tables: Vec<NbpTable> = response
            .json()
            .await
            .map_err(|e| RateError::UpstreamMalformed(e.to_string()))?;

        let table = tables
            .first()
            .ok_or_else(|| RateError::UpstreamMalformed("empty rate table array".into()))?;

        let effective_date = NaiveDate::parse_from_str(&table.effective_date, "%Y-%m-%d")
            .map_err(|e| {
                RateError::UpstreamMalformed(format!(
                    "bad effectiveDate {:?}: {}",
                    table.effective_date, e
                ))
            })?;

        let mut rates = HashMap::new();
        for quote in &table.rates {
            match quote.code.parse::<Currency>() {
                Ok(currency) => {
                    rates.insert(currency, quote.ask);
                }
                Err(_) => {
                    // Feed quoting a currency outside the supported set is
                    // not an error; the wallet just cannot hold it.
                    tracing::debug!(code = %quote.code, "skipping unsupported currency quote");
                }
            }
        }

        Ok(RateTable::new(rates, effective_date))
    }
}
