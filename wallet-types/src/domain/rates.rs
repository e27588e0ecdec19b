//! Daily exchange-rate table.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::currency::Currency;

/// A daily table of PLN exchange rates.
///
/// Each rate is the number of PLN paid for 1 unit of the foreign currency
/// (the ask / sell-side price, i.e. the customer-facing conversion rate).
/// The effective date is the day the upstream published the table, which
/// may lag the day the table was fetched. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<Currency, Decimal>,
    effective_date: NaiveDate,
}

impl RateTable {
    pub fn new(rates: HashMap<Currency, Decimal>, effective_date: NaiveDate) -> Self {
        Self {
            rates,
            effective_date,
        }
    }

    /// Returns the PLN rate for a currency, if the table quotes it.
    pub fn rate(&self, currency: Currency) -> Option<Decimal> {
        self.rates.get(&currency).copied()
    }

    /// Returns the full rate map.
    pub fn rates(&self) -> &HashMap<Currency, Decimal> {
        &self.rates
    }

    /// Returns the upstream publication date of this table.
    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// Returns the quoted currencies in code order.
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self.rates.keys().copied().collect();
        currencies.sort_by_key(|c| c.code());
        currencies
    }
}
