//! Supported foreign currencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::DomainError;

/// Foreign currencies the wallet can hold.
///
/// The set is fixed to the currencies quoted with an `ask` price on the
/// NBP table-C feed. Balances are always reported converted to PLN, which
/// is the home currency and deliberately NOT part of this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    AUD,
    CAD,
    EUR,
    HUF,
    CHF,
    GBP,
    JPY,
    CZK,
    DKK,
    NOK,
    SEK,
    XDR,
}

impl Currency {
    /// All supported currencies, in NBP table order.
    pub const ALL: [Currency; 13] = [
        Currency::USD,
        Currency::AUD,
        Currency::CAD,
        Currency::EUR,
        Currency::HUF,
        Currency::CHF,
        Currency::GBP,
        Currency::JPY,
        Currency::CZK,
        Currency::DKK,
        Currency::NOK,
        Currency::SEK,
        Currency::XDR,
    ];

    /// Returns the ISO-style code for this currency.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
            Currency::EUR => "EUR",
            Currency::HUF => "HUF",
            Currency::CHF => "CHF",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CZK => "CZK",
            Currency::DKK => "DKK",
            Currency::NOK => "NOK",
            Currency::SEK => "SEK",
            Currency::XDR => "XDR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "AUD" => Ok(Currency::AUD),
            "CAD" => Ok(Currency::CAD),
            "EUR" => Ok(Currency::EUR),
            "HUF" => Ok(Currency::HUF),
            "CHF" => Ok(Currency::CHF),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CZK" => Ok(Currency::CZK),
            "DKK" => Ok(Currency::DKK),
            "NOK" => Ok(Currency::NOK),
            "SEK" => Ok(Currency::SEK),
            "XDR" => Ok(Currency::XDR),
            _ => Err(DomainError::UnsupportedCurrency(s.to_string())),
        }
    }
}
