//! Data Transfer Objects (DTOs) for requests and responses.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Currency;

// ─────────────────────────────────────────────────────────────────────────────
// Auth DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Jan")]
    pub first_name: String,
    #[schema(example = "Kowalski")]
    pub last_name: String,
    #[schema(example = "jan.kowalski@example.com")]
    pub email: String,
    #[schema(example = "jank")]
    pub username: String,
    pub password: String,
}

/// Response after a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User successfully registered")]
    pub message: String,
    pub email: String,
    pub username: String,
}

/// Request to log in with username and password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jank")]
    pub username: String,
    pub password: String,
}

/// Response carrying a freshly issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// The raw bearer token (shown only once)
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

/// Profile of the authenticated user, with the total balance in PLN.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    #[serde(rename = "balance_in_PLN")]
    #[schema(value_type = f64, example = 527.77)]
    pub balance_in_pln: Decimal,
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// The current exchange-rate table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatesResponse {
    #[schema(example = "Available exchange rate list")]
    pub message: String,
    /// PLN per 1 unit of each foreign currency
    #[schema(value_type = HashMap<String, f64>)]
    pub exchange_rates: HashMap<Currency, Decimal>,
    /// Day the upstream published these rates
    pub effective_date: NaiveDate,
}

/// The currencies currently quoted by the rate source.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrenciesResponse {
    pub available_currencies: Vec<Currency>,
    pub effective_date: NaiveDate,
}

// ─────────────────────────────────────────────────────────────────────────────
// Report DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// One currency's valuation inside a full balance report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceLine {
    pub currency: Currency,
    /// Balance converted to PLN, rounded to 2 decimal places
    #[schema(value_type = f64, example = 430.00)]
    pub value_pln: Decimal,
}

/// Full per-currency balance report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BalanceReport {
    pub wallet_report: Vec<BalanceLine>,
    /// Exact sum over all rated currencies, rounded once at the end
    #[schema(value_type = f64, example = 527.77)]
    pub total_pln: Decimal,
    /// Day the rates used for this report were published
    pub effective_date: NaiveDate,
}

/// Report returned when the user holds no foreign currency at all.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmptyWalletResponse {
    #[schema(example = "The user has no funds in any foreign currency.")]
    pub message: String,
    #[schema(value_type = f64, example = 0.00)]
    pub total_in_pln: Decimal,
}

/// The mutated currency's state after an add/subtract operation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatedBalanceLine {
    pub currency: Currency,
    /// Remaining balance in the foreign currency
    #[schema(value_type = f64, example = 100.0)]
    pub amount: Decimal,
    /// PLN valuation; `null` when the rate table does not quote the currency
    #[schema(value_type = Option<f64>, example = 430.00)]
    pub value_pln: Option<Decimal>,
}

/// Report returned after a wallet mutation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletUpdateResponse {
    #[schema(example = "Successfully added 100 EUR.")]
    pub message: String,
    pub wallet_report: Vec<UpdatedBalanceLine>,
    /// Total balance across ALL the user's currencies, in PLN
    #[schema(value_type = f64, example = 527.77)]
    pub total_in_pln: Decimal,
    pub effective_date: NaiveDate,
}
