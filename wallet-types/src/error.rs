//! Error types for the wallet service.

use rust_decimal::Decimal;

use crate::domain::Currency;
use crate::ports::rates::RateError;

/// Domain-level errors (business logic violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Amount must be greater than 0.00")]
    NonPositiveAmount,

    #[error("Currency {0} is not supported")]
    UnsupportedCurrency(String),

    #[error("Insufficient funds in {currency}.")]
    InsufficientFunds {
        currency: Currency,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes. Wallet-level failures are 4xx
/// outcomes; only an exhausted rate cache surfaces as a 5xx.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient funds in {currency}.")]
    InsufficientFunds {
        currency: Currency,
        available: Decimal,
        requested: Decimal,
    },

    #[error("{0}")]
    RatesUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(DomainError::InsufficientFunds {
                currency,
                available,
                requested,
            }) => AppError::InsufficientFunds {
                currency,
                available,
                requested,
            },
            RepoError::Domain(DomainError::UnsupportedCurrency(code)) => {
                AppError::BadRequest(format!("Currency {} is not supported", code))
            }
            RepoError::Domain(DomainError::ValidationError(msg)) => AppError::BadRequest(msg),
            RepoError::Domain(e) => AppError::BadRequest(e.to_string()),
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::Transaction(e) => AppError::Internal(e),
            RepoError::Conflict(e) => AppError::BadRequest(e),
        }
    }
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        match err {
            // The manager resolves upstream failures to stale data whenever
            // any partition survives; only a fully exhausted cache escapes.
            RateError::NoCachedData { .. } => AppError::RatesUnavailable(err.to_string()),
            RateError::UpstreamUnreachable(_) | RateError::UpstreamMalformed(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::from(RepoError::Domain(err))
    }
}
