//! Port traits implemented by the adapter crates.

pub mod rates;
pub mod repository;

pub use rates::{RateError, RateProvider};
pub use repository::WalletRepository;
