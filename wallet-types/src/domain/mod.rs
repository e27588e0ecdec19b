//! Domain models for the wallet service.

pub mod currency;
pub mod rates;
pub mod token;
pub mod user;
pub mod wallet;

pub use currency::Currency;
pub use rates::RateTable;
pub use token::AuthToken;
pub use user::{User, UserId};
pub use wallet::{Wallet, WalletId};
