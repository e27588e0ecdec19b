//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory fakes) implement this trait.

use rust_decimal::Decimal;

use crate::domain::{AuthToken, Currency, User, UserId, Wallet};
use crate::error::RepoError;

/// The main repository port for users, wallets and session tokens.
///
/// All operations that modify balances MUST be atomic.
/// Implementations should use database transactions to ensure consistency.
#[async_trait::async_trait]
pub trait WalletRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Persists a new user.
    async fn create_user(&self, user: User) -> Result<User, RepoError>;

    /// Gets a user by username.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Finds any existing user colliding with the given username or email.
    async fn find_conflicting_user(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Wallet Operations (MUST be atomic)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists all wallets held by a user.
    async fn list_wallets(&self, user_id: UserId) -> Result<Vec<Wallet>, RepoError>;

    /// Adds to the user's balance in a currency, creating the wallet row if
    /// it does not exist yet. Returns the resulting wallet.
    async fn credit_wallet(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
    ) -> Result<Wallet, RepoError>;

    /// Subtracts from the user's balance in a currency.
    ///
    /// Fails with `InsufficientFunds` when the balance (or the whole row)
    /// does not cover the amount. A debit landing exactly on zero removes
    /// the row; the returned wallet then carries a zero amount.
    async fn debit_wallet(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
    ) -> Result<Wallet, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Session Tokens
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stores a hashed login token.
    async fn store_auth_token(&self, token: AuthToken) -> Result<(), RepoError>;

    /// Resolves a token digest to its owner, ignoring expired tokens.
    async fn find_user_by_token_hash(&self, token_hash: &str)
    -> Result<Option<User>, RepoError>;
}
