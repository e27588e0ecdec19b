//! Shared database types with feature-gated fields for SQLite and PostgreSQL.

use sqlx::FromRow;

use wallet_types::{Currency, RepoError, User, UserId, Wallet, WalletId};

// ─────────────────────────────────────────────────────────────────────────────
// Feature-gated imports
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(not(feature = "sqlite"))]
use chrono::{DateTime, Utc};
#[cfg(not(feature = "sqlite"))]
use rust_decimal::Decimal;
#[cfg(not(feature = "sqlite"))]
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// User row from database.
#[derive(FromRow)]
pub struct DbUser {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,
}

/// Wallet row from database.
#[derive(FromRow)]
pub struct DbWallet {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    #[cfg(not(feature = "sqlite"))]
    pub user_id: Uuid,
    #[cfg(feature = "sqlite")]
    pub user_id: String,

    pub currency: String,

    #[cfg(not(feature = "sqlite"))]
    pub amount: Decimal,
    #[cfg(feature = "sqlite")]
    pub amount: String,
}

/// Amount-only row for balance checks inside transactions.
#[derive(FromRow)]
pub struct DbWalletAmount {
    #[cfg(not(feature = "sqlite"))]
    pub id: Uuid,
    #[cfg(feature = "sqlite")]
    pub id: String,

    #[cfg(not(feature = "sqlite"))]
    pub amount: Decimal,
    #[cfg(feature = "sqlite")]
    pub amount: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_currency(s: &str) -> Result<Currency, RepoError> {
    s.parse()
        .map_err(|_| RepoError::Database(format!("Unknown currency: {}", s)))
}

#[cfg(feature = "sqlite")]
pub fn parse_amount(s: &str) -> Result<rust_decimal::Decimal, RepoError> {
    s.parse()
        .map_err(|_| RepoError::Database(format!("Unreadable amount: {}", s)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain conversion (feature-gated implementations)
// ─────────────────────────────────────────────────────────────────────────────

impl DbUser {
    /// Convert database row to domain User.
    pub fn into_domain(self) -> Result<User, RepoError> {
        #[cfg(not(feature = "sqlite"))]
        let (id, created_at) = (UserId::from_uuid(self.id), self.created_at);

        #[cfg(feature = "sqlite")]
        let (id, created_at) = {
            let uuid =
                uuid::Uuid::parse_str(&self.id).map_err(|e| RepoError::Database(e.to_string()))?;
            let dt = chrono::DateTime::parse_from_rfc3339(&self.created_at)
                .map_err(|e| RepoError::Database(e.to_string()))?
                .with_timezone(&chrono::Utc);
            (UserId::from_uuid(uuid), dt)
        };

        Ok(User::from_parts(
            id,
            self.first_name,
            self.last_name,
            self.email,
            self.username,
            self.password_hash,
            created_at,
        ))
    }
}

impl DbWallet {
    /// Convert database row to domain Wallet.
    pub fn into_domain(self) -> Result<Wallet, RepoError> {
        let currency = parse_currency(&self.currency)?;

        #[cfg(not(feature = "sqlite"))]
        let (id, user_id, amount) = (
            WalletId::from_uuid(self.id),
            UserId::from_uuid(self.user_id),
            self.amount,
        );

        #[cfg(feature = "sqlite")]
        let (id, user_id, amount) = {
            let id =
                uuid::Uuid::parse_str(&self.id).map_err(|e| RepoError::Database(e.to_string()))?;
            let user_id = uuid::Uuid::parse_str(&self.user_id)
                .map_err(|e| RepoError::Database(e.to_string()))?;
            (
                WalletId::from_uuid(id),
                UserId::from_uuid(user_id),
                parse_amount(&self.amount)?,
            )
        };

        Ok(Wallet::from_parts(id, user_id, currency, amount))
    }
}
