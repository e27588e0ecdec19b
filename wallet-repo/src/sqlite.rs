//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;
use uuid::Uuid;

use wallet_types::{
    AuthToken, Currency, DomainError, RepoError, User, UserId, Wallet, WalletId, WalletRepository,
};

use crate::types::{DbUser, DbWallet, DbWalletAmount, parse_amount};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn map_insert_error(e: sqlx::Error) -> RepoError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") {
        RepoError::Conflict("Username or email already exists".into())
    } else {
        RepoError::Database(msg)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl WalletRepository for SqliteRepo {
    async fn create_user(&self, user: User) -> Result<User, RepoError> {
        sqlx::query(
            r#"INSERT INTO users (id, first_name, last_name, email, username, password_hash, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(
            r#"SELECT id, first_name, last_name, email, username, password_hash, created_at
               FROM users WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn find_conflicting_user(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(
            r#"SELECT id, first_name, last_name, email, username, password_hash, created_at
               FROM users WHERE username = ? OR email = ? LIMIT 1"#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn list_wallets(&self, user_id: UserId) -> Result<Vec<Wallet>, RepoError> {
        let rows: Vec<DbWallet> = sqlx::query_as(
            r#"SELECT id, user_id, currency, amount FROM wallets
               WHERE user_id = ? ORDER BY currency"#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbWallet::into_domain).collect()
    }

    async fn credit_wallet(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
    ) -> Result<Wallet, RepoError> {
        if amount.is_sign_negative() {
            return Err(RepoError::Domain(DomainError::NegativeAmount));
        }

        let user_id_str = user_id.to_string();
        let currency_str = currency.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let row: Option<DbWalletAmount> = sqlx::query_as(
            r#"SELECT id, amount FROM wallets WHERE user_id = ? AND currency = ?"#,
        )
        .bind(&user_id_str)
        .bind(&currency_str)
        .fetch_optional(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let wallet = match row {
            Some(existing) => {
                let new_amount = parse_amount(&existing.amount)? + amount;

                sqlx::query(r#"UPDATE wallets SET amount = ? WHERE id = ?"#)
                    .bind(new_amount.to_string())
                    .bind(&existing.id)
                    .execute(&mut *db_tx)
                    .await
                    .map_err(|e| RepoError::Database(e.to_string()))?;

                let id =
                    Uuid::parse_str(&existing.id).map_err(|e| RepoError::Database(e.to_string()))?;
                Wallet::from_parts(WalletId::from_uuid(id), user_id, currency, new_amount)
            }
            None => {
                let wallet = Wallet::new(user_id, currency, amount).map_err(RepoError::Domain)?;

                sqlx::query(
                    r#"INSERT INTO wallets (id, user_id, currency, amount) VALUES (?, ?, ?, ?)"#,
                )
                .bind(wallet.id.to_string())
                .bind(&user_id_str)
                .bind(&currency_str)
                .bind(wallet.amount.to_string())
                .execute(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

                wallet
            }
        };

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(wallet)
    }

    async fn debit_wallet(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
    ) -> Result<Wallet, RepoError> {
        if amount.is_sign_negative() {
            return Err(RepoError::Domain(DomainError::NegativeAmount));
        }

        let user_id_str = user_id.to_string();
        let currency_str = currency.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let row: Option<DbWalletAmount> = sqlx::query_as(
            r#"SELECT id, amount FROM wallets WHERE user_id = ? AND currency = ?"#,
        )
        .bind(&user_id_str)
        .bind(&currency_str)
        .fetch_optional(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        // A missing row is an empty balance, not a lookup failure.
        let (wallet_id, available) = match row {
            Some(existing) => {
                let id =
                    Uuid::parse_str(&existing.id).map_err(|e| RepoError::Database(e.to_string()))?;
                (id, parse_amount(&existing.amount)?)
            }
            None => (Uuid::nil(), Decimal::ZERO),
        };

        if available < amount {
            return Err(RepoError::Domain(DomainError::InsufficientFunds {
                currency,
                available,
                requested: amount,
            }));
        }

        let new_amount = available - amount;
        let wallet_id_str = wallet_id.to_string();

        if new_amount.is_zero() {
            // Fully drained wallets are removed rather than kept at zero.
            sqlx::query(r#"DELETE FROM wallets WHERE id = ?"#)
                .bind(&wallet_id_str)
                .execute(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        } else {
            sqlx::query(r#"UPDATE wallets SET amount = ? WHERE id = ?"#)
                .bind(new_amount.to_string())
                .bind(&wallet_id_str)
                .execute(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        }

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(Wallet::from_parts(
            WalletId::from_uuid(wallet_id),
            user_id,
            currency,
            new_amount,
        ))
    }

    async fn store_auth_token(&self, token: AuthToken) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO auth_tokens (id, user_id, token_hash, created_at, expires_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(token.id.to_string())
        .bind(token.user_id.to_string())
        .bind(&token.token_hash)
        .bind(token.created_at.to_rfc3339())
        .bind(token.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_user_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, RepoError> {
        // RFC 3339 timestamps in UTC compare correctly as strings.
        let now = chrono::Utc::now().to_rfc3339();

        let row: Option<DbUser> = sqlx::query_as(
            r#"SELECT u.id, u.first_name, u.last_name, u.email, u.username, u.password_hash, u.created_at
               FROM users u
               JOIN auth_tokens t ON t.user_id = u.id
               WHERE t.token_hash = ? AND t.expires_at > ?"#,
        )
        .bind(token_hash)
        .bind(&now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbUser::into_domain).transpose()
    }
}
