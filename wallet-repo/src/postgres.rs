//! PostgreSQL repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use wallet_types::{
    AuthToken, Currency, DomainError, RepoError, User, UserId, Wallet, WalletId, WalletRepository,
};

use crate::types::{DbUser, DbWallet, DbWalletAmount};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository with row-level locking.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

fn map_insert_error(e: sqlx::Error) -> RepoError {
    let msg = e.to_string();
    if msg.contains("duplicate key") {
        RepoError::Conflict("Username or email already exists".into())
    } else {
        RepoError::Database(msg)
    }
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_tables_pg.sql"),
            "0001",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl WalletRepository for PostgresRepo {
    async fn create_user(&self, user: User) -> Result<User, RepoError> {
        sqlx::query(
            r#"INSERT INTO users (id, first_name, last_name, email, username, password_hash, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(
            r#"SELECT id, first_name, last_name, email, username, password_hash, created_at
               FROM users WHERE username = $1"#,
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
               FROM users WHERE username = $1 OR email = $2 LIMIT 1"#,
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
               WHERE user_id = $1 ORDER BY currency"#,
        )
        .bind(user_id.as_uuid())
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

        let currency_str = currency.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let row: Option<DbWalletAmount> = sqlx::query_as(
            r#"SELECT id, amount FROM wallets WHERE user_id = $1 AND currency = $2 FOR UPDATE"#,
        )
        .bind(user_id.as_uuid())
        .bind(&currency_str)
        .fetch_optional(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let wallet = match row {
            Some(existing) => {
                let new_amount = existing.amount + amount;

                sqlx::query(r#"UPDATE wallets SET amount = $1 WHERE id = $2"#)
                    .bind(new_amount)
                    .bind(existing.id)
                    .execute(&mut *db_tx)
                    .await
                    .map_err(|e| RepoError::Database(e.to_string()))?;

                Wallet::from_parts(
                    WalletId::from_uuid(existing.id),
                    user_id,
                    currency,
                    new_amount,
                )
            }
            None => {
                let wallet = Wallet::new(user_id, currency, amount).map_err(RepoError::Domain)?;

                sqlx::query(
                    r#"INSERT INTO wallets (id, user_id, currency, amount) VALUES ($1, $2, $3, $4)"#,
                )
                .bind(wallet.id.as_uuid())
                .bind(user_id.as_uuid())
                .bind(&currency_str)
                .bind(wallet.amount)
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

        let currency_str = currency.to_string();

        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let row: Option<DbWalletAmount> = sqlx::query_as(
            r#"SELECT id, amount FROM wallets WHERE user_id = $1 AND currency = $2 FOR UPDATE"#,
        )
        .bind(user_id.as_uuid())
        .bind(&currency_str)
        .fetch_optional(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        // A missing row is an empty balance, not a lookup failure.
        let (wallet_id, available) = match row {
            Some(existing) => (existing.id, existing.amount),
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

        if new_amount.is_zero() {
            // Fully drained wallets are removed rather than kept at zero.
            sqlx::query(r#"DELETE FROM wallets WHERE id = $1"#)
                .bind(wallet_id)
                .execute(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        } else {
            sqlx::query(r#"UPDATE wallets SET amount = $1 WHERE id = $2"#)
                .bind(new_amount)
                .bind(wallet_id)
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
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(token.id)
        .bind(token.user_id.as_uuid())
        .bind(&token.token_hash)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_user_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(
            r#"SELECT u.id, u.first_name, u.last_name, u.email, u.username, u.password_hash, u.created_at
               FROM users u
               JOIN auth_tokens t ON t.user_id = u.id
               WHERE t.token_hash = $1 AND t.expires_at > NOW()"#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbUser::into_domain).transpose()
    }
}
