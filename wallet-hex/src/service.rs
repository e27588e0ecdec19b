//! Wallet Application Service
//!
//! Orchestrates domain operations through the repository and rate-provider
//! ports. Contains NO infrastructure logic - pure business orchestration.

use rust_decimal::Decimal;

use wallet_repo::security;
use wallet_types::{
    AppError, AuthToken, BalanceReport, CurrenciesResponse, Currency, LoginRequest, MeResponse,
    RateProvider, RatesResponse, RegisterRequest, RegisterResponse, TokenResponse, User, UserId,
    WalletRepository, WalletUpdateResponse,
};

use crate::report;

/// Default lifetime of a login token.
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Application service for wallet operations.
///
/// Generic over `R: WalletRepository` and `P: RateProvider` - the adapters
/// are injected at compile time. This enables:
/// - Swapping repositories without code changes
/// - Testing with in-memory fakes
/// - Compile-time checks for port implementation
pub struct WalletService<R: WalletRepository, P: RateProvider> {
    repo: R,
    rates: P,
    token_ttl_minutes: i64,
}

impl<R: WalletRepository, P: RateProvider> WalletService<R, P> {
    /// Creates a new wallet service with the given adapters.
    pub fn new(repo: R, rates: P) -> Self {
        Self {
            repo,
            rates,
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
        }
    }

    /// Overrides the login-token lifetime.
    pub fn with_token_ttl(mut self, minutes: i64) -> Self {
        self.token_ttl_minutes = minutes;
        self
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Registration & Login
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers a new user.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AppError> {
        if let Some(existing) = self
            .repo
            .find_conflicting_user(&req.username, &req.email)
            .await?
        {
            if existing.username == req.username {
                return Err(AppError::BadRequest("Username already exists".into()));
            }
            return Err(AppError::BadRequest("Email already exists".into()));
        }

        if req.password.len() < 8 {
            return Err(AppError::BadRequest(
                "Password must be at least 8 characters long".into(),
            ));
        }

        let user = User::new(
            req.first_name,
            req.last_name,
            req.email,
            req.username,
            security::hash_password(&req.password),
        )?;

        let user = self.repo.create_user(user).await?;

        Ok(RegisterResponse {
            message: "User successfully registered".into(),
            email: user.email,
            username: user.username,
        })
    }

    /// Verifies credentials and issues a bearer token.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, AppError> {
        let user = self
            .repo
            .find_user_by_username(&req.username)
            .await?
            .filter(|user| security::verify_password(&req.password, &user.password_hash))
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

        let (raw_token, token_hash) = security::generate_token();
        self.repo
            .store_auth_token(AuthToken::new(user.id, token_hash, self.token_ttl_minutes))
            .await?;

        Ok(TokenResponse {
            access_token: raw_token,
            token_type: "bearer".into(),
        })
    }

    /// Resolves a raw bearer token to its owner.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        self.repo
            .find_user_by_token_hash(&security::hash_token(token))
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token".into()))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Returns the current rate table as an API payload.
    pub async fn exchange_rates(&self) -> Result<RatesResponse, AppError> {
        let table = self.rates.get_rates().await?;

        Ok(RatesResponse {
            message: "Available exchange rate list".into(),
            exchange_rates: table.rates().clone(),
            effective_date: table.effective_date(),
        })
    }

    /// Lists the currencies currently quoted by the rate source.
    pub async fn currencies(&self) -> Result<CurrenciesResponse, AppError> {
        let table = self.rates.get_rates().await?;

        Ok(CurrenciesResponse {
            available_currencies: table.currencies(),
            effective_date: table.effective_date(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────────────

    /// Profile payload for the authenticated user, with the PLN total.
    pub async fn me(&self, user: &User) -> Result<MeResponse, AppError> {
        let wallets = self.repo.list_wallets(user.id).await?;
        let table = self.rates.get_rates().await?;
        let report = report::balance_report(&wallets, &table);

        Ok(MeResponse {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            balance_in_pln: report.total_pln,
        })
    }

    /// Full balance report; `None` when the user holds no foreign currency.
    pub async fn wallet_report(&self, user_id: UserId) -> Result<Option<BalanceReport>, AppError> {
        let wallets = self.repo.list_wallets(user_id).await?;
        if wallets.is_empty() {
            return Ok(None);
        }

        let table = self.rates.get_rates().await?;
        Ok(Some(report::balance_report(&wallets, &table)))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Wallet Mutations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Adds funds in a currency, returning the post-mutation report.
    pub async fn add_funds(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
    ) -> Result<WalletUpdateResponse, AppError> {
        // Wallet-level validation happens before the rate cache is touched.
        Self::require_positive(amount)?;

        let wallet = self.repo.credit_wallet(user_id, currency, amount).await?;

        self.update_report(
            user_id,
            wallet,
            format!("Successfully added {} {}.", amount, currency),
        )
        .await
    }

    /// Subtracts funds in a currency, returning the post-mutation report.
    ///
    /// A debit landing exactly on zero removes the wallet row; the report
    /// then shows a zero amount for the currency.
    pub async fn subtract_funds(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
    ) -> Result<WalletUpdateResponse, AppError> {
        Self::require_positive(amount)?;

        let wallet = self.repo.debit_wallet(user_id, currency, amount).await?;

        self.update_report(
            user_id,
            wallet,
            format!("Successfully subtracted {} {}.", amount, currency),
        )
        .await
    }

    fn require_positive(amount: Decimal) -> Result<(), AppError> {
        if amount <= Decimal::ZERO {
            return Err(wallet_types::DomainError::NonPositiveAmount.into());
        }
        Ok(())
    }

    async fn update_report(
        &self,
        user_id: UserId,
        wallet: wallet_types::Wallet,
        message: String,
    ) -> Result<WalletUpdateResponse, AppError> {
        let table = self.rates.get_rates().await?;
        let all_wallets = self.repo.list_wallets(user_id).await?;

        Ok(report::wallet_update_report(
            &wallet,
            &all_wallets,
            &table,
            message,
        ))
    }
}
