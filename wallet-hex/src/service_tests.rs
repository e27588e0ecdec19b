//! WalletService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use wallet_types::ports::rates::{RateError, RateProvider};
    use wallet_types::{
        AppError, AuthToken, Currency, LoginRequest, RateTable, RegisterRequest, RepoError, User,
        UserId, Wallet, WalletRepository,
    };

    use crate::WalletService;

    /// Simple in-memory repository for testing the service layer.
    pub struct MockRepo {
        users: Mutex<Vec<User>>,
        wallets: Mutex<Vec<Wallet>>,
        tokens: Mutex<Vec<AuthToken>>,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self {
                users: Mutex::new(Vec::new()),
                wallets: Mutex::new(Vec::new()),
                tokens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WalletRepository for MockRepo {
        async fn create_user(&self, user: User) -> Result<User, RepoError> {
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn find_conflicting_user(
            &self,
            username: &str,
            email: &str,
        ) -> Result<Option<User>, RepoError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username || u.email == email)
                .cloned())
        }

        async fn list_wallets(&self, user_id: UserId) -> Result<Vec<Wallet>, RepoError> {
            Ok(self
                .wallets
                .lock()
                .unwrap()
                .iter()
                .filter(|w| w.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn credit_wallet(
            &self,
            user_id: UserId,
            currency: Currency,
            amount: Decimal,
        ) -> Result<Wallet, RepoError> {
            let mut wallets = self.wallets.lock().unwrap();
            if let Some(wallet) = wallets
                .iter_mut()
                .find(|w| w.user_id == user_id && w.currency == currency)
            {
                wallet.credit(amount).map_err(RepoError::Domain)?;
                return Ok(wallet.clone());
            }
            let wallet = Wallet::new(user_id, currency, amount).map_err(RepoError::Domain)?;
            wallets.push(wallet.clone());
            Ok(wallet)
        }

        async fn debit_wallet(
            &self,
            user_id: UserId,
            currency: Currency,
            amount: Decimal,
        ) -> Result<Wallet, RepoError> {
            let mut wallets = self.wallets.lock().unwrap();
            let Some(position) = wallets
                .iter()
                .position(|w| w.user_id == user_id && w.currency == currency)
            else {
                return Err(RepoError::Domain(
                    wallet_types::DomainError::InsufficientFunds {
                        currency,
                        available: Decimal::ZERO,
                        requested: amount,
                    },
                ));
            };
            let wallet = &mut wallets[position];
            wallet.debit(amount).map_err(RepoError::Domain)?;
            let result = wallet.clone();
            if result.is_empty() {
                wallets.remove(position);
            }
            Ok(result)
        }

        async fn store_auth_token(&self, token: AuthToken) -> Result<(), RepoError> {
            self.tokens.lock().unwrap().push(token);
            Ok(())
        }

        async fn find_user_by_token_hash(
            &self,
            token_hash: &str,
        ) -> Result<Option<User>, RepoError> {
            let tokens = self.tokens.lock().unwrap();
            let Some(token) = tokens
                .iter()
                .find(|t| t.token_hash == token_hash && !t.is_expired(chrono::Utc::now()))
            else {
                return Ok(None);
            };
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == token.user_id)
                .cloned())
        }
    }

    /// Rate provider serving a fixed table.
    pub struct FixedRates(pub RateTable);

    #[async_trait]
    impl RateProvider for FixedRates {
        async fn get_rates(&self) -> Result<RateTable, RateError> {
            Ok(self.0.clone())
        }
    }

    /// Rate provider with an exhausted cache and a dead upstream.
    pub struct DeadRates;

    #[async_trait]
    impl RateProvider for DeadRates {
        async fn get_rates(&self) -> Result<RateTable, RateError> {
            Err(RateError::NoCachedData {
                contact: "support@plnwallet.example".into(),
            })
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn rates() -> RateTable {
        let mut map = HashMap::new();
        map.insert(Currency::EUR, dec("4.30"));
        map.insert(Currency::USD, dec("3.95"));
        RateTable::new(map, NaiveDate::from_ymd_opt(2025, 2, 24).unwrap())
    }

    fn service() -> WalletService<MockRepo, FixedRates> {
        WalletService::new(MockRepo::new(), FixedRates(rates()))
    }

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Jan".into(),
            last_name: "Kowalski".into(),
            email: email.into(),
            username: username.into(),
            password: "secret123".into(),
        }
    }

    async fn registered_user(service: &WalletService<MockRepo, FixedRates>) -> User {
        service
            .register(register_request("jank", "jan@example.com"))
            .await
            .unwrap();
        service
            .repo()
            .find_user_by_username("jank")
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let service = service();

        let response = service
            .register(register_request("jank", "jan@example.com"))
            .await
            .unwrap();

        assert_eq!(response.message, "User successfully registered");
        assert_eq!(response.username, "jank");
        assert_eq!(response.email, "jan@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = service();
        service
            .register(register_request("jank", "jan@example.com"))
            .await
            .unwrap();

        let result = service
            .register(register_request("jank", "other@example.com"))
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Username already exists"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = service();
        service
            .register(register_request("jank", "jan@example.com"))
            .await
            .unwrap();

        let result = service
            .register(register_request("janek", "jan@example.com"))
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Email already exists"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_short_password_fails() {
        let service = service();
        let mut req = register_request("jank", "jan@example.com");
        req.password = "short".into();

        assert!(matches!(
            service.register(req).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let service = service();
        registered_user(&service).await;

        let token = service
            .login(LoginRequest {
                username: "jank".into(),
                password: "secret123".into(),
            })
            .await
            .unwrap();

        assert!(token.access_token.starts_with("wtk_"));
        assert_eq!(token.token_type, "bearer");

        // the issued token authenticates back to the same user
        let user = service.authenticate(&token.access_token).await.unwrap();
        assert_eq!(user.username, "jank");
    }

    #[tokio::test]
    async fn test_login_wrong_password_unauthorized() {
        let service = service();
        registered_user(&service).await;

        let result = service
            .login(LoginRequest {
                username: "jank".into(),
                password: "wrong".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_user_unauthorized() {
        let service = service();

        let result = service
            .login(LoginRequest {
                username: "ghost".into(),
                password: "whatever".into(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_token() {
        let service = service();

        assert!(matches!(
            service.authenticate("wtk_bogus").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_add_funds_reports_pln_value() {
        let service = service();
        let user = registered_user(&service).await;

        let response = service
            .add_funds(user.id, Currency::EUR, dec("100"))
            .await
            .unwrap();

        assert_eq!(response.message, "Successfully added 100 EUR.");
        assert_eq!(response.wallet_report[0].amount, dec("100"));
        assert_eq!(response.wallet_report[0].value_pln, Some(dec("430.00")));
        assert_eq!(response.total_in_pln, dec("430.00"));
        assert_eq!(
            response.effective_date,
            NaiveDate::from_ymd_opt(2025, 2, 24).unwrap()
        );
    }

    #[tokio::test]
    async fn test_add_non_positive_amount_fails() {
        let service = service();
        let user = registered_user(&service).await;

        let zero = service.add_funds(user.id, Currency::EUR, dec("0")).await;
        let negative = service.add_funds(user.id, Currency::EUR, dec("-5")).await;

        assert!(matches!(zero, Err(AppError::BadRequest(_))));
        assert!(matches!(negative, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_subtract_insufficient_funds() {
        let service = service();
        let user = registered_user(&service).await;
        service
            .add_funds(user.id, Currency::EUR, dec("10"))
            .await
            .unwrap();

        let result = service
            .subtract_funds(user.id, Currency::EUR, dec("10.01"))
            .await;

        assert!(matches!(result, Err(AppError::InsufficientFunds { .. })));
    }

    #[tokio::test]
    async fn test_subtract_full_balance_removes_wallet() {
        let service = service();
        let user = registered_user(&service).await;
        service
            .add_funds(user.id, Currency::EUR, dec("100"))
            .await
            .unwrap();

        let response = service
            .subtract_funds(user.id, Currency::EUR, dec("100"))
            .await
            .unwrap();

        assert_eq!(response.wallet_report[0].amount, dec("0"));
        assert_eq!(response.total_in_pln, dec("0.00"));

        // a subsequent report shows no entry for that currency
        assert!(service.wallet_report(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wallet_report_totals_across_currencies() {
        let service = service();
        let user = registered_user(&service).await;
        service
            .add_funds(user.id, Currency::EUR, dec("100"))
            .await
            .unwrap();
        service
            .add_funds(user.id, Currency::USD, dec("10"))
            .await
            .unwrap();

        let report = service.wallet_report(user.id).await.unwrap().unwrap();

        assert_eq!(report.wallet_report.len(), 2);
        // 100 * 4.30 + 10 * 3.95
        assert_eq!(report.total_pln, dec("469.50"));
    }

    #[tokio::test]
    async fn test_me_includes_total_in_pln() {
        let service = service();
        let user = registered_user(&service).await;
        service
            .add_funds(user.id, Currency::EUR, dec("100"))
            .await
            .unwrap();

        let me = service.me(&user).await.unwrap();

        assert_eq!(me.username, "jank");
        assert_eq!(me.balance_in_pln, dec("430.00"));
    }

    #[tokio::test]
    async fn test_currencies_listing() {
        let service = service();

        let response = service.currencies().await.unwrap();

        assert_eq!(
            response.available_currencies,
            vec![Currency::EUR, Currency::USD]
        );
    }

    #[tokio::test]
    async fn test_exhausted_rate_cache_maps_to_rates_unavailable() {
        let service = WalletService::new(MockRepo::new(), DeadRates);
        service
            .register(register_request("jank", "jan@example.com"))
            .await
            .unwrap();
        let user = service
            .repo()
            .find_user_by_username("jank")
            .await
            .unwrap()
            .unwrap();

        // the mutation itself succeeds before the rate lookup fails
        let result = service.add_funds(user.id, Currency::EUR, dec("1")).await;

        match result {
            Err(AppError::RatesUnavailable(msg)) => {
                assert!(msg.contains("support@plnwallet.example"))
            }
            other => panic!("expected RatesUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mutation_validation_never_touches_rates() {
        // DeadRates would error on any rate lookup; a validation failure
        // must return before that.
        let service = WalletService::new(MockRepo::new(), DeadRates);
        service
            .register(register_request("jank", "jan@example.com"))
            .await
            .unwrap();
        let user = service
            .repo()
            .find_user_by_username("jank")
            .await
            .unwrap()
            .unwrap();

        let result = service.add_funds(user.id, Currency::EUR, dec("0")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = service.subtract_funds(user.id, Currency::EUR, dec("5")).await;
        assert!(matches!(result, Err(AppError::InsufficientFunds { .. })));
    }
}
