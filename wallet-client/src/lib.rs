//! # Wallet Client SDK
//!
//! A typed Rust client for the PLN Wallet API.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use wallet_types::{
    BalanceReport, CurrenciesResponse, Currency, LoginRequest, MeResponse, RatesResponse,
    RegisterRequest, RegisterResponse, TokenResponse, WalletUpdateResponse,
};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// PLN Wallet API client.
pub struct WalletClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl WalletClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: Client::new(),
        }
    }

    /// Sets the bearer token for authenticated requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Registers a new user.
    pub async fn register(&self, req: &RegisterRequest) -> Result<RegisterResponse, ClientError> {
        self.post("/registration", req).await
    }

    /// Logs in and returns the issued token payload.
    ///
    /// Chain with [`WalletClient::with_token`] to authenticate follow-up
    /// calls.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, ClientError> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post("/login", &req).await
    }

    /// Fetches the authenticated user's profile.
    pub async fn me(&self) -> Result<MeResponse, ClientError> {
        self.get("/me").await
    }

    /// Fetches the current exchange-rate table.
    pub async fn exchange_rates(&self) -> Result<RatesResponse, ClientError> {
        self.get("/exchange_rates").await
    }

    /// Fetches the supported currency list.
    pub async fn currencies(&self) -> Result<CurrenciesResponse, ClientError> {
        self.get("/currencies").await
    }

    /// Fetches the full balance report.
    ///
    /// Returns `None` when the user holds no foreign currency (the API
    /// answers with a message payload instead of a report).
    pub async fn wallet_report(&self) -> Result<Option<BalanceReport>, ClientError> {
        let value: serde_json::Value = self.get("/wallet").await?;
        if value.get("wallet_report").is_none() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Adds funds in a currency.
    pub async fn add(
        &self,
        currency: Currency,
        amount: Decimal,
    ) -> Result<WalletUpdateResponse, ClientError> {
        self.post_empty(&format!("/wallet/add/{}/{}", currency, amount))
            .await
    }

    /// Subtracts funds in a currency.
    pub async fn sub(
        &self,
        currency: Currency,
        amount: Decimal,
    ) -> Result<WalletUpdateResponse, ClientError> {
        self.post_empty(&format!("/wallet/sub/{}/{}", currency, amount))
            .await
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.header("Authorization", format!("Bearer {}", token)),
            None => req,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let req = self.authorize(self.http.get(format!("{}{}", self.base_url, path)));
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let req = self.authorize(
            self.http
                .post(format!("{}{}", self.base_url, path))
                .json(body),
        );
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let req = self.authorize(self.http.post(format!("{}{}", self.base_url, path)));
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
