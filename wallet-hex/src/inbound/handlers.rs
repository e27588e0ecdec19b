//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;

use wallet_types::{
    AppError, Currency, EmptyWalletResponse, LoginRequest, RateProvider, RegisterRequest,
    WalletRepository,
};

use super::auth::CurrentUser;
use crate::WalletService;

/// Application state shared across handlers.
pub struct AppState<R: WalletRepository, P: RateProvider> {
    pub service: WalletService<R, P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InsufficientFunds { currency, .. } => (
                StatusCode::BAD_REQUEST,
                format!("Insufficient funds in {}.", currency),
            ),
            // Exhausted rate cache: retryable server error carrying the
            // operator contact guidance in its message.
            AppError::RatesUnavailable(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Welcome probe.
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Welcome to PLN Wallet API." }))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Register a new user.
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn register<R: WalletRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in and receive a bearer token.
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn login<R: WalletRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.login(req).await?;
    Ok(Json(response))
}

/// Profile of the authenticated user with the PLN total.
#[tracing::instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn me<R: WalletRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.me(&user.0).await?;
    Ok(Json(response))
}

/// Current exchange rates.
#[tracing::instrument(skip(state))]
pub async fn exchange_rates<R: WalletRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.exchange_rates().await?;
    Ok(Json(response))
}

/// Currencies currently quoted by the rate source.
#[tracing::instrument(skip(state))]
pub async fn currencies<R: WalletRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.currencies().await?;
    Ok(Json(response))
}

/// Full balance report for the authenticated user.
#[tracing::instrument(skip(state, user), fields(user_id = %user.0.id))]
pub async fn wallet_report<R: WalletRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    user: CurrentUser,
) -> Result<Response, ApiError> {
    match state.service.wallet_report(user.0.id).await? {
        Some(report) => Ok(Json(report).into_response()),
        None => Ok(Json(EmptyWalletResponse {
            message: "The user has no funds in any foreign currency.".into(),
            total_in_pln: Decimal::ZERO.round_dp(2),
        })
        .into_response()),
    }
}

fn parse_mutation_path(currency: &str, amount: &str) -> Result<(Currency, Decimal), AppError> {
    let currency: Currency = currency
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Currency {} is not supported", currency)))?;
    let amount: Decimal = amount
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid amount: {}", amount)))?;
    Ok((currency, amount))
}

/// Add funds in a currency.
#[tracing::instrument(skip(state, user), fields(user_id = %user.0.id, %currency, %amount))]
pub async fn wallet_add<R: WalletRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    user: CurrentUser,
    Path((currency, amount)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let (currency, amount) = parse_mutation_path(&currency, &amount)?;
    let response = state.service.add_funds(user.0.id, currency, amount).await?;
    Ok(Json(response))
}

/// Subtract funds in a currency.
#[tracing::instrument(skip(state, user), fields(user_id = %user.0.id, %currency, %amount))]
pub async fn wallet_sub<R: WalletRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    user: CurrentUser,
    Path((currency, amount)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let (currency, amount) = parse_mutation_path(&currency, &amount)?;
    let response = state
        .service
        .subtract_funds(user.0.id, currency, amount)
        .await?;
    Ok(Json(response))
}
