//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

use wallet_types::domain::Currency;
use wallet_types::dto::{
    BalanceLine, BalanceReport, CurrenciesResponse, EmptyWalletResponse, LoginRequest, MeResponse,
    RatesResponse, RegisterRequest, RegisterResponse, TokenResponse, UpdatedBalanceLine,
    WalletUpdateResponse,
};

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Check if the application is running
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Application is running", body = inline(serde_json::Value), example = json!({"message": "Welcome to PLN Wallet API."}))
    )
)]
async fn root() {}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// User registration
///
/// Creates an account from personal details, a username and a password.
/// Fails when the username or email is already taken.
#[utoipa::path(
    post,
    path = "/registration",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User successfully registered", body = RegisterResponse),
        (status = 400, description = "Username or email already exists")
    )
)]
async fn register() {}

/// User login - generate access token
///
/// Exchanges valid credentials for a bearer token used on all
/// authenticated requests.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
async fn login() {}

/// Return user profile and total wallet balance in PLN
#[utoipa::path(
    get,
    path = "/me",
    tag = "user",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile with PLN total", body = MeResponse),
        (status = 401, description = "Unauthorized - could not validate token"),
        (status = 500, description = "NBP API is unavailable and no cached rates exist")
    )
)]
async fn me() {}

/// Returns available exchange rates from NBP
///
/// The most recent rates for the supported currencies with their effective
/// date. Data is fetched from the Polish National Bank and cached for 24
/// hours; when the NBP API is down, the last cached table is served.
#[utoipa::path(
    get,
    path = "/exchange_rates",
    tag = "rates",
    responses(
        (status = 200, description = "Available exchange rate list", body = RatesResponse),
        (status = 500, description = "NBP API is unavailable and no cached rates exist")
    )
)]
async fn exchange_rates() {}

/// Returns the currencies quoted by the NBP feed
#[utoipa::path(
    get,
    path = "/currencies",
    tag = "rates",
    responses(
        (status = 200, description = "Supported currency codes", body = CurrenciesResponse),
        (status = 500, description = "NBP API is unavailable and no cached rates exist")
    )
)]
async fn currencies() {}

/// Balance for each currency plus the overall total in PLN
#[utoipa::path(
    get,
    path = "/wallet",
    tag = "wallet",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Per-currency report", body = BalanceReport),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "NBP API is unavailable and no cached rates exist")
    )
)]
async fn wallet_report() {}

/// Add an amount in a foreign currency to the wallet
#[utoipa::path(
    post,
    path = "/wallet/add/{currency}/{amount}",
    tag = "wallet",
    security(("bearer_auth" = [])),
    params(
        ("currency" = String, Path, description = "Currency code (e.g. EUR)"),
        ("amount" = String, Path, description = "Positive decimal amount")
    ),
    responses(
        (status = 200, description = "Updated balance report", body = WalletUpdateResponse),
        (status = 400, description = "Unsupported currency or non-positive amount"),
        (status = 401, description = "Unauthorized")
    )
)]
async fn wallet_add() {}

/// Subtract an amount in a foreign currency from the wallet
///
/// Subtracting the full balance removes the wallet row entirely.
#[utoipa::path(
    post,
    path = "/wallet/sub/{currency}/{amount}",
    tag = "wallet",
    security(("bearer_auth" = [])),
    params(
        ("currency" = String, Path, description = "Currency code (e.g. EUR)"),
        ("amount" = String, Path, description = "Positive decimal amount")
    ),
    responses(
        (status = 200, description = "Updated balance report", body = WalletUpdateResponse),
        (status = 400, description = "Unsupported currency, non-positive amount or insufficient funds"),
        (status = 401, description = "Unauthorized")
    )
)]
async fn wallet_sub() {}

/// OpenAPI documentation for the PLN Wallet API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PLNConvert - Conversion of foreign currencies to PLN",
        version = "1.0.0",
        description = "API for tracking and managing multi-currency balances in PLN.\n\n## Authentication\n\nMost endpoints require Bearer token authentication. Register via `/registration`, log in via `/login`, then include the returned token in the `Authorization` header:\n\n```\nAuthorization: Bearer wtk_your_token_here\n```",
        license(name = "MIT"),
    ),
    paths(
        root,
        health,
        register,
        login,
        me,
        exchange_rates,
        currencies,
        wallet_report,
        wallet_add,
        wallet_sub,
    ),
    components(
        schemas(
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            TokenResponse,
            MeResponse,
            RatesResponse,
            CurrenciesResponse,
            BalanceLine,
            BalanceReport,
            EmptyWalletResponse,
            UpdatedBalanceLine,
            WalletUpdateResponse,
            Currency,
        )
    ),

    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "user", description = "Authenticated user profile"),
        (name = "rates", description = "NBP exchange rates"),
        (name = "wallet", description = "Wallet balances and mutations"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer token authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
