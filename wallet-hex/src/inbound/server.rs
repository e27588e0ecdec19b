//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use wallet_types::{RateProvider, WalletRepository};

use super::auth::auth_middleware;
use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::WalletService;
use crate::openapi::ApiDoc;

/// HTTP Server for the PLN Wallet API.
pub struct HttpServer<R: WalletRepository, P: RateProvider> {
    state: Arc<AppState<R, P>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<R: WalletRepository, P: RateProvider> HttpServer<R, P> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: WalletService<R, P>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::default()), // 100 req/min default
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: WalletService<R, P>, requests_per_minute: u32) -> Self {
        use std::time::Duration;
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::new(
                requests_per_minute,
                Duration::from_secs(60),
            )),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let api = Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/registration", post(handlers::register::<R, P>))
            .route("/login", post(handlers::login::<R, P>))
            .route("/me", get(handlers::me::<R, P>))
            .route("/exchange_rates", get(handlers::exchange_rates::<R, P>))
            .route("/currencies", get(handlers::currencies::<R, P>))
            .route("/wallet", get(handlers::wallet_report::<R, P>))
            .route(
                "/wallet/add/{currency}/{amount}",
                post(handlers::wallet_add::<R, P>),
            )
            .route(
                "/wallet/sub/{currency}/{amount}",
                post(handlers::wallet_sub::<R, P>),
            )
            .layer(metrics)
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware::<R, P>,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone());

        // Docs live outside the auth/rate-limit stack.
        api.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
