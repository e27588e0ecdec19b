//! Authentication middleware for bearer-token validation.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use wallet_types::{AppError, RateProvider, User, WalletRepository};

use super::handlers::{ApiError, AppState};

/// The authenticated user, inserted into request extensions by the
/// middleware and pulled out by handlers.
#[derive(Clone)]
pub struct CurrentUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".into())))
    }
}

/// Extracts the bearer token from the Authorization header.
/// Expected format: "Bearer <token>" or just "<token>"
fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;
    if header.starts_with("Bearer ") {
        Some(header.strip_prefix("Bearer ").unwrap())
    } else {
        Some(header)
    }
}

/// Endpoints reachable without a token. Rate listings are public data.
fn is_public(path: &str) -> bool {
    matches!(
        path,
        "/" | "/health" | "/registration" | "/login" | "/exchange_rates" | "/currencies"
    )
}

/// Authentication middleware that validates login tokens.
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Hashes it using SHA-256
/// 3. Resolves the hash to a non-expired session in the database
/// 4. Returns 401 Unauthorized if validation fails
pub async fn auth_middleware<R: WalletRepository, P: RateProvider>(
    State(state): State<Arc<AppState<R, P>>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_public(request.uri().path()) {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match extract_bearer_token(auth_header) {
        Some(token) if !token.is_empty() => token,
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    match state.service.authenticate(token).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(AppError::Unauthorized(msg)) => unauthorized_response(&msg),
        Err(e) => {
            tracing::error!("token verification failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Internal server error",
                    "code": 500
                })),
            )
                .into_response()
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": message,
            "code": 401
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(
            extract_bearer_token(Some("Bearer wtk_abc123")),
            Some("wtk_abc123")
        );
    }

    #[test]
    fn test_extract_raw_token() {
        assert_eq!(extract_bearer_token(Some("wtk_abc123")), Some("wtk_abc123"));
    }

    #[test]
    fn test_extract_token_none() {
        assert_eq!(extract_bearer_token(None), None);
    }

    #[test]
    fn test_public_paths() {
        assert!(is_public("/"));
        assert!(is_public("/health"));
        assert!(is_public("/registration"));
        assert!(is_public("/login"));
        assert!(is_public("/exchange_rates"));
        assert!(is_public("/currencies"));
        assert!(!is_public("/wallet"));
        assert!(!is_public("/me"));
        assert!(!is_public("/wallet/add/EUR/100"));
    }
}
