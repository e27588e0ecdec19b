//! Bearer token record.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::user::UserId;

/// A login session token, stored hashed.
///
/// The raw token is handed to the client exactly once at login; only its
/// digest is persisted, mirroring how API credentials are stored.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub id: Uuid,
    pub user_id: UserId,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Creates a token record valid for `ttl_minutes` from now.
    pub fn new(user_id: UserId, token_hash: String, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    /// Reconstructs a token record from database fields.
    pub fn from_parts(
        id: Uuid,
        user_id: UserId,
        token_hash: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            token_hash,
            created_at,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_expiry() {
        let token = AuthToken::new(UserId::new(), "hash".into(), 30);
        assert!(!token.is_expired(Utc::now()));
        assert!(token.is_expired(Utc::now() + Duration::minutes(31)));
    }
}
