//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::DomainError;

/// Unique identifier for a User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random UserId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a UserId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A registered wallet owner.
///
/// `password_hash` is the salted digest produced by the security layer;
/// the plaintext password never reaches this type.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    ///
    /// # Validation
    /// - Names, email and username cannot be blank
    /// - Email must contain an `@`
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        username: String,
        password_hash: String,
    ) -> Result<Self, DomainError> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(DomainError::ValidationError("Name cannot be empty".into()));
        }
        if username.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Username cannot be empty".into(),
            ));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(DomainError::ValidationError(
                "A valid email address is required".into(),
            ));
        }

        Ok(Self {
            id: UserId::new(),
            first_name,
            last_name,
            email,
            username,
            password_hash,
            created_at: Utc::now(),
        })
    }

    /// Reconstructs a user from database fields.
    pub fn from_parts(
        id: UserId,
        first_name: String,
        last_name: String,
        email: String,
        username: String,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            username,
            password_hash,
            created_at,
        }
    }
}
