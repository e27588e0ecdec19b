//! Wallet domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::currency::Currency;
use super::user::UserId;
use crate::error::DomainError;

/// Unique identifier for a Wallet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(Uuid);

impl WalletId {
    /// Creates a new random WalletId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a WalletId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WalletId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single-currency balance held by a user.
///
/// At most one wallet row exists per (user, currency) pair. The amount is
/// never negative; a debit that lands exactly on zero removes the row from
/// storage, so a persisted wallet always holds a positive balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    pub id: WalletId,
    pub user_id: UserId,
    pub currency: Currency,
    pub amount: Decimal,
}

impl Wallet {
    /// Creates a new wallet holding an initial positive amount.
    pub fn new(user_id: UserId, currency: Currency, amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self {
            id: WalletId::new(),
            user_id,
            currency,
            amount,
        })
    }

    /// Reconstructs a wallet from database fields.
    pub fn from_parts(id: WalletId, user_id: UserId, currency: Currency, amount: Decimal) -> Self {
        Self {
            id,
            user_id,
            currency,
            amount,
        }
    }

    /// Adds to the balance.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), DomainError> {
        if amount.is_sign_negative() {
            return Err(DomainError::NegativeAmount);
        }
        self.amount += amount;
        Ok(())
    }

    /// Subtracts from the balance, failing if it would go negative.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), DomainError> {
        if amount.is_sign_negative() {
            return Err(DomainError::NegativeAmount);
        }
        if self.amount < amount {
            return Err(DomainError::InsufficientFunds {
                currency: self.currency,
                available: self.amount,
                requested: amount,
            });
        }
        self.amount -= amount;
        Ok(())
    }

    /// True when the balance reached exactly zero and the row should go away.
    pub fn is_empty(&self) -> bool {
        self.amount.is_zero()
    }
}
