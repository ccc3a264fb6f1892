//! The module contains the error the engine can throw.
//!
//! Business-rule failures leave every wallet and record untouched:
//!
//! - [`InsufficientFunds`] thrown when a wallet cannot cover an authorization.
//! - [`DepositDisabled`] thrown when no active rule exists for a deposit method.
//! - [`OutOfLimits`] thrown when a deposit amount falls outside the rule bounds.
//!
//! Storage problems surface as [`Database`] and roll back the unit of work.
//!
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`DepositDisabled`]: EngineError::DepositDisabled
//!  [`OutOfLimits`]: EngineError::OutOfLimits
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Deposit disabled: {0}")]
    DepositDisabled(String),
    #[error("Out of limits: {0}")]
    OutOfLimits(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Unbalanced journal: {0}")]
    Unbalanced(String),
    #[error("Balance invariant violated: {0}")]
    BalanceInvariant(String),
    #[error("Custody error: {0}")]
    Custody(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::DepositDisabled(a), Self::DepositDisabled(b)) => a == b,
            (Self::OutOfLimits(a), Self::OutOfLimits(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Unbalanced(a), Self::Unbalanced(b)) => a == b,
            (Self::BalanceInvariant(a), Self::BalanceInvariant(b)) => a == b,
            (Self::Custody(a), Self::Custody(b)) => a == b,
            (Self::Config(a), Self::Config(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
