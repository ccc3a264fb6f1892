//! Command structs for engine operations.
//!
//! These types group the parameters of write operations, keeping call sites
//! readable and avoiding long argument lists.

use crate::{CallerContext, Currency, DepositMethod};

/// Place an authorization hold for a card charge.
#[derive(Clone, Debug)]
pub struct AuthorizeCmd {
    pub caller: CallerContext,
    pub card_id: String,
    pub amount_minor: i64,
    pub currency: Currency,
    pub mcc: String,
    /// Repeating a key returns the transaction created by the first call.
    pub idempotency_key: Option<String>,
}

impl AuthorizeCmd {
    #[must_use]
    pub fn new(
        caller: CallerContext,
        card_id: impl Into<String>,
        amount_minor: i64,
        currency: Currency,
    ) -> Self {
        Self {
            caller,
            card_id: card_id.into(),
            amount_minor,
            currency,
            mcc: String::new(),
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn mcc(mut self, mcc: impl Into<String>) -> Self {
        self.mcc = mcc.into();
        self
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Open a deposit request.
#[derive(Clone, Debug)]
pub struct DepositRequestCmd {
    pub caller: CallerContext,
    pub method: DepositMethod,
    pub amount_minor: i64,
}

impl DepositRequestCmd {
    #[must_use]
    pub fn new(caller: CallerContext, method: DepositMethod, amount_minor: i64) -> Self {
        Self {
            caller,
            method,
            amount_minor,
        }
    }
}
