//! Deposit address issuance.
//!
//! The engine never derives addresses itself: it asks an [`AddressIssuer`]
//! supplied by the custody side and records what it gets back.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{DepositMethod, ResultEngine};

/// Address handed out for a deposit request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedAddress {
    pub address: String,
    pub required_confirmations: i32,
}

#[async_trait]
pub trait AddressIssuer: Send + Sync {
    async fn issue_address(
        &self,
        method: DepositMethod,
        deposit_request_id: Uuid,
    ) -> ResultEngine<IssuedAddress>;

    /// `true` for issuers whose addresses cannot receive real funds.
    fn is_placeholder(&self) -> bool {
        false
    }
}

/// Random, syntactically plausible addresses for development and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceholderAddressIssuer;

#[async_trait]
impl AddressIssuer for PlaceholderAddressIssuer {
    async fn issue_address(
        &self,
        method: DepositMethod,
        _deposit_request_id: Uuid,
    ) -> ResultEngine<IssuedAddress> {
        let issued = match method {
            DepositMethod::UsdtTrc20 => IssuedAddress {
                address: format!("T{}", Uuid::new_v4().simple()),
                required_confirmations: 20,
            },
            DepositMethod::UsdtErc20 => {
                let hex = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
                IssuedAddress {
                    address: format!("0x{}", &hex[..40]),
                    required_confirmations: 12,
                }
            }
        };
        Ok(issued)
    }

    fn is_placeholder(&self) -> bool {
        true
    }
}
