use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Usdt,
}

pub mod wallet {
    use super::*;

    /// Balances of one wallet, in minor units of `currency`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub currency: Currency,
        pub available_minor: i64,
        pub frozen_minor: i64,
    }
}

pub mod card {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthorizeRequest {
        pub amount_minor: i64,
        pub currency: Currency,
        #[serde(default)]
        pub mcc: Option<String>,
        /// Retrying with the same key returns the first transaction.
        #[serde(default)]
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthorizeResponse {
        pub transaction_id: Uuid,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CardTransactionStatus {
        Authorized,
        Captured,
        Voided,
        Declined,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardTransactionView {
        pub id: Uuid,
        pub card_id: String,
        pub wallet_id: Uuid,
        pub mcc: String,
        pub amount_minor: i64,
        pub currency: Currency,
        pub status: CardTransactionStatus,
        pub authorized_at: DateTime<Utc>,
    }
}

pub mod deposit {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DepositMethod {
        UsdtTrc20,
        UsdtErc20,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DepositStatus {
        Pending,
        Confirmed,
        Credited,
        Expired,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositRequestNew {
        pub method: DepositMethod,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositRequestCreated {
        pub request_id: Uuid,
        pub address: String,
        pub eta_minutes: i32,
        pub required_confirmations: i32,
        pub fee_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositRequestView {
        pub id: Uuid,
        pub method: DepositMethod,
        pub currency: Currency,
        pub amount_minor: i64,
        pub fee_minor: i64,
        pub net_minor: i64,
        pub status: DepositStatus,
        pub address: String,
        pub required_confirmations: i32,
        pub created_at: DateTime<Utc>,
    }
}
