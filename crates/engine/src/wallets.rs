//! The module contains `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, ResultEngine,
    util::{model_currency, parse_uuid},
};

/// A wallet.
///
/// One per user and currency. The balance is split into two buckets:
/// `available` can be spent, `frozen` is held by card authorizations until a
/// capture or a release settles it. Both buckets are never negative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Stable identifier for this wallet.
    pub id: Uuid,
    pub user_id: String,
    pub currency: Currency,
    pub available: i64,
    pub frozen: i64,
    pub created_at: DateTime<Utc>,
}

/// Balance bucket of a wallet, used as a ledger endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Available,
    Frozen,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Frozen => "frozen",
        }
    }
}

impl TryFrom<&str> for Bucket {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "available" => Ok(Self::Available),
            "frozen" => Ok(Self::Frozen),
            other => Err(EngineError::InvalidId(format!(
                "invalid wallet bucket: {other}"
            ))),
        }
    }
}

impl Wallet {
    pub fn new(user_id: String, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            currency,
            available: 0,
            frozen: 0,
            created_at: Utc::now(),
        }
    }

    /// Total funds owned by the wallet, spendable or held.
    pub fn total(&self) -> i64 {
        self.available + self.frozen
    }

    /// Returns the wallet as it would look after the delta, or an error if a
    /// bucket would go negative or overflow.
    pub fn with_delta(&self, delta_available: i64, delta_frozen: i64) -> ResultEngine<Wallet> {
        let available = self.available.checked_add(delta_available).ok_or_else(|| {
            EngineError::BalanceInvariant(format!("available overflow on wallet {}", self.id))
        })?;
        let frozen = self.frozen.checked_add(delta_frozen).ok_or_else(|| {
            EngineError::BalanceInvariant(format!("frozen overflow on wallet {}", self.id))
        })?;
        if available < 0 {
            return Err(EngineError::BalanceInvariant(format!(
                "available would become {available} on wallet {}",
                self.id
            )));
        }
        if frozen < 0 {
            return Err(EngineError::BalanceInvariant(format!(
                "frozen would become {frozen} on wallet {}",
                self.id
            )));
        }
        Ok(Wallet {
            available,
            frozen,
            ..self.clone()
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub currency: String,
    pub available: i64,
    pub frozen: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ledger_entries::Entity")]
    LedgerEntries,
}

impl Related<super::ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            available: ActiveValue::Set(value.available),
            frozen: ActiveValue::Set(value.frozen),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "wallet")?,
            user_id: model.user_id,
            currency: model_currency(&model.currency)?,
            available: model.available,
            frozen: model.frozen,
            created_at: model.created_at,
        })
    }
}
