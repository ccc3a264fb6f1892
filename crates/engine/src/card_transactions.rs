//! Card transaction primitives.
//!
//! A `CardTransaction` records one card charge. The authorization flow creates
//! it in status `authorized`; later status transitions belong to capture and
//! void flows that live outside the engine.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, ResultEngine,
    util::{model_currency, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTransactionStatus {
    Authorized,
    Captured,
    Voided,
    Declined,
}

impl CardTransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::Captured => "captured",
            Self::Voided => "voided",
            Self::Declined => "declined",
        }
    }
}

impl TryFrom<&str> for CardTransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "authorized" => Ok(Self::Authorized),
            "captured" => Ok(Self::Captured),
            "voided" => Ok(Self::Voided),
            "declined" => Ok(Self::Declined),
            other => Err(EngineError::InvalidId(format!(
                "invalid card transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTransaction {
    pub id: Uuid,
    pub card_id: String,
    pub user_id: String,
    pub wallet_id: Uuid,
    /// Merchant category code reported by the card network.
    pub mcc: String,
    pub amount_minor: i64,
    pub currency: Currency,
    pub status: CardTransactionStatus,
    pub authorized_at: DateTime<Utc>,
    pub idempotency_key: Option<String>,
}

impl CardTransaction {
    /// A fresh authorization against `wallet_id`.
    pub fn authorized(
        card_id: String,
        user_id: String,
        wallet_id: Uuid,
        mcc: String,
        amount_minor: i64,
        currency: Currency,
        idempotency_key: Option<String>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            card_id,
            user_id,
            wallet_id,
            mcc,
            amount_minor,
            currency,
            status: CardTransactionStatus::Authorized,
            authorized_at: Utc::now(),
            idempotency_key,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "card_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub card_id: String,
    pub user_id: String,
    pub wallet_id: String,
    pub mcc: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub authorized_at: DateTimeUtc,
    pub idempotency_key: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CardTransaction> for ActiveModel {
    fn from(tx: &CardTransaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            card_id: ActiveValue::Set(tx.card_id.clone()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            mcc: ActiveValue::Set(tx.mcc.clone()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            authorized_at: ActiveValue::Set(tx.authorized_at),
            idempotency_key: ActiveValue::Set(tx.idempotency_key.clone()),
        }
    }
}

impl TryFrom<Model> for CardTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "card transaction")?,
            card_id: model.card_id,
            user_id: model.user_id,
            wallet_id: parse_uuid(&model.wallet_id, "wallet")?,
            mcc: model.mcc,
            amount_minor: model.amount_minor,
            currency: model_currency(&model.currency)?,
            status: CardTransactionStatus::try_from(model.status.as_str())?,
            authorized_at: model.authorized_at,
            idempotency_key: model.idempotency_key,
        })
    }
}
