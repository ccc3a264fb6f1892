//! Ledger entries.
//!
//! A [`LedgerEntry`] is a single debit or credit against one bucket of one
//! wallet, recorded as part of a [`Journal`](crate::Journal).
//!
//! Amounts are stored as positive integer **minor units**; the direction says
//! which side of the journal the entry sits on. Entries are append-only.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Bucket, Currency, EngineError,
    util::{model_currency, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(EngineError::InvalidId(format!(
                "invalid entry direction: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub journal_id: Uuid,
    pub wallet_id: Uuid,
    pub bucket: Bucket,
    pub direction: Direction,
    pub amount_minor: i64,
    pub currency: Currency,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub journal_id: String,
    pub wallet_id: String,
    pub bucket: String,
    pub direction: String,
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journals::Entity",
        from = "Column::JournalId",
        to = "super::journals::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Journals,
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
}

impl Related<super::journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journals.def()
    }
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&LedgerEntry> for ActiveModel {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            journal_id: ActiveValue::Set(entry.journal_id.to_string()),
            wallet_id: ActiveValue::Set(entry.wallet_id.to_string()),
            bucket: ActiveValue::Set(entry.bucket.as_str().to_string()),
            direction: ActiveValue::Set(entry.direction.as_str().to_string()),
            amount_minor: ActiveValue::Set(entry.amount_minor),
            currency: ActiveValue::Set(entry.currency.code().to_string()),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "ledger entry")?,
            journal_id: parse_uuid(&model.journal_id, "journal")?,
            wallet_id: parse_uuid(&model.wallet_id, "wallet")?,
            bucket: Bucket::try_from(model.bucket.as_str())?,
            direction: Direction::try_from(model.direction.as_str())?,
            amount_minor: model.amount_minor,
            currency: model_currency(&model.currency)?,
        })
    }
}
