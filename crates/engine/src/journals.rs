//! Journals group the ledger entries of one financial event.
//!
//! Every journal must balance: per currency, the sum of its debit entries
//! equals the sum of its credit entries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Bucket, Currency, Direction, EngineError, ResultEngine, util::parse_uuid,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalKind {
    CardAuth,
    Deposit,
}

impl JournalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CardAuth => "card_auth",
            Self::Deposit => "deposit",
        }
    }
}

impl TryFrom<&str> for JournalKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "card_auth" => Ok(Self::CardAuth),
            "deposit" => Ok(Self::Deposit),
            other => Err(EngineError::InvalidId(format!(
                "invalid journal kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    pub id: Uuid,
    pub kind: JournalKind,
    /// Id of the record that caused the event (e.g. the card transaction).
    pub reference_id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Journal {
    pub fn new(kind: JournalKind, reference_id: Uuid, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            reference_id,
            description,
            created_at: Utc::now(),
        }
    }
}

/// An entry about to be written under a journal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryDraft {
    pub wallet_id: Uuid,
    pub bucket: Bucket,
    pub direction: Direction,
    pub amount_minor: i64,
    pub currency: Currency,
}

impl EntryDraft {
    pub fn debit(wallet_id: Uuid, bucket: Bucket, amount_minor: i64, currency: Currency) -> Self {
        Self {
            wallet_id,
            bucket,
            direction: Direction::Debit,
            amount_minor,
            currency,
        }
    }

    pub fn credit(wallet_id: Uuid, bucket: Bucket, amount_minor: i64, currency: Currency) -> Self {
        Self {
            wallet_id,
            bucket,
            direction: Direction::Credit,
            amount_minor,
            currency,
        }
    }
}

/// Check that `entries` form a valid journal: at least two entries, positive
/// amounts, and zero net per currency. A one-sided journal fails the net check.
pub(crate) fn ensure_balanced(entries: &[EntryDraft]) -> ResultEngine<()> {
    if entries.len() < 2 {
        return Err(EngineError::Unbalanced(
            "a journal needs at least two entries".to_string(),
        ));
    }

    let mut net: HashMap<Currency, i128> = HashMap::new();
    for entry in entries {
        if entry.amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(format!(
                "ledger entry amount must be > 0, got {}",
                entry.amount_minor
            )));
        }
        let signed = match entry.direction {
            Direction::Debit => i128::from(entry.amount_minor),
            Direction::Credit => -i128::from(entry.amount_minor),
        };
        *net.entry(entry.currency).or_insert(0) += signed;
    }

    if let Some((currency, diff)) = net.iter().find(|(_, diff)| **diff != 0) {
        return Err(EngineError::Unbalanced(format!(
            "{currency} debits and credits differ by {diff}"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "journals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub reference_id: String,
    pub description: String,
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

impl From<&Journal> for ActiveModel {
    fn from(journal: &Journal) -> Self {
        Self {
            id: ActiveValue::Set(journal.id.to_string()),
            kind: ActiveValue::Set(journal.kind.as_str().to_string()),
            reference_id: ActiveValue::Set(journal.reference_id.to_string()),
            description: ActiveValue::Set(journal.description.clone()),
            created_at: ActiveValue::Set(journal.created_at),
        }
    }
}

impl TryFrom<Model> for Journal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "journal")?,
            kind: JournalKind::try_from(model.kind.as_str())?,
            reference_id: parse_uuid(&model.reference_id, "journal reference")?,
            description: model.description,
            created_at: model.created_at,
        })
    }
}
