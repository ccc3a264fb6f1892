//! Deposit requests.
//!
//! A request is opened in status `pending` together with its method-specific
//! address record. Crediting the wallet once the deposit confirms is the job of
//! a reconciliation process outside the engine.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, DepositMethod, EngineError,
    util::{model_currency, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    Pending,
    Confirmed,
    Credited,
    Expired,
}

impl DepositStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Credited => "credited",
            Self::Expired => "expired",
        }
    }
}

impl TryFrom<&str> for DepositStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "credited" => Ok(Self::Credited),
            "expired" => Ok(Self::Expired),
            other => Err(EngineError::InvalidId(format!(
                "invalid deposit status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    pub id: Uuid,
    pub user_id: String,
    pub method: DepositMethod,
    pub currency: Currency,
    pub amount_minor: i64,
    pub fee_minor: i64,
    pub net_minor: i64,
    pub status: DepositStatus,
    /// Rule the request was validated against.
    pub rule_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deposit_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub method: String,
    pub currency: String,
    pub amount_minor: i64,
    pub fee_minor: i64,
    pub net_minor: i64,
    pub status: String,
    pub rule_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::deposit_addresses::Entity")]
    DepositAddresses,
}

impl Related<super::deposit_addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepositAddresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&DepositRequest> for ActiveModel {
    fn from(request: &DepositRequest) -> Self {
        Self {
            id: ActiveValue::Set(request.id.to_string()),
            user_id: ActiveValue::Set(request.user_id.clone()),
            method: ActiveValue::Set(request.method.as_str().to_string()),
            currency: ActiveValue::Set(request.currency.code().to_string()),
            amount_minor: ActiveValue::Set(request.amount_minor),
            fee_minor: ActiveValue::Set(request.fee_minor),
            net_minor: ActiveValue::Set(request.net_minor),
            status: ActiveValue::Set(request.status.as_str().to_string()),
            rule_id: ActiveValue::Set(request.rule_id),
            created_at: ActiveValue::Set(request.created_at),
        }
    }
}

impl TryFrom<Model> for DepositRequest {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "deposit request")?,
            user_id: model.user_id,
            method: DepositMethod::try_from(model.method.as_str())?,
            currency: model_currency(&model.currency)?,
            amount_minor: model.amount_minor,
            fee_minor: model.fee_minor,
            net_minor: model.net_minor,
            status: DepositStatus::try_from(model.status.as_str())?,
            rule_id: model.rule_id,
            created_at: model.created_at,
        })
    }
}
