//! On-chain address record attached to a crypto deposit request.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub deposit_request_id: Uuid,
    pub address: String,
    pub required_confirmations: i32,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deposit_addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub deposit_request_id: String,
    pub address: String,
    pub required_confirmations: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deposit_requests::Entity",
        from = "Column::DepositRequestId",
        to = "super::deposit_requests::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    DepositRequests,
}

impl Related<super::deposit_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepositRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&DepositAddress> for ActiveModel {
    fn from(value: &DepositAddress) -> Self {
        Self {
            deposit_request_id: ActiveValue::Set(value.deposit_request_id.to_string()),
            address: ActiveValue::Set(value.address.clone()),
            required_confirmations: ActiveValue::Set(value.required_confirmations),
        }
    }
}

impl TryFrom<Model> for DepositAddress {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            deposit_request_id: parse_uuid(&model.deposit_request_id, "deposit request")?,
            address: model.address,
            required_confirmations: model.required_confirmations,
        })
    }
}
