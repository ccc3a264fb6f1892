//! Deposit rules and methods.
//!
//! Rules are administered outside the request path. For each method only the
//! most recently created active rule is honored.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, ResultEngine, money::PPM};

/// Channel through which a deposit arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositMethod {
    UsdtTrc20,
    UsdtErc20,
}

impl DepositMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UsdtTrc20 => "usdt_trc20",
            Self::UsdtErc20 => "usdt_erc20",
        }
    }

    /// Currency the deposit settles in.
    pub fn currency(self) -> Currency {
        match self {
            Self::UsdtTrc20 | Self::UsdtErc20 => Currency::Usdt,
        }
    }
}

impl core::fmt::Display for DepositMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DepositMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "usdt_trc20" => Ok(Self::UsdtTrc20),
            "usdt_erc20" => Ok(Self::UsdtErc20),
            other => Err(EngineError::DepositDisabled(format!(
                "unknown deposit method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRule {
    pub id: i32,
    pub method: DepositMethod,
    pub min_amount_minor: i64,
    pub max_amount_minor: i64,
    /// Fee as parts per million of the deposited amount (`10_000` = 1%).
    pub fee_ppm: i64,
    pub active: bool,
    pub eta_minutes: i32,
    /// Overrides the confirmation threshold supplied by the address issuer.
    pub required_confirmations: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl DepositRule {
    pub fn contains(&self, amount_minor: i64) -> bool {
        (self.min_amount_minor..=self.max_amount_minor).contains(&amount_minor)
    }
}

/// Input for a new deposit rule.
#[derive(Clone, Debug)]
pub struct NewDepositRule {
    pub method: DepositMethod,
    pub min_amount_minor: i64,
    pub max_amount_minor: i64,
    pub fee_ppm: i64,
    pub eta_minutes: i32,
    pub required_confirmations: Option<i32>,
    pub active: bool,
}

impl NewDepositRule {
    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if self.min_amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "min amount must be > 0".to_string(),
            ));
        }
        if self.max_amount_minor < self.min_amount_minor {
            return Err(EngineError::InvalidAmount(
                "max amount must be >= min amount".to_string(),
            ));
        }
        if !(0..PPM).contains(&self.fee_ppm) {
            return Err(EngineError::InvalidAmount(format!(
                "fee must be in [0, {PPM}) ppm, got {}",
                self.fee_ppm
            )));
        }
        if self.eta_minutes < 0 {
            return Err(EngineError::InvalidAmount(
                "eta minutes must be >= 0".to_string(),
            ));
        }
        if let Some(confirmations) = self.required_confirmations
            && confirmations <= 0
        {
            return Err(EngineError::InvalidAmount(
                "required confirmations must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deposit_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub method: String,
    pub min_amount_minor: i64,
    pub max_amount_minor: i64,
    pub fee_ppm: i64,
    pub active: bool,
    pub eta_minutes: i32,
    pub required_confirmations: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&NewDepositRule> for ActiveModel {
    fn from(rule: &NewDepositRule) -> Self {
        Self {
            id: ActiveValue::NotSet,
            method: ActiveValue::Set(rule.method.as_str().to_string()),
            min_amount_minor: ActiveValue::Set(rule.min_amount_minor),
            max_amount_minor: ActiveValue::Set(rule.max_amount_minor),
            fee_ppm: ActiveValue::Set(rule.fee_ppm),
            active: ActiveValue::Set(rule.active),
            eta_minutes: ActiveValue::Set(rule.eta_minutes),
            required_confirmations: ActiveValue::Set(rule.required_confirmations),
            created_at: ActiveValue::Set(Utc::now()),
        }
    }
}

impl TryFrom<Model> for DepositRule {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            method: DepositMethod::try_from(model.method.as_str())?,
            min_amount_minor: model.min_amount_minor,
            max_amount_minor: model.max_amount_minor,
            fee_ppm: model.fee_ppm,
            active: model.active,
            eta_minutes: model.eta_minutes,
            required_confirmations: model.required_confirmations,
            created_at: model.created_at,
        })
    }
}
