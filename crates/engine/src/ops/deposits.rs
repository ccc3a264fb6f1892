use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    CallerContext, DepositAddress, DepositMethod, DepositRequest, DepositRequestCmd,
    DepositRule, DepositStatus, EngineError, Money, NewDepositRule, ResultEngine,
    deposit_addresses, deposit_requests, deposit_rules, util::ensure_positive,
};

use super::{Engine, UnitOfWork, with_uow};

/// What the caller needs to fund a freshly opened deposit request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositRequestCreated {
    pub request_id: Uuid,
    pub address: String,
    pub eta_minutes: i32,
    pub required_confirmations: i32,
    pub fee_minor: i64,
    pub net_minor: i64,
}

async fn active_rule<C: ConnectionTrait>(
    db: &C,
    method: DepositMethod,
) -> ResultEngine<Option<DepositRule>> {
    deposit_rules::Entity::find()
        .filter(deposit_rules::Column::Method.eq(method.as_str()))
        .filter(deposit_rules::Column::Active.eq(true))
        .order_by_desc(deposit_rules::Column::Id)
        .one(db)
        .await?
        .map(DepositRule::try_from)
        .transpose()
}

impl Engine {
    /// Opens a pending deposit request.
    ///
    /// The amount is checked against the newest active rule for the method,
    /// the fee is taken at the rule's rate (rounded half up to a minor unit),
    /// and the request is stored together with the address obtained from the
    /// custody issuer. No wallet is touched.
    pub async fn create_deposit_request(
        &self,
        cmd: DepositRequestCmd,
    ) -> ResultEngine<DepositRequestCreated> {
        ensure_positive(cmd.amount_minor, "amount_minor")?;
        let amount = Money::new(cmd.amount_minor, cmd.method.currency());

        let result = with_uow!(self, |uow| self.create_deposit_request_in(&mut uow, &cmd).await);

        match &result {
            Ok(created) => tracing::info!(
                user_id = cmd.caller.user_id(),
                method = %cmd.method,
                request_id = %created.request_id,
                %amount,
                "deposit request opened"
            ),
            Err(err) => tracing::warn!(
                user_id = cmd.caller.user_id(),
                method = %cmd.method,
                %amount,
                "deposit request rejected: {err}"
            ),
        }
        result
    }

    async fn create_deposit_request_in(
        &self,
        uow: &mut UnitOfWork,
        cmd: &DepositRequestCmd,
    ) -> ResultEngine<DepositRequestCreated> {
        let rule = active_rule(uow.db(), cmd.method)
            .await?
            .ok_or_else(|| {
                EngineError::DepositDisabled(format!("no active rule for {}", cmd.method))
            })?;

        let currency = cmd.method.currency();
        let amount = Money::new(cmd.amount_minor, currency);
        if !rule.contains(cmd.amount_minor) {
            return Err(EngineError::OutOfLimits(format!(
                "{amount} outside [{}, {}]",
                Money::new(rule.min_amount_minor, currency),
                Money::new(rule.max_amount_minor, currency)
            )));
        }

        let fee = amount.fee_at_ppm(rule.fee_ppm)?;
        let request = DepositRequest {
            id: Uuid::new_v4(),
            user_id: cmd.caller.user_id().to_string(),
            method: cmd.method,
            currency,
            amount_minor: amount.amount_minor(),
            fee_minor: fee.amount_minor(),
            net_minor: amount.amount_minor() - fee.amount_minor(),
            status: DepositStatus::Pending,
            rule_id: rule.id,
            created_at: Utc::now(),
        };

        let issued = self
            .address_issuer
            .issue_address(cmd.method, request.id)
            .await?;
        if issued.address.trim().is_empty() {
            return Err(EngineError::Custody(
                "issuer returned an empty address".to_string(),
            ));
        }
        let address = DepositAddress {
            deposit_request_id: request.id,
            address: issued.address,
            required_confirmations: rule
                .required_confirmations
                .unwrap_or(issued.required_confirmations),
        };

        deposit_requests::ActiveModel::from(&request)
            .insert(uow.db())
            .await?;
        deposit_addresses::ActiveModel::from(&address)
            .insert(uow.db())
            .await?;

        Ok(DepositRequestCreated {
            request_id: request.id,
            address: address.address,
            eta_minutes: rule.eta_minutes,
            required_confirmations: address.required_confirmations,
            fee_minor: request.fee_minor,
            net_minor: request.net_minor,
        })
    }

    /// Returns one of the caller's deposit requests with its address record.
    pub async fn deposit_request(
        &self,
        caller: &CallerContext,
        request_id: Uuid,
    ) -> ResultEngine<(DepositRequest, DepositAddress)> {
        let (request, address) = deposit_requests::Entity::find_by_id(request_id.to_string())
            .filter(deposit_requests::Column::UserId.eq(caller.user_id()))
            .find_also_related(deposit_addresses::Entity)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("deposit request not exists".to_string()))?;
        let address = address.ok_or_else(|| {
            EngineError::KeyNotFound("deposit address not exists".to_string())
        })?;

        Ok((
            DepositRequest::try_from(request)?,
            DepositAddress::try_from(address)?,
        ))
    }

    /// The rule currently honored for `method`, if any.
    pub async fn active_deposit_rule(
        &self,
        method: DepositMethod,
    ) -> ResultEngine<Option<DepositRule>> {
        active_rule(&self.database, method).await
    }

    /// All rules, oldest first.
    pub async fn deposit_rules(&self) -> ResultEngine<Vec<DepositRule>> {
        deposit_rules::Entity::find()
            .order_by_asc(deposit_rules::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(DepositRule::try_from)
            .collect()
    }

    /// Adds a rule. An active rule supersedes older ones for the same method.
    pub async fn create_deposit_rule(&self, rule: NewDepositRule) -> ResultEngine<DepositRule> {
        rule.validate()?;
        let model = deposit_rules::ActiveModel::from(&rule)
            .insert(&self.database)
            .await?;
        let created = DepositRule::try_from(model)?;
        tracing::info!(
            rule_id = created.id,
            method = %created.method,
            active = created.active,
            "deposit rule created"
        );
        Ok(created)
    }

    /// Enables or disables an existing rule.
    pub async fn set_deposit_rule_active(
        &self,
        rule_id: i32,
        active: bool,
    ) -> ResultEngine<DepositRule> {
        let exists = deposit_rules::Entity::find_by_id(rule_id)
            .one(&self.database)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound(format!("deposit rule {rule_id}")));
        }

        let model = deposit_rules::ActiveModel {
            id: ActiveValue::Unchanged(rule_id),
            active: ActiveValue::Set(active),
            ..Default::default()
        }
        .update(&self.database)
        .await?;
        tracing::info!(rule_id, active, "deposit rule updated");
        DepositRule::try_from(model)
    }
}
