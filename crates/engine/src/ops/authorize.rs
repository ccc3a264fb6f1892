use sea_orm::{QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    AuthorizeCmd, Bucket, CallerContext, CardTransaction, Currency, EngineError, EntryDraft,
    JournalKind, Money, ResultEngine, card_transactions,
    util::{ensure_positive, normalize_optional_text, normalize_required, parse_uuid},
};

use super::{Engine, UnitOfWork, with_uow};

/// Validated authorization input.
struct Hold {
    card_id: String,
    mcc: String,
    amount_minor: i64,
    currency: Currency,
    idempotency_key: Option<String>,
}

impl Engine {
    /// Places an authorization hold for a card charge.
    ///
    /// Inside one unit of work this:
    /// - locks the caller's wallet in `cmd.currency`
    /// - checks `available >= amount` before writing anything
    /// - moves `amount` from `available` to `frozen`
    /// - records the `authorized` card transaction
    /// - records a `card_auth` journal debiting `available` and crediting
    ///   `frozen` by the same amount
    ///
    /// On any failure nothing is persisted and the wallet is unchanged.
    pub async fn authorize(&self, cmd: AuthorizeCmd) -> ResultEngine<Uuid> {
        ensure_positive(cmd.amount_minor, "amount_minor")?;
        let hold = Hold {
            card_id: normalize_required(&cmd.card_id, "card id")?,
            mcc: cmd.mcc.trim().to_string(),
            amount_minor: cmd.amount_minor,
            currency: cmd.currency,
            idempotency_key: normalize_optional_text(cmd.idempotency_key.as_deref()),
        };
        let amount = Money::new(hold.amount_minor, hold.currency);

        let result = with_uow!(self, |uow| self.authorize_in(&mut uow, &cmd.caller, &hold).await);

        match &result {
            Ok(transaction_id) => tracing::info!(
                user_id = cmd.caller.user_id(),
                card_id = hold.card_id.as_str(),
                %transaction_id,
                %amount,
                "card authorization hold placed"
            ),
            Err(err) => tracing::warn!(
                user_id = cmd.caller.user_id(),
                card_id = hold.card_id.as_str(),
                %amount,
                "card authorization declined: {err}"
            ),
        }
        result
    }

    async fn authorize_in(
        &self,
        uow: &mut UnitOfWork,
        caller: &CallerContext,
        hold: &Hold,
    ) -> ResultEngine<Uuid> {
        let mut locked = self
            .lock_wallet(uow, caller.user_id(), hold.currency)
            .await?;

        if let Some(key) = hold.idempotency_key.as_deref()
            && let Some(existing) = card_transactions::Entity::find()
                .filter(card_transactions::Column::UserId.eq(caller.user_id()))
                .filter(card_transactions::Column::IdempotencyKey.eq(key))
                .one(uow.db())
                .await?
        {
            if existing.card_id != hold.card_id
                || existing.amount_minor != hold.amount_minor
                || existing.currency != hold.currency.code()
                || existing.mcc != hold.mcc
            {
                return Err(EngineError::ExistingKey(format!(
                    "idempotency key {key} reused with different parameters"
                )));
            }
            return parse_uuid(&existing.id, "card transaction");
        }

        let wallet = locked.wallet();
        let wallet_id = wallet.id;
        if wallet.available < hold.amount_minor {
            return Err(EngineError::InsufficientFunds(format!(
                "{} available, {} requested",
                Money::new(wallet.available, wallet.currency),
                Money::new(hold.amount_minor, hold.currency)
            )));
        }

        self.apply_delta(uow, &mut locked, -hold.amount_minor, hold.amount_minor)
            .await?;

        let tx = CardTransaction::authorized(
            hold.card_id.clone(),
            caller.user_id().to_string(),
            wallet_id,
            hold.mcc.clone(),
            hold.amount_minor,
            hold.currency,
            hold.idempotency_key.clone(),
        )?;
        card_transactions::ActiveModel::from(&tx)
            .insert(uow.db())
            .await?;

        self.record_journal(
            uow,
            JournalKind::CardAuth,
            tx.id,
            "auth hold",
            &[
                EntryDraft::debit(wallet_id, Bucket::Available, hold.amount_minor, hold.currency),
                EntryDraft::credit(wallet_id, Bucket::Frozen, hold.amount_minor, hold.currency),
            ],
        )
        .await?;

        Ok(tx.id)
    }

    /// Returns one of the caller's card transactions.
    pub async fn card_transaction(
        &self,
        caller: &CallerContext,
        transaction_id: Uuid,
    ) -> ResultEngine<CardTransaction> {
        let model = card_transactions::Entity::find_by_id(transaction_id.to_string())
            .filter(card_transactions::Column::UserId.eq(caller.user_id()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("card transaction not exists".to_string()))?;
        CardTransaction::try_from(model)
    }
}
