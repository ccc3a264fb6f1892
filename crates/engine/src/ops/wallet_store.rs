use sea_orm::{ActiveValue, QueryFilter, QuerySelect, prelude::*};

use crate::{CallerContext, Currency, EngineError, ResultEngine, Wallet, wallets};

use super::{Engine, UnitOfWork, with_uow};

/// A wallet whose lock is held by the current unit of work.
///
/// Only [`Engine::lock_wallet`] builds one, so balance writes cannot happen
/// without the lock.
#[derive(Debug)]
pub(crate) struct LockedWallet {
    wallet: Wallet,
}

impl LockedWallet {
    pub(crate) fn wallet(&self) -> &Wallet {
        &self.wallet
    }
}

impl Engine {
    /// Takes exclusive access to the `(user_id, currency)` wallet until `uow`
    /// commits or rolls back.
    pub(crate) async fn lock_wallet(
        &self,
        uow: &mut UnitOfWork,
        user_id: &str,
        currency: Currency,
    ) -> ResultEngine<LockedWallet> {
        let guard = self.locks.acquire(user_id, currency).await;
        uow.hold(guard);

        let model = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .filter(wallets::Column::Currency.eq(currency.code()))
            .lock_exclusive()
            .one(uow.db())
            .await?;

        match model {
            Some(model) => Ok(LockedWallet {
                wallet: Wallet::try_from(model)?,
            }),
            None => Err(self.missing_wallet(uow, user_id, currency).await?),
        }
    }

    /// Tells "wrong currency" apart from "no wallet at all".
    async fn missing_wallet(
        &self,
        uow: &UnitOfWork,
        user_id: &str,
        currency: Currency,
    ) -> ResultEngine<EngineError> {
        let other = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .one(uow.db())
            .await?;

        Ok(match other {
            Some(other) => EngineError::CurrencyMismatch(format!(
                "user has no {currency} wallet (found {})",
                other.currency
            )),
            None => EngineError::KeyNotFound("wallet not exists".to_string()),
        })
    }

    /// Moves the wallet balances by the given deltas.
    ///
    /// Fails with `BalanceInvariant` if either bucket would go negative; the
    /// caller's unit of work is then rolled back.
    pub(crate) async fn apply_delta(
        &self,
        uow: &UnitOfWork,
        locked: &mut LockedWallet,
        delta_available: i64,
        delta_frozen: i64,
    ) -> ResultEngine<()> {
        let next = locked.wallet.with_delta(delta_available, delta_frozen)?;

        let active = wallets::ActiveModel {
            id: ActiveValue::Set(next.id.to_string()),
            available: ActiveValue::Set(next.available),
            frozen: ActiveValue::Set(next.frozen),
            ..Default::default()
        };
        active.update(uow.db()).await?;

        locked.wallet = next;
        Ok(())
    }

    /// Creates the zero-balance wallet of `user_id` in `currency`.
    ///
    /// Called once per currency when the account is set up.
    pub async fn open_wallet(&self, user_id: &str, currency: Currency) -> ResultEngine<Wallet> {
        let caller = CallerContext::new(user_id)?;
        let wallet = with_uow!(self, |uow| self.open_wallet_in(&mut uow, &caller, currency).await)?;
        tracing::info!(user_id = caller.user_id(), %currency, wallet_id = %wallet.id, "wallet opened");
        Ok(wallet)
    }

    async fn open_wallet_in(
        &self,
        uow: &mut UnitOfWork,
        caller: &CallerContext,
        currency: Currency,
    ) -> ResultEngine<Wallet> {
        let guard = self.locks.acquire(caller.user_id(), currency).await;
        uow.hold(guard);

        let exists = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(caller.user_id()))
            .filter(wallets::Column::Currency.eq(currency.code()))
            .one(uow.db())
            .await?
            .is_some();
        if exists {
            return Err(EngineError::ExistingKey(format!(
                "{currency} wallet of {}",
                caller.user_id()
            )));
        }

        let wallet = Wallet::new(caller.user_id().to_string(), currency);
        wallets::ActiveModel::from(&wallet).insert(uow.db()).await?;
        Ok(wallet)
    }

    /// Return a wallet snapshot from DB, read under the wallet lock.
    pub async fn wallet(&self, caller: &CallerContext, currency: Currency) -> ResultEngine<Wallet> {
        with_uow!(self, |uow| {
            self.lock_wallet(&mut uow, caller.user_id(), currency)
                .await
                .map(|locked| locked.wallet)
        })
    }
}
