use std::{fmt, sync::Arc};

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{
    AddressIssuer, EngineError, PlaceholderAddressIssuer, ResultEngine,
    wallet_locks::{WalletGuard, WalletLocks},
};

mod authorize;
mod deposits;
mod journal;
mod wallet_store;

pub use deposits::DepositRequestCreated;

/// Run a body inside a unit of work, committing on success and rolling back
/// on error.
///
/// The body should hand its error back instead of using `?`, so the rollback
/// completes before any wallet lock is released.
macro_rules! with_uow {
    ($self:expr, |$uow:ident| $body:expr) => {{
        let mut $uow = $crate::ops::UnitOfWork::begin(&$self.database).await?;
        let result = $body;
        $uow.finish(result).await
    }};
}

pub(crate) use with_uow;

/// One atomic unit of work: a database transaction plus the wallet locks taken
/// inside it.
pub(crate) struct UnitOfWork {
    db_tx: DatabaseTransaction,
    held: Vec<WalletGuard>,
}

impl UnitOfWork {
    pub(crate) async fn begin(database: &DatabaseConnection) -> ResultEngine<Self> {
        Ok(Self {
            db_tx: database.begin().await?,
            held: Vec::new(),
        })
    }

    pub(crate) fn db(&self) -> &DatabaseTransaction {
        &self.db_tx
    }

    fn hold(&mut self, guard: WalletGuard) {
        self.held.push(guard);
    }

    pub(crate) async fn finish<T>(self, result: ResultEngine<T>) -> ResultEngine<T> {
        let Self { db_tx, held } = self;
        let outcome = match result {
            Ok(value) => db_tx.commit().await.map(|()| value).map_err(EngineError::from),
            Err(err) => {
                if let Err(rollback_err) = db_tx.rollback().await {
                    tracing::warn!("rollback failed: {rollback_err}");
                }
                Err(err)
            }
        };
        drop(held);
        outcome
    }
}

pub struct Engine {
    database: DatabaseConnection,
    locks: WalletLocks,
    address_issuer: Arc<dyn AddressIssuer>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .field("placeholder_addresses", &self.address_issuer.is_placeholder())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    address_issuer: Option<Arc<dyn AddressIssuer>>,
    production: bool,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Custody capability used to obtain deposit addresses.
    pub fn address_issuer(mut self, issuer: Arc<dyn AddressIssuer>) -> EngineBuilder {
        self.address_issuer = Some(issuer);
        self
    }

    /// In production placeholder deposit addresses are refused.
    pub fn production(mut self, production: bool) -> EngineBuilder {
        self.production = production;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let address_issuer = match self.address_issuer {
            Some(issuer) => issuer,
            None if self.production => {
                return Err(EngineError::Config(
                    "an address issuer is required in production".to_string(),
                ));
            }
            None => Arc::new(PlaceholderAddressIssuer),
        };
        if self.production && address_issuer.is_placeholder() {
            return Err(EngineError::Config(
                "placeholder deposit addresses are not allowed in production".to_string(),
            ));
        }

        Ok(Engine {
            database: self.database,
            locks: WalletLocks::default(),
            address_issuer,
        })
    }
}
