//! Per-wallet exclusive locks.
//!
//! SQLite has no row locks, so units of work that touch the same wallet are
//! serialized here. The guard lives inside the unit of work and is released
//! only after commit or rollback has completed.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::Currency;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct WalletKey {
    user_id: String,
    currency: Currency,
}

type LockMap = DashMap<WalletKey, Arc<Mutex<()>>>;

/// Registry of wallet mutexes keyed by owner and currency.
///
/// An entry lives only while some unit of work holds or waits for it.
#[derive(Debug, Default)]
pub(crate) struct WalletLocks {
    locks: Arc<LockMap>,
}

/// Exclusive hold on one wallet.
#[derive(Debug)]
pub(crate) struct WalletGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: WalletKey,
    locks: Arc<LockMap>,
}

impl Drop for WalletGuard {
    fn drop(&mut self) {
        // The owned guard keeps a reference to the mutex; release it first.
        drop(self.guard.take());
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl WalletLocks {
    /// Waits until no other unit of work holds the wallet, then takes it.
    pub(crate) async fn acquire(&self, user_id: &str, currency: Currency) -> WalletGuard {
        let key = WalletKey {
            user_id: user_id.to_string(),
            currency,
        };
        let mutex = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        tracing::debug!(user_id, %currency, "waiting for wallet lock");
        let guard = mutex.lock_owned().await;
        tracing::debug!(user_id, %currency, "wallet lock acquired");

        WalletGuard {
            guard: Some(guard),
            key,
            locks: Arc::clone(&self.locks),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_wallet_waits_for_release() {
        let locks = WalletLocks::default();
        let held = locks.acquire("alice", Currency::Usd).await;

        let blocked =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("alice", Currency::Usd))
                .await;
        assert!(blocked.is_err());

        drop(held);
        let acquired =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("alice", Currency::Usd))
                .await;
        assert!(acquired.is_ok());
    }

    #[tokio::test]
    async fn different_wallets_do_not_contend() {
        let locks = WalletLocks::default();
        let _usd = locks.acquire("alice", Currency::Usd).await;

        let other_currency =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("alice", Currency::Usdt))
                .await;
        let other_user =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("bob", Currency::Usd))
                .await;
        assert!(other_currency.is_ok());
        assert!(other_user.is_ok());
    }

    #[tokio::test]
    async fn released_wallets_leave_no_entry() {
        let locks = WalletLocks::default();
        for i in 0..100 {
            let guard = locks.acquire(&format!("ghost-{i}"), Currency::Usd).await;
            drop(guard);
        }
        assert!(locks.locks.is_empty());
    }

    #[tokio::test]
    async fn entry_survives_while_someone_waits() {
        let locks = Arc::new(WalletLocks::default());
        let held = locks.acquire("alice", Currency::Usd).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("alice", Currency::Usd).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(held);
        assert_eq!(locks.locks.len(), 1);

        waiter.await.unwrap();
        assert!(locks.locks.is_empty());
    }
}
