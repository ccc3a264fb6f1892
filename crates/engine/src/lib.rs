//! Ledger and wallet-mutation engine.
//!
//! Holds per-user wallet balances, places card authorization holds against
//! them and opens deposit requests. Every write runs in one unit of work under
//! an exclusive per-wallet lock, and every balance movement is mirrored by a
//! balanced journal of ledger entries.

pub use caller::CallerContext;
pub use card_transactions::{CardTransaction, CardTransactionStatus};
pub use commands::{AuthorizeCmd, DepositRequestCmd};
pub use currency::Currency;
pub use custody::{AddressIssuer, IssuedAddress, PlaceholderAddressIssuer};
pub use deposit_addresses::DepositAddress;
pub use deposit_requests::{DepositRequest, DepositStatus};
pub use deposit_rules::{DepositMethod, DepositRule, NewDepositRule};
pub use error::EngineError;
pub use journals::{EntryDraft, Journal, JournalKind};
pub use ledger_entries::{Direction, LedgerEntry};
pub use money::{Money, PPM, parse_scaled};
pub use ops::{DepositRequestCreated, Engine, EngineBuilder};
pub use wallets::{Bucket, Wallet};

mod caller;
mod card_transactions;
mod commands;
mod currency;
mod custody;
mod deposit_addresses;
mod deposit_requests;
mod deposit_rules;
mod error;
mod journals;
mod ledger_entries;
mod money;
mod ops;
mod util;
mod wallet_locks;
mod wallets;

pub type ResultEngine<T> = Result<T, EngineError>;
