//! Initial schema migration.
//!
//! - `wallets`: one per user and currency, with available/frozen buckets
//! - `card_transactions`: card charges placed on hold
//! - `journals`: one per financial event
//! - `ledger_entries`: balanced debit/credit lines of a journal
//! - `deposit_rules`: externally administered limits and fees per method
//! - `deposit_requests`: pending deposits
//! - `deposit_addresses`: on-chain address of a crypto deposit request

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Wallets {
    Table,
    Id,
    UserId,
    Currency,
    Available,
    Frozen,
    CreatedAt,
}

#[derive(Iden)]
enum CardTransactions {
    Table,
    Id,
    CardId,
    UserId,
    WalletId,
    Mcc,
    AmountMinor,
    Currency,
    Status,
    AuthorizedAt,
    IdempotencyKey,
}

#[derive(Iden)]
enum Journals {
    Table,
    Id,
    Kind,
    ReferenceId,
    Description,
    CreatedAt,
}

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    JournalId,
    WalletId,
    Bucket,
    Direction,
    AmountMinor,
    Currency,
}

#[derive(Iden)]
enum DepositRules {
    Table,
    Id,
    Method,
    MinAmountMinor,
    MaxAmountMinor,
    FeePpm,
    Active,
    EtaMinutes,
    RequiredConfirmations,
    CreatedAt,
}

#[derive(Iden)]
enum DepositRequests {
    Table,
    Id,
    UserId,
    Method,
    Currency,
    AmountMinor,
    FeeMinor,
    NetMinor,
    Status,
    RuleId,
    CreatedAt,
}

#[derive(Iden)]
enum DepositAddresses {
    Table,
    DepositRequestId,
    Address,
    RequiredConfirmations,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Wallets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Wallets::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Wallets::UserId).string().not_null())
                    .col(ColumnDef::new(Wallets::Currency).string().not_null())
                    .col(
                        ColumnDef::new(Wallets::Available)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Wallets::Available).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Wallets::Frozen)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Wallets::Frozen).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Wallets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallets-user_id-currency-unique")
                    .table(Wallets::Table)
                    .col(Wallets::UserId)
                    .col(Wallets::Currency)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Card transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CardTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CardTransactions::CardId).string().not_null())
                    .col(ColumnDef::new(CardTransactions::UserId).string().not_null())
                    .col(ColumnDef::new(CardTransactions::WalletId).string().not_null())
                    .col(ColumnDef::new(CardTransactions::Mcc).string().not_null())
                    .col(
                        ColumnDef::new(CardTransactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CardTransactions::Currency).string().not_null())
                    .col(ColumnDef::new(CardTransactions::Status).string().not_null())
                    .col(
                        ColumnDef::new(CardTransactions::AuthorizedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CardTransactions::IdempotencyKey).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-card_transactions-wallet_id")
                            .from(CardTransactions::Table, CardTransactions::WalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-card_transactions-user_id-idempotency_key")
                    .table(CardTransactions::Table)
                    .col(CardTransactions::UserId)
                    .col(CardTransactions::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-card_transactions-wallet_id")
                    .table(CardTransactions::Table)
                    .col(CardTransactions::WalletId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Journals
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Journals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Journals::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Journals::Kind).string().not_null())
                    .col(ColumnDef::new(Journals::ReferenceId).string().not_null())
                    .col(ColumnDef::new(Journals::Description).string().not_null())
                    .col(
                        ColumnDef::new(Journals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-journals-kind-reference_id")
                    .table(Journals::Table)
                    .col(Journals::Kind)
                    .col(Journals::ReferenceId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Ledger entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerEntries::JournalId).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::WalletId).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Bucket).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Direction).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::AmountMinor)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(LedgerEntries::AmountMinor).gt(0)),
                    )
                    .col(ColumnDef::new(LedgerEntries::Currency).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_entries-journal_id")
                            .from(LedgerEntries::Table, LedgerEntries::JournalId)
                            .to(Journals::Table, Journals::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_entries-wallet_id")
                            .from(LedgerEntries::Table, LedgerEntries::WalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-journal_id")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::JournalId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-wallet_id")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::WalletId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Deposit rules
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DepositRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepositRules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DepositRules::Method).string().not_null())
                    .col(
                        ColumnDef::new(DepositRules::MinAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepositRules::MaxAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DepositRules::FeePpm).big_integer().not_null())
                    .col(ColumnDef::new(DepositRules::Active).boolean().not_null())
                    .col(ColumnDef::new(DepositRules::EtaMinutes).integer().not_null())
                    .col(ColumnDef::new(DepositRules::RequiredConfirmations).integer())
                    .col(
                        ColumnDef::new(DepositRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deposit_rules-method-active")
                    .table(DepositRules::Table)
                    .col(DepositRules::Method)
                    .col(DepositRules::Active)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Deposit requests
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DepositRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepositRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DepositRequests::UserId).string().not_null())
                    .col(ColumnDef::new(DepositRequests::Method).string().not_null())
                    .col(ColumnDef::new(DepositRequests::Currency).string().not_null())
                    .col(
                        ColumnDef::new(DepositRequests::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DepositRequests::FeeMinor).big_integer().not_null())
                    .col(ColumnDef::new(DepositRequests::NetMinor).big_integer().not_null())
                    .col(ColumnDef::new(DepositRequests::Status).string().not_null())
                    .col(ColumnDef::new(DepositRequests::RuleId).integer().not_null())
                    .col(
                        ColumnDef::new(DepositRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deposit_requests-rule_id")
                            .from(DepositRequests::Table, DepositRequests::RuleId)
                            .to(DepositRules::Table, DepositRules::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deposit_requests-user_id")
                    .table(DepositRequests::Table)
                    .col(DepositRequests::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Deposit addresses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DepositAddresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepositAddresses::DepositRequestId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DepositAddresses::Address).string().not_null())
                    .col(
                        ColumnDef::new(DepositAddresses::RequiredConfirmations)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deposit_addresses-deposit_request_id")
                            .from(DepositAddresses::Table, DepositAddresses::DepositRequestId)
                            .to(DepositRequests::Table, DepositRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DepositAddresses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DepositRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DepositRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Journals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CardTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        Ok(())
    }
}
