use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, EntryDraft, Journal, JournalKind, LedgerEntry, ResultEngine,
    journals::{self, ensure_balanced},
    ledger_entries,
};

use super::{Engine, UnitOfWork};

impl Engine {
    /// Writes a journal and its entries inside `uow`.
    ///
    /// The entries must balance per currency; nothing is written otherwise.
    pub(crate) async fn record_journal(
        &self,
        uow: &UnitOfWork,
        kind: JournalKind,
        reference_id: Uuid,
        description: &str,
        entries: &[EntryDraft],
    ) -> ResultEngine<Journal> {
        ensure_balanced(entries)?;

        let journal = Journal::new(kind, reference_id, description.to_string());
        journals::ActiveModel::from(&journal).insert(uow.db()).await?;

        for draft in entries {
            let entry = LedgerEntry {
                id: Uuid::new_v4(),
                journal_id: journal.id,
                wallet_id: draft.wallet_id,
                bucket: draft.bucket,
                direction: draft.direction,
                amount_minor: draft.amount_minor,
                currency: draft.currency,
            };
            ledger_entries::ActiveModel::from(&entry)
                .insert(uow.db())
                .await?;
        }

        Ok(journal)
    }

    /// Returns the journal recorded for `reference_id` together with its
    /// entries. Intended for auditors; not scoped to a caller.
    pub async fn journal_for_reference(
        &self,
        kind: JournalKind,
        reference_id: Uuid,
    ) -> ResultEngine<(Journal, Vec<LedgerEntry>)> {
        let model = journals::Entity::find()
            .filter(journals::Column::Kind.eq(kind.as_str()))
            .filter(journals::Column::ReferenceId.eq(reference_id.to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("journal not exists".to_string()))?;
        let journal = Journal::try_from(model)?;

        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::JournalId.eq(journal.id.to_string()))
            .order_by_asc(ledger_entries::Column::Direction)
            .all(&self.database)
            .await?
            .into_iter()
            .map(LedgerEntry::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok((journal, entries))
    }
}
