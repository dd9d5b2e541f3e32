//! # Staged Mutations
//!
//! A copy-on-write overlay over the balance store and holder index.
//!
//! Every protocol step runs against the overlay. Reads fall through to the
//! committed tables; writes stay in the overlay. Only when all steps of an
//! operation have succeeded is the resulting [`Changeset`] applied, so a
//! failing step in the middle of a batch leaves no trace.

use crate::domain::balances::{debit_record, BalanceKey, BalanceStore};
use crate::domain::entities::BalanceRecord;
use crate::domain::holders::HolderIndex;
use crate::domain::value_objects::{Address, TokenId, U256};
use crate::errors::LedgerError;
use std::collections::HashMap;
use tracing::warn;

/// One holder-index mutation, in the order it was staged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipChange {
    /// Holder registered.
    Added(TokenId, Address),
    /// Holder unregistered.
    Removed(TokenId, Address),
}

/// Overlay used while an operation is being validated.
pub struct StagedLedger<'a> {
    balances: &'a BalanceStore,
    holders: &'a HolderIndex,
    records: HashMap<BalanceKey, BalanceRecord>,
    membership: HashMap<BalanceKey, bool>,
    journal: Vec<MembershipChange>,
}

impl<'a> StagedLedger<'a> {
    /// Start staging on top of the committed tables.
    #[must_use]
    pub fn new(balances: &'a BalanceStore, holders: &'a HolderIndex) -> Self {
        Self {
            balances,
            holders,
            records: HashMap::new(),
            membership: HashMap::new(),
            journal: Vec::new(),
        }
    }

    fn record(&self, id: TokenId, holder: Address) -> Option<BalanceRecord> {
        self.records
            .get(&(id, holder))
            .or_else(|| self.balances.record(id, holder))
            .copied()
    }

    /// Staged amount, zero if absent.
    #[must_use]
    pub fn read(&self, id: TokenId, holder: Address) -> U256 {
        self.record(id, holder)
            .map_or_else(U256::zero, |record| record.amount)
    }

    /// Stage an overwriting credit.
    pub fn credit(&mut self, id: TokenId, holder: Address, amount: U256) {
        self.records
            .insert((id, holder), BalanceRecord::fresh(holder, amount));
    }

    /// Stage a debit, returning the record it leaves behind.
    pub fn debit(
        &mut self,
        id: TokenId,
        holder: Address,
        amount: U256,
    ) -> Result<BalanceRecord, LedgerError> {
        let updated = debit_record(self.record(id, holder), id, holder, amount)?;
        self.records.insert((id, holder), updated);
        Ok(updated)
    }

    /// Staged membership of `holder` in the index for `id`.
    #[must_use]
    pub fn is_member(&self, id: TokenId, holder: Address) -> bool {
        self.membership
            .get(&(id, holder))
            .copied()
            .unwrap_or_else(|| self.holders.contains(id, holder))
    }

    /// Stage an idempotent index registration.
    pub fn add_holder(&mut self, id: TokenId, holder: Address) {
        if self.is_member(id, holder) {
            return;
        }
        self.membership.insert((id, holder), true);
        self.journal.push(MembershipChange::Added(id, holder));
    }

    /// Stage an index removal.
    pub fn remove_holder(&mut self, id: TokenId, holder: Address) -> Result<(), LedgerError> {
        if !self.is_member(id, holder) {
            return Err(LedgerError::NotAMember { id, holder });
        }
        self.membership.insert((id, holder), false);
        self.journal.push(MembershipChange::Removed(id, holder));
        Ok(())
    }

    /// Release the borrow on the committed tables.
    #[must_use]
    pub fn finish(self) -> Changeset {
        Changeset {
            records: self.records.into_iter().collect(),
            membership: self.journal,
        }
    }
}

/// Validated mutations ready to be applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Changeset {
    records: Vec<(BalanceKey, BalanceRecord)>,
    membership: Vec<MembershipChange>,
}

impl Changeset {
    /// Number of balance records written.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Index mutations in staging order.
    #[must_use]
    pub fn membership(&self) -> &[MembershipChange] {
        &self.membership
    }

    /// Write everything to the committed tables.
    ///
    /// Membership changes are replayed in staging order against the same
    /// state they were validated on, so every removal finds its member.
    pub(crate) fn apply(self, balances: &mut BalanceStore, holders: &mut HolderIndex) {
        for (key, record) in self.records {
            balances.put(key, record);
        }
        for change in self.membership {
            match change {
                MembershipChange::Added(id, holder) => holders.add(id, holder),
                MembershipChange::Removed(id, holder) => {
                    if let Err(e) = holders.remove(id, holder) {
                        warn!(error = %e, "staged removal found no member");
                    }
                }
            }
        }
    }
}
