//! # Balance Store
//!
//! Ground truth for `balance_of`: one [`BalanceRecord`] per
//! (identifier, holder) pair. The store performs no holder-index
//! maintenance; that is the protocol's job.

use crate::domain::entities::BalanceRecord;
use crate::domain::value_objects::{Address, TokenId, U256};
use crate::errors::LedgerError;
use std::collections::HashMap;
use tracing::debug;

/// Storage key of a balance record.
pub type BalanceKey = (TokenId, Address);

/// Per-(identifier, holder) balance records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceStore {
    records: HashMap<BalanceKey, BalanceRecord>,
}

impl BalanceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record at `(id, holder)` with a fresh one holding `amount`.
    ///
    /// Crediting overwrites; it never adds to an existing amount.
    pub fn credit(&mut self, id: TokenId, holder: Address, amount: U256) {
        debug!(%id, holder = %holder, %amount, "credit");
        self.records
            .insert((id, holder), BalanceRecord::fresh(holder, amount));
    }

    /// Remove `amount` from the record at `(id, holder)`.
    ///
    /// Returns the updated record. A result of zero marks the record burned.
    pub fn debit(
        &mut self,
        id: TokenId,
        holder: Address,
        amount: U256,
    ) -> Result<BalanceRecord, LedgerError> {
        let updated = debit_record(self.records.get(&(id, holder)).copied(), id, holder, amount)?;
        debug!(%id, holder = %holder, %amount, remaining = %updated.amount, "debit");
        self.records.insert((id, holder), updated);
        Ok(updated)
    }

    /// Amount held, zero if no record exists.
    #[must_use]
    pub fn read(&self, id: TokenId, holder: Address) -> U256 {
        self.records
            .get(&(id, holder))
            .map_or_else(U256::zero, |record| record.amount)
    }

    /// Raw record, if one was ever written.
    #[must_use]
    pub fn record(&self, id: TokenId, holder: Address) -> Option<&BalanceRecord> {
        self.records.get(&(id, holder))
    }

    /// Write a record verbatim. Used when committing staged changes and
    /// when restoring snapshots.
    pub(crate) fn put(&mut self, key: BalanceKey, record: BalanceRecord) {
        self.records.insert(key, record);
    }

    /// Iterate over every stored record.
    pub fn iter(&self) -> impl Iterator<Item = (&BalanceKey, &BalanceRecord)> {
        self.records.iter()
    }

    /// Number of stored records, burned ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record was ever written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Debit rules shared by the committed store and the staging overlay.
///
/// A missing record counts as a zero balance; everything else is decided
/// by [`BalanceRecord::debited`].
pub(crate) fn debit_record(
    current: Option<BalanceRecord>,
    id: TokenId,
    holder: Address,
    amount: U256,
) -> Result<BalanceRecord, LedgerError> {
    current
        .ok_or(LedgerError::InsufficientBalance {
            id,
            required: amount,
            available: U256::zero(),
        })?
        .debited(id, holder, amount)
}
