//! # Ledger Snapshots
//!
//! Flat, serialisable image of a [`TokenLedger`] plus the metadata URI.
//! Entries are sorted so equal ledgers encode to equal bytes. Holder
//! sequences keep their order, since enumeration order is observable.

use crate::domain::entities::BalanceRecord;
use crate::domain::invariants::check_all_invariants;
use crate::domain::ledger::{ProtocolPolicy, TokenLedger};
use crate::domain::value_objects::{Address, TokenId, U256};
use crate::errors::SnapshotError;
use serde::{Deserialize, Serialize};

/// Current snapshot layout version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serialisable ledger image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Layout version, checked on decode.
    pub format_version: u32,
    /// Ledger generation at capture time.
    pub generation: u64,
    /// Metadata base URI.
    pub base_uri: String,
    /// Balance records by (identifier, holder).
    pub records: Vec<(TokenId, Address, BalanceRecord)>,
    /// Holder sequences by identifier.
    pub holders: Vec<(TokenId, Vec<Address>)>,
    /// Granted (owner, operator) pairs.
    pub operators: Vec<(Address, Address)>,
    /// Amount slots.
    pub slots: Vec<(TokenId, U256, Address)>,
}

impl LedgerSnapshot {
    /// Encode with bincode.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes produced by [`LedgerSnapshot::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::Corrupted(format!(
                "unsupported format version {}",
                snapshot.format_version
            )));
        }
        Ok(snapshot)
    }
}

impl TokenLedger {
    /// Capture the ledger tables together with `base_uri`.
    #[must_use]
    pub fn to_snapshot(&self, base_uri: &str) -> LedgerSnapshot {
        let mut records: Vec<_> = self
            .balances
            .iter()
            .map(|((id, holder), record)| (*id, *holder, *record))
            .collect();
        records.sort_by_key(|(id, holder, _)| (*id, *holder));

        let mut holders: Vec<_> = self
            .holders
            .iter()
            .map(|(id, set)| (*id, set.members().to_vec()))
            .collect();
        holders.sort_by_key(|(id, _)| *id);

        let mut operators: Vec<_> = self
            .approvals
            .operators()
            .filter(|(_, approved)| **approved)
            .map(|(pair, _)| *pair)
            .collect();
        operators.sort();

        let mut slots: Vec<_> = self
            .approvals
            .slots()
            .map(|((id, amount), delegate)| (*id, *amount, *delegate))
            .collect();
        slots.sort();

        LedgerSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            generation: self.generation,
            base_uri: base_uri.to_string(),
            records,
            holders,
            operators,
            slots,
        }
    }

    /// Rebuild a ledger from `snapshot` under `policy`.
    ///
    /// Rejects snapshots with duplicate holders, self-approvals, or state
    /// that breaks burn flags or holder set integrity. Ownership tags and
    /// holder coverage are not enforced here.
    pub fn from_snapshot(
        snapshot: &LedgerSnapshot,
        policy: ProtocolPolicy,
    ) -> Result<Self, SnapshotError> {
        let mut ledger = Self::with_policy(policy);

        for (id, holder, record) in &snapshot.records {
            ledger.balances.put((*id, *holder), *record);
        }

        for (id, members) in &snapshot.holders {
            for holder in members {
                if ledger.holders.contains(*id, *holder) {
                    return Err(SnapshotError::Corrupted(format!(
                        "holder {holder} listed twice for token {id}"
                    )));
                }
                ledger.holders.add(*id, *holder);
            }
        }

        for (owner, operator) in &snapshot.operators {
            ledger
                .approvals
                .set_operator_approval(*owner, *operator, true)
                .map_err(|e| SnapshotError::Corrupted(e.to_string()))?;
        }

        for (id, amount, delegate) in &snapshot.slots {
            ledger.approvals.set_slot(*id, *amount, *delegate);
        }

        let audit = check_all_invariants(&ledger);
        if let Some(violation) = audit.violations().iter().find(|v| v.is_structural()) {
            return Err(SnapshotError::Corrupted(violation.to_string()));
        }

        ledger.generation = snapshot.generation;
        Ok(ledger)
    }
}
