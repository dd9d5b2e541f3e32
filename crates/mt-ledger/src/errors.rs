//! # Error Types
//!
//! All error types for the multi-token ledger.
//!
//! Every [`LedgerError`] is a precondition failure detected before any
//! mutation is committed: the operation that returns it leaves the ledger
//! exactly as it found it.

use crate::domain::value_objects::{Address, TokenId, U256};
use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors returned by ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The null address was supplied where a real account is required.
    #[error("zero address is not a valid {role}")]
    ZeroAddress {
        /// Which argument was null.
        role: &'static str,
    },

    /// A mutation was requested for an amount of zero.
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// Paired sequences differ in length.
    #[error("length mismatch: {left} {left_name} vs {right} {right_name}")]
    LengthMismatch {
        /// Name of the first sequence.
        left_name: &'static str,
        /// Length of the first sequence.
        left: usize,
        /// Name of the second sequence.
        right_name: &'static str,
        /// Length of the second sequence.
        right: usize,
    },

    /// Caller is neither the owner nor an approved operator of the owner.
    #[error("caller {caller:?} is not authorized to act for {owner:?}")]
    NotAuthorized {
        /// Account that made the call.
        caller: Address,
        /// Account whose holdings were targeted.
        owner: Address,
    },

    /// Caller does not hold the identifier it tried to approve.
    #[error("caller {caller:?} does not hold token {id}")]
    NotOwner {
        /// Account that made the call.
        caller: Address,
        /// Identifier it does not hold.
        id: TokenId,
    },

    /// Balance is below the requested amount.
    #[error("insufficient balance for token {id}: required {required}, available {available}")]
    InsufficientBalance {
        /// Identifier debited.
        id: TokenId,
        /// Amount requested.
        required: U256,
        /// Amount held.
        available: U256,
    },

    /// Balance record was already driven to zero.
    #[error("balance of {holder:?} for token {id} is already burned")]
    AlreadyBurned {
        /// Identifier of the record.
        id: TokenId,
        /// Holder the record is stored under.
        holder: Address,
    },

    /// Balance record is tagged with a different holder than its key.
    #[error("balance record for token {id} belongs to {recorded:?}, not {expected:?}")]
    UnrecognizedOwnership {
        /// Identifier of the record.
        id: TokenId,
        /// Holder the record is stored under.
        expected: Address,
        /// Holder the record is tagged with.
        recorded: Address,
    },

    /// An owner tried to make itself its own operator.
    #[error("owner {0:?} cannot approve itself as operator")]
    SelfApproval(Address),

    /// Index removal requested for a holder that is not registered.
    #[error("{holder:?} is not a registered holder of token {id}")]
    NotAMember {
        /// Identifier whose index was touched.
        id: TokenId,
        /// Account that is not registered.
        holder: Address,
    },

    /// The pre-transfer hook refused the operation.
    #[error("pre-transfer hook rejected operation: {0}")]
    HookRejected(String),

    /// A ledger operation was invoked while another was still running.
    #[error("ledger operation already in progress")]
    Reentrancy,

    /// A prepared operation was committed after the ledger changed under it.
    #[error("prepared operation is stale: ledger moved from generation {prepared} to {current}")]
    StaleOperation {
        /// Generation the operation was prepared against.
        prepared: u64,
        /// Generation at commit time.
        current: u64,
    },

    /// Batch exceeds the configured maximum.
    #[error("batch of {size} entries exceeds limit of {max}")]
    BatchTooLarge {
        /// Entries supplied.
        size: usize,
        /// Configured limit.
        max: usize,
    },

    /// Caller is not the configured administrator.
    #[error("caller {0:?} is not the ledger administrator")]
    NotAdmin(Address),

    /// Snapshot persistence failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl LedgerError {
    /// Returns true for failures caused by missing rights rather than bad input.
    #[must_use]
    pub fn is_authorization_error(&self) -> bool {
        matches!(
            self,
            Self::NotAuthorized { .. } | Self::NotOwner { .. } | Self::NotAdmin(_)
        )
    }

    /// Returns true for failures raised by the balance store.
    #[must_use]
    pub fn is_balance_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. }
                | Self::AlreadyBurned { .. }
                | Self::UnrecognizedOwnership { .. }
        )
    }

    /// Shorthand for a [`LedgerError::LengthMismatch`] between identifiers and amounts.
    #[must_use]
    pub fn ids_amounts_mismatch(ids: usize, amounts: usize) -> Self {
        Self::LengthMismatch {
            left_name: "identifiers",
            left: ids,
            right_name: "amounts",
            right: amounts,
        }
    }
}

// =============================================================================
// SNAPSHOT ERRORS
// =============================================================================

/// Errors from the snapshot persistence port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// No snapshot has been saved yet.
    #[error("no snapshot available")]
    NotFound,

    /// Encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Snapshot decoded but its contents violate ledger invariants.
    #[error("snapshot is corrupted: {0}")]
    Corrupted(String),

    /// Lock guarding the store was poisoned.
    #[error("snapshot store lock poisoned")]
    LockPoisoned,
}

impl From<bincode::Error> for SnapshotError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Errors from configuration parsing and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value could not be parsed.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Raw value supplied.
        value: String,
    },

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// TESTS
// =============================================================================
