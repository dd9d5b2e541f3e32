//! # Ledger Invariants
//!
//! Auditing of the relations that must hold between the ledger tables after
//! every completed operation:
//!
//! - Burn flag: a record's amount is zero exactly when it is marked burned.
//! - Holder set integrity: every registered holder appears once in the
//!   backing sequence, at the position the index recorded for it.
//! - Holder coverage: an account is registered for an identifier exactly
//!   when its balance of that identifier is positive.
//! - Ownership tags: a record's tag names the account it is keyed under.
//!
//! Holder coverage is reported but not structural. The `Operator` credit
//! target diverges from it by construction, and tag mismatches can only come
//! from restored snapshots, where debits refuse to touch them.

use crate::domain::ledger::TokenLedger;
use crate::domain::value_objects::{Address, TokenId, U256};
use std::fmt;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Records whose burn flag disagrees with their amount.
#[must_use]
pub fn check_burn_flags(ledger: &TokenLedger) -> Vec<InvariantViolation> {
    ledger
        .balances()
        .iter()
        .filter(|(_, record)| !record.is_consistent())
        .map(|((id, holder), record)| InvariantViolation::BurnFlagMismatch {
            id: *id,
            holder: *holder,
            amount: record.amount,
            burned: record.burned,
        })
        .collect()
}

/// Holder sets whose sequence and position map disagree.
#[must_use]
pub fn check_holder_sets(ledger: &TokenLedger) -> Vec<InvariantViolation> {
    ledger
        .holder_index()
        .iter()
        .filter(|(_, set)| !set.is_consistent())
        .map(|(id, _)| InvariantViolation::HolderSetCorrupted { id: *id })
        .collect()
}

/// Registrations without a positive balance and positive balances without
/// a registration.
#[must_use]
pub fn check_holder_coverage(ledger: &TokenLedger) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (id, set) in ledger.holder_index().iter() {
        for holder in set.members() {
            if ledger.balance_of(*holder, *id).is_zero() {
                violations.push(InvariantViolation::HolderWithoutBalance {
                    id: *id,
                    holder: *holder,
                });
            }
        }
    }

    for ((id, holder), record) in ledger.balances().iter() {
        if !record.amount.is_zero() && !ledger.is_holder(*id, *holder) {
            violations.push(InvariantViolation::BalanceWithoutHolder {
                id: *id,
                holder: *holder,
                amount: record.amount,
            });
        }
    }

    violations
}

/// Records tagged with an account other than their key.
#[must_use]
pub fn check_ownership_tags(ledger: &TokenLedger) -> Vec<InvariantViolation> {
    ledger
        .balances()
        .iter()
        .filter(|((_, holder), record)| record.addr != *holder)
        .map(|((id, holder), record)| InvariantViolation::ForeignRecord {
            id: *id,
            holder: *holder,
            recorded: record.addr,
        })
        .collect()
}

/// Check all invariants at once.
///
/// Violations are sorted so repeated audits of the same state compare equal.
#[must_use]
pub fn check_all_invariants(ledger: &TokenLedger) -> InvariantCheckResult {
    let mut violations = check_burn_flags(ledger);
    violations.extend(check_holder_sets(ledger));
    violations.extend(check_holder_coverage(ledger));
    violations.extend(check_ownership_tags(ledger));
    violations.sort();

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of an audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Violations found, empty when valid.
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(violations) => violations,
        }
    }

    /// Returns true if any violation breaks the burn flag or holder set
    /// integrity.
    #[must_use]
    pub fn is_structurally_broken(&self) -> bool {
        self.violations().iter().any(InvariantViolation::is_structural)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum InvariantViolation {
    /// Amount and burned flag disagree.
    BurnFlagMismatch {
        /// Identifier of the record.
        id: TokenId,
        /// Holder the record is stored under.
        holder: Address,
        /// Recorded amount.
        amount: U256,
        /// Recorded flag.
        burned: bool,
    },
    /// Holder sequence and position map disagree.
    HolderSetCorrupted {
        /// Identifier whose index is broken.
        id: TokenId,
    },
    /// Registered holder with a zero balance.
    HolderWithoutBalance {
        /// Identifier of the index.
        id: TokenId,
        /// Registered holder.
        holder: Address,
    },
    /// Positive balance whose holder is not registered.
    BalanceWithoutHolder {
        /// Identifier of the record.
        id: TokenId,
        /// Unregistered holder.
        holder: Address,
        /// Amount held.
        amount: U256,
    },
    /// Record keyed under one account but tagged with another.
    ForeignRecord {
        /// Identifier of the record.
        id: TokenId,
        /// Holder the record is stored under.
        holder: Address,
        /// Holder the record is tagged with.
        recorded: Address,
    },
}

impl InvariantViolation {
    /// Returns true for violations no sequence of valid operations can
    /// produce.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::BurnFlagMismatch { .. } | Self::HolderSetCorrupted { .. }
        )
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BurnFlagMismatch {
                id,
                holder,
                amount,
                burned,
            } => write!(
                f,
                "token {id} held by {holder}: amount {amount} with burned={burned}"
            ),
            Self::HolderSetCorrupted { id } => {
                write!(f, "holder set of token {id} is inconsistent")
            }
            Self::HolderWithoutBalance { id, holder } => {
                write!(f, "{holder} is registered for token {id} with zero balance")
            }
            Self::BalanceWithoutHolder { id, holder, amount } => {
                write!(f, "{holder} holds {amount} of token {id} but is not registered")
            }
            Self::ForeignRecord {
                id,
                holder,
                recorded,
            } => write!(f, "record of token {id} under {holder} is tagged {recorded}"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
