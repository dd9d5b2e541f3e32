//! # Approval Subsystem
//!
//! Two independent authorization tables:
//!
//! - **Operator approvals**, keyed by (owner, operator). These gate every
//!   transfer and burn a caller initiates on someone else's holdings.
//! - **Amount slots**, keyed by (identifier, amount) and holding one delegate.
//!   Slots are advisory: they are written by `approve_amount` and exposed for
//!   reads, but the transfer protocol never consults them, so a slot grants
//!   no transfer rights. Slots are not keyed by owner; a later approval for the
//!   same (identifier, amount) replaces the delegate regardless of who set it.

use crate::domain::value_objects::{Address, TokenId, U256};
use crate::errors::LedgerError;
use std::collections::HashMap;

/// Key of an amount slot.
pub type SlotKey = (TokenId, U256);

/// Operator approvals and amount slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApprovalRegistry {
    operators: HashMap<(Address, Address), bool>,
    slots: HashMap<SlotKey, Address>,
}

impl ApprovalRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant or revoke blanket operator rights of `operator` over `owner`.
    pub fn set_operator_approval(
        &mut self,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<(), LedgerError> {
        if owner == operator {
            return Err(LedgerError::SelfApproval(owner));
        }
        self.operators.insert((owner, operator), approved);
        Ok(())
    }

    /// Returns true if `operator` may act for `owner`.
    #[must_use]
    pub fn is_operator_approved(&self, owner: Address, operator: Address) -> bool {
        self.operators
            .get(&(owner, operator))
            .copied()
            .unwrap_or(false)
    }

    /// Returns true if `caller` is `owner` or one of its approved operators.
    #[must_use]
    pub fn may_act_for(&self, owner: Address, caller: Address) -> bool {
        caller == owner || self.is_operator_approved(owner, caller)
    }

    /// Overwrite the slot for `(id, amount)`. Ownership checks are the caller's job.
    pub(crate) fn set_slot(&mut self, id: TokenId, amount: U256, delegate: Address) {
        self.slots.insert((id, amount), delegate);
    }

    /// Delegate recorded for `(id, amount)`, if any.
    #[must_use]
    pub fn slot(&self, id: TokenId, amount: U256) -> Option<Address> {
        self.slots.get(&(id, amount)).copied()
    }

    /// Iterate over operator approvals, revoked entries included.
    pub fn operators(&self) -> impl Iterator<Item = (&(Address, Address), &bool)> {
        self.operators.iter()
    }

    /// Iterate over amount slots.
    pub fn slots(&self) -> impl Iterator<Item = (&SlotKey, &Address)> {
        self.slots.iter()
    }
}
