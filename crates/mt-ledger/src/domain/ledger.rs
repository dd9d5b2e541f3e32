//! # Token Ledger
//!
//! Owned store of all ledger tables. The protocol (see `protocol.rs`) is the
//! only writer of balances and holder sets; this file holds construction,
//! the approval operations and the read-only view layer.

use crate::domain::approvals::ApprovalRegistry;
use crate::domain::balances::BalanceStore;
use crate::domain::entities::{BalanceRecord, CreditTarget};
use crate::domain::holders::HolderIndex;
use crate::domain::value_objects::{Address, TokenId, U256};
use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use tracing::debug;

/// Protocol knobs taken from `LedgerConfig`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProtocolPolicy {
    /// Slot credited by single-item transfers.
    pub credit_target: CreditTarget,
    /// Maximum batch length, 0 for none.
    pub max_batch_size: usize,
}

/// Balance store, holder index and approval tables of one ledger.
#[derive(Clone, Debug, Default)]
pub struct TokenLedger {
    pub(crate) balances: BalanceStore,
    pub(crate) holders: HolderIndex,
    pub(crate) approvals: ApprovalRegistry,
    pub(crate) policy: ProtocolPolicy,
    pub(crate) generation: u64,
}

impl TokenLedger {
    /// Create an empty ledger with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger with `policy`.
    #[must_use]
    pub fn with_policy(policy: ProtocolPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Active protocol policy.
    #[must_use]
    pub fn policy(&self) -> ProtocolPolicy {
        self.policy
    }

    /// Number of committed mutations so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    // =========================================================================
    // APPROVALS
    // =========================================================================

    /// Grant or revoke `operator`'s rights over `owner`'s holdings.
    pub fn set_operator_approval(
        &mut self,
        owner: Address,
        operator: Address,
        approved: bool,
    ) -> Result<LedgerEvent, LedgerError> {
        self.approvals
            .set_operator_approval(owner, operator, approved)?;
        self.bump_generation();
        debug!(owner = %owner, operator = %operator, approved, "operator approval set");

        Ok(LedgerEvent::ApprovalForAll {
            owner,
            operator,
            approved,
        })
    }

    /// Record `delegate` in the (id, amount) slot on behalf of `caller`.
    ///
    /// The caller must be a registered holder of `id` with at least `amount`.
    /// The slot is advisory and grants no transfer rights.
    pub fn approve_amount(
        &mut self,
        caller: Address,
        delegate: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<LedgerEvent, LedgerError> {
        if !self.holders.contains(id, caller) {
            return Err(LedgerError::NotOwner { caller, id });
        }
        let available = self.balances.read(id, caller);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                id,
                required: amount,
                available,
            });
        }

        self.approvals.set_slot(id, amount, delegate);
        self.bump_generation();
        debug!(%id, owner = %caller, delegate = %delegate, %amount, "amount slot written");

        Ok(LedgerEvent::Approval {
            owner: caller,
            delegate,
            id,
            amount,
        })
    }

    /// Returns true if `operator` may act for `owner`.
    #[must_use]
    pub fn is_operator_approved(&self, owner: Address, operator: Address) -> bool {
        self.approvals.is_operator_approved(owner, operator)
    }

    /// Delegate stored in the (id, amount) slot.
    #[must_use]
    pub fn approval_slot(&self, id: TokenId, amount: U256) -> Option<Address> {
        self.approvals.slot(id, amount)
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Amount of `id` held by `account`.
    #[must_use]
    pub fn balance_of(&self, account: Address, id: TokenId) -> U256 {
        self.balances.read(id, account)
    }

    /// Balances for each (account, id) pair.
    pub fn balance_of_batch(
        &self,
        accounts: &[Address],
        ids: &[TokenId],
    ) -> Result<Vec<U256>, LedgerError> {
        if accounts.len() != ids.len() {
            return Err(LedgerError::LengthMismatch {
                left_name: "accounts",
                left: accounts.len(),
                right_name: "identifiers",
                right: ids.len(),
            });
        }
        Ok(accounts
            .iter()
            .zip(ids)
            .map(|(account, id)| self.balances.read(*id, *account))
            .collect())
    }

    /// Registered holders of `id`.
    #[must_use]
    pub fn holders(&self, id: TokenId) -> &[Address] {
        self.holders.members(id)
    }

    /// Returns true if `account` is a registered holder of `id`.
    #[must_use]
    pub fn is_holder(&self, id: TokenId, account: Address) -> bool {
        self.holders.contains(id, account)
    }

    /// Raw balance record, including the burned flag.
    #[must_use]
    pub fn record(&self, id: TokenId, account: Address) -> Option<BalanceRecord> {
        self.balances.record(id, account).copied()
    }

    /// Read access to the balance store.
    #[must_use]
    pub fn balances(&self) -> &BalanceStore {
        &self.balances
    }

    /// Read access to the holder index.
    #[must_use]
    pub fn holder_index(&self) -> &HolderIndex {
        &self.holders
    }

    /// Read access to the approval tables.
    #[must_use]
    pub fn approvals(&self) -> &ApprovalRegistry {
        &self.approvals
    }
}
