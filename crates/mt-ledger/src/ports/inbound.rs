//! # Driving Ports (API - Inbound)
//!
//! The public surface of the ledger. Mutating operations take the caller as
//! a [`CallerIdentity`] so that adapters can plug in whatever authentication
//! the host provides.

use crate::domain::entities::BalanceRecord;
use crate::domain::value_objects::{Address, Bytes, TokenId, U256};
use crate::errors::LedgerError;
use crate::ports::outbound::CallerIdentity;

/// Multi-token ledger API.
pub trait MultiTokenApi {
    // -------------------------------------------------------------------------
    // Protocol
    // -------------------------------------------------------------------------

    /// Create `amount` of `id` in `to`'s balance (overwriting it).
    fn mint(
        &self,
        caller: &dyn CallerIdentity,
        to: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Batched [`MultiTokenApi::mint`].
    fn mint_batch(
        &self,
        caller: &dyn CallerIdentity,
        to: Address,
        ids: &[TokenId],
        amounts: &[U256],
    ) -> Result<(), LedgerError>;

    /// Move `amount` of `id` from `from` to `to`.
    fn transfer(
        &self,
        caller: &dyn CallerIdentity,
        from: Address,
        to: Address,
        id: TokenId,
        amount: U256,
        data: Bytes,
    ) -> Result<(), LedgerError>;

    /// Batched [`MultiTokenApi::transfer`].
    fn transfer_batch(
        &self,
        caller: &dyn CallerIdentity,
        from: Address,
        to: Address,
        ids: &[TokenId],
        amounts: &[U256],
        data: Bytes,
    ) -> Result<(), LedgerError>;

    /// Destroy `amount` of `id` held by `from`.
    fn burn(
        &self,
        caller: &dyn CallerIdentity,
        from: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<(), LedgerError>;

    /// Batched [`MultiTokenApi::burn`].
    fn burn_batch(
        &self,
        caller: &dyn CallerIdentity,
        from: Address,
        ids: &[TokenId],
        amounts: &[U256],
    ) -> Result<(), LedgerError>;

    // -------------------------------------------------------------------------
    // Approvals
    // -------------------------------------------------------------------------

    /// Grant or revoke blanket rights of `operator` over the caller's holdings.
    fn set_operator_approval(
        &self,
        caller: &dyn CallerIdentity,
        operator: Address,
        approved: bool,
    ) -> Result<(), LedgerError>;

    /// Record `delegate` in the advisory (id, amount) slot.
    fn approve_amount(
        &self,
        caller: &dyn CallerIdentity,
        delegate: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<(), LedgerError>;

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    /// Amount of `id` held by `account`.
    fn balance_of(&self, account: Address, id: TokenId) -> U256;

    /// Balances for each (account, id) pair.
    fn balance_of_batch(
        &self,
        accounts: &[Address],
        ids: &[TokenId],
    ) -> Result<Vec<U256>, LedgerError>;

    /// Registered holders of `id`.
    fn holders(&self, id: TokenId) -> Vec<Address>;

    /// Raw balance record.
    fn record(&self, id: TokenId, account: Address) -> Option<BalanceRecord>;

    /// Metadata URI for `id`.
    fn metadata_uri(&self, id: TokenId) -> String;

    /// Returns true if `operator` may act for `owner`.
    fn is_operator_approved(&self, owner: Address, operator: Address) -> bool;

    /// Delegate stored in the (id, amount) slot.
    fn approval_slot(&self, id: TokenId, amount: U256) -> Option<Address>;
}
