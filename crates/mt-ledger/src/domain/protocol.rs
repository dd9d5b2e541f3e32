//! # Mint / Transfer / Burn Protocol
//!
//! Every balance-affecting operation runs in two phases:
//!
//! 1. **prepare**: argument checks, authorization, then every balance and
//!    index step against a [`StagedLedger`] overlay. Nothing is written.
//! 2. **commit**: the validated [`Changeset`] is applied in one go.
//!
//! Between the two phases the caller runs the pre-transfer hook on
//! [`PreparedOperation::context`]. A failure in either phase, or a hook
//! rejection, leaves the ledger untouched.
//!
//! ## Index maintenance
//!
//! | Step | Holder index effect |
//! |------|---------------------|
//! | debit reaching zero | remove the debited holder |
//! | credit via mint / batch transfer | register the recipient |
//! | single transfer | register the recipient, credit per `CreditTarget` |

use crate::domain::entities::{CreditTarget, OperationKind, TransferContext};
use crate::domain::ledger::TokenLedger;
use crate::domain::staging::{Changeset, StagedLedger};
use crate::domain::value_objects::{Address, Bytes, TokenId, U256};
use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use tracing::debug;

/// A fully validated operation awaiting commit.
#[derive(Clone, Debug)]
pub struct PreparedOperation {
    context: TransferContext,
    changes: Changeset,
    event: LedgerEvent,
    generation: u64,
}

impl PreparedOperation {
    /// Arguments for the pre-transfer hook.
    #[must_use]
    pub fn context(&self) -> &TransferContext {
        &self.context
    }

    /// Operation kind.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.context.kind
    }

    /// Event that will be emitted on commit.
    #[must_use]
    pub fn event(&self) -> &LedgerEvent {
        &self.event
    }

    /// Staged mutations.
    #[must_use]
    pub fn changes(&self) -> &Changeset {
        &self.changes
    }
}

impl TokenLedger {
    // =========================================================================
    // MINT
    // =========================================================================

    /// Prepare a mint of `amount` of `id` to `to`.
    pub fn prepare_mint(
        &self,
        caller: Address,
        to: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<PreparedOperation, LedgerError> {
        require_account(to, "recipient")?;
        require_amount(amount)?;

        let mut stage = StagedLedger::new(&self.balances, &self.holders);
        stage.credit(id, to, amount);
        stage.add_holder(id, to);

        Ok(self.prepared(
            TransferContext {
                kind: OperationKind::Mint,
                operator: caller,
                from: Address::ZERO,
                to,
                ids: vec![id],
                amounts: vec![amount],
                data: Bytes::new(),
            },
            stage.finish(),
        ))
    }

    /// Prepare a batched mint to `to`.
    pub fn prepare_mint_batch(
        &self,
        caller: Address,
        to: Address,
        ids: &[TokenId],
        amounts: &[U256],
    ) -> Result<PreparedOperation, LedgerError> {
        self.require_batch(ids, amounts)?;
        require_account(to, "recipient")?;
        amounts.iter().copied().try_for_each(require_amount)?;

        let mut stage = StagedLedger::new(&self.balances, &self.holders);
        for (id, amount) in ids.iter().zip(amounts) {
            stage.credit(*id, to, *amount);
            stage.add_holder(*id, to);
        }

        Ok(self.prepared(
            TransferContext {
                kind: OperationKind::MintBatch,
                operator: caller,
                from: Address::ZERO,
                to,
                ids: ids.to_vec(),
                amounts: amounts.to_vec(),
                data: Bytes::new(),
            },
            stage.finish(),
        ))
    }

    // =========================================================================
    // TRANSFER
    // =========================================================================

    /// Prepare a transfer of `amount` of `id` from `from` to `to`.
    ///
    /// The credited slot follows the ledger's [`CreditTarget`].
    pub fn prepare_transfer(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        id: TokenId,
        amount: U256,
        data: Bytes,
    ) -> Result<PreparedOperation, LedgerError> {
        self.require_authorized(caller, from)?;
        require_account(to, "recipient")?;
        require_amount(amount)?;

        let mut stage = StagedLedger::new(&self.balances, &self.holders);
        debit_and_unregister(&mut stage, id, from, amount)?;
        stage.add_holder(id, to);
        let credited = match self.policy.credit_target {
            CreditTarget::Recipient => to,
            CreditTarget::Operator => caller,
        };
        stage.credit(id, credited, amount);

        Ok(self.prepared(
            TransferContext {
                kind: OperationKind::Transfer,
                operator: caller,
                from,
                to,
                ids: vec![id],
                amounts: vec![amount],
                data,
            },
            stage.finish(),
        ))
    }

    /// Prepare a batched transfer from `from` to `to`.
    pub fn prepare_transfer_batch(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        ids: &[TokenId],
        amounts: &[U256],
        data: Bytes,
    ) -> Result<PreparedOperation, LedgerError> {
        self.require_batch(ids, amounts)?;
        self.require_authorized(caller, from)?;
        require_account(to, "recipient")?;
        amounts.iter().copied().try_for_each(require_amount)?;

        let mut stage = StagedLedger::new(&self.balances, &self.holders);
        for (id, amount) in ids.iter().zip(amounts) {
            debit_and_unregister(&mut stage, *id, from, *amount)?;
            stage.credit(*id, to, *amount);
            stage.add_holder(*id, to);
        }

        Ok(self.prepared(
            TransferContext {
                kind: OperationKind::TransferBatch,
                operator: caller,
                from,
                to,
                ids: ids.to_vec(),
                amounts: amounts.to_vec(),
                data,
            },
            stage.finish(),
        ))
    }

    // =========================================================================
    // BURN
    // =========================================================================

    /// Prepare a burn of `amount` of `id` held by `from`.
    pub fn prepare_burn(
        &self,
        caller: Address,
        from: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<PreparedOperation, LedgerError> {
        require_account(from, "burn source")?;
        self.require_authorized(caller, from)?;
        require_amount(amount)?;

        let mut stage = StagedLedger::new(&self.balances, &self.holders);
        require_balance(&stage, id, from, amount)?;
        debit_and_unregister(&mut stage, id, from, amount)?;

        Ok(self.prepared(
            TransferContext {
                kind: OperationKind::Burn,
                operator: caller,
                from,
                to: Address::ZERO,
                ids: vec![id],
                amounts: vec![amount],
                data: Bytes::new(),
            },
            stage.finish(),
        ))
    }

    /// Prepare a batched burn from `from`.
    pub fn prepare_burn_batch(
        &self,
        caller: Address,
        from: Address,
        ids: &[TokenId],
        amounts: &[U256],
    ) -> Result<PreparedOperation, LedgerError> {
        self.require_batch(ids, amounts)?;
        require_account(from, "burn source")?;
        self.require_authorized(caller, from)?;
        amounts.iter().copied().try_for_each(require_amount)?;

        let mut stage = StagedLedger::new(&self.balances, &self.holders);
        for (id, amount) in ids.iter().zip(amounts) {
            require_balance(&stage, *id, from, *amount)?;
            debit_and_unregister(&mut stage, *id, from, *amount)?;
        }

        Ok(self.prepared(
            TransferContext {
                kind: OperationKind::BurnBatch,
                operator: caller,
                from,
                to: Address::ZERO,
                ids: ids.to_vec(),
                amounts: amounts.to_vec(),
                data: Bytes::new(),
            },
            stage.finish(),
        ))
    }

    // =========================================================================
    // COMMIT
    // =========================================================================

    /// Apply a prepared operation and return its event.
    ///
    /// Fails with [`LedgerError::StaleOperation`] if anything was committed
    /// since the operation was prepared.
    pub fn commit(&mut self, op: PreparedOperation) -> Result<LedgerEvent, LedgerError> {
        if op.generation != self.generation {
            return Err(LedgerError::StaleOperation {
                prepared: op.generation,
                current: self.generation,
            });
        }

        debug!(
            kind = %op.context.kind,
            records = op.changes.record_count(),
            index_changes = op.changes.membership().len(),
            "committing operation"
        );
        op.changes.apply(&mut self.balances, &mut self.holders);
        self.bump_generation();
        Ok(op.event)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn prepared(&self, context: TransferContext, changes: Changeset) -> PreparedOperation {
        let event = transfer_event(&context);
        PreparedOperation {
            context,
            changes,
            event,
            generation: self.generation,
        }
    }

    fn require_authorized(&self, caller: Address, owner: Address) -> Result<(), LedgerError> {
        if self.approvals.may_act_for(owner, caller) {
            Ok(())
        } else {
            Err(LedgerError::NotAuthorized { caller, owner })
        }
    }

    fn require_batch(&self, ids: &[TokenId], amounts: &[U256]) -> Result<(), LedgerError> {
        if ids.len() != amounts.len() {
            return Err(LedgerError::ids_amounts_mismatch(ids.len(), amounts.len()));
        }
        let max = self.policy.max_batch_size;
        if max > 0 && ids.len() > max {
            return Err(LedgerError::BatchTooLarge {
                size: ids.len(),
                max,
            });
        }
        Ok(())
    }
}

fn require_account(account: Address, role: &'static str) -> Result<(), LedgerError> {
    if account.is_zero() {
        Err(LedgerError::ZeroAddress { role })
    } else {
        Ok(())
    }
}

fn require_amount(amount: U256) -> Result<(), LedgerError> {
    if amount.is_zero() {
        Err(LedgerError::ZeroAmount)
    } else {
        Ok(())
    }
}

/// Debit `holder` and drop it from the index once its balance reaches zero.
/// Burns judge the holder by balance alone, so a burned record reads as an
/// empty one rather than `AlreadyBurned`.
fn require_balance(
    stage: &StagedLedger<'_>,
    id: TokenId,
    holder: Address,
    amount: U256,
) -> Result<(), LedgerError> {
    let available = stage.read(id, holder);
    if available < amount {
        return Err(LedgerError::InsufficientBalance {
            id,
            required: amount,
            available,
        });
    }
    Ok(())
}

fn debit_and_unregister(
    stage: &mut StagedLedger<'_>,
    id: TokenId,
    holder: Address,
    amount: U256,
) -> Result<(), LedgerError> {
    let remaining = stage.debit(id, holder, amount)?;
    if remaining.amount.is_zero() {
        stage.remove_holder(id, holder)?;
    }
    Ok(())
}

fn transfer_event(context: &TransferContext) -> LedgerEvent {
    if context.kind.is_batch() {
        LedgerEvent::TransferBatch {
            operator: context.operator,
            from: context.from,
            to: context.to,
            ids: context.ids.clone(),
            values: context.amounts.clone(),
        }
    } else {
        LedgerEvent::TransferSingle {
            operator: context.operator,
            from: context.from,
            to: context.to,
            id: context.ids[0],
            value: context.amounts[0],
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
