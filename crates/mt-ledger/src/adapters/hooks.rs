//! Pre-transfer hook implementations.

use crate::domain::entities::TransferContext;
use crate::domain::value_objects::Address;
use crate::errors::LedgerError;
use crate::ports::outbound::TransferHook;
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;

/// Rejects any operation whose source or destination is on a deny list.
#[derive(Default)]
pub struct DenyListHook {
    denied: RwLock<HashSet<Address>>,
}

impl DenyListHook {
    /// Create a hook with an empty deny list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block `account` from sending and receiving.
    pub fn deny(&self, account: Address) {
        self.denied.write().insert(account);
    }

    /// Lift a block. Returns false if `account` was not denied.
    pub fn allow(&self, account: Address) -> bool {
        self.denied.write().remove(&account)
    }

    /// Returns true if `account` is currently blocked.
    pub fn is_denied(&self, account: &Address) -> bool {
        self.denied.read().contains(account)
    }
}

impl TransferHook for DenyListHook {
    fn before_transfer(&self, context: &TransferContext) -> Result<(), LedgerError> {
        let denied = self.denied.read();
        for account in [context.from, context.to] {
            if denied.contains(&account) {
                return Err(LedgerError::HookRejected(format!(
                    "{} involves denied account {account}",
                    context.kind
                )));
            }
        }
        Ok(())
    }
}

/// Accepts everything and keeps a copy of every context it saw.
#[derive(Default)]
pub struct RecordingHook {
    seen: Mutex<Vec<TransferContext>>,
}

impl RecordingHook {
    /// Create a hook with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contexts in call order.
    pub fn calls(&self) -> Vec<TransferContext> {
        self.seen.lock().clone()
    }

    /// Number of contexts seen.
    pub fn call_count(&self) -> usize {
        self.seen.lock().len()
    }
}

impl TransferHook for RecordingHook {
    fn before_transfer(&self, context: &TransferContext) -> Result<(), LedgerError> {
        self.seen.lock().push(context.clone());
        Ok(())
    }
}
