//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the ledger depends on. Adapters implement these traits to
//! provide:
//! - the authenticated caller of each operation
//! - delivery of notifications to external observers
//! - a policy hook run before every balance-affecting operation
//! - the metadata URI
//! - durable storage of ledger snapshots
//!
//! None of these traits hands out access to the ledger tables, so an
//! implementation cannot mutate balances behind the protocol's back.

use crate::domain::entities::TransferContext;
use crate::domain::value_objects::{Address, TokenId};
use crate::errors::{LedgerError, SnapshotError};
use crate::events::LedgerEventRecord;

// =============================================================================
// CALLER IDENTITY
// =============================================================================

/// Supplies the authenticated caller of an operation.
///
/// The ledger never trusts a caller-supplied `from` without checking it
/// against this identity or against operator approval.
pub trait CallerIdentity {
    /// Address of the account on whose authority the call runs.
    fn caller(&self) -> Address;
}

impl CallerIdentity for Address {
    fn caller(&self) -> Address {
        *self
    }
}

// =============================================================================
// NOTIFICATION SINK
// =============================================================================

/// Receives committed events.
///
/// Infallible by signature: a sink that cannot deliver must deal with it
/// internally (log, buffer, drop).
pub trait EventSink: Send + Sync {
    /// Deliver one event.
    fn publish(&self, record: &LedgerEventRecord);
}

// =============================================================================
// PRE-TRANSFER HOOK
// =============================================================================

/// Policy callback invoked once per mint, transfer or burn call (batch calls
/// included) after argument and authorization checks and before any
/// mutation is committed.
///
/// Returning an error aborts the operation with no state change.
pub trait TransferHook: Send + Sync {
    /// Inspect the operation about to run.
    fn before_transfer(&self, context: &TransferContext) -> Result<(), LedgerError>;
}

/// Hook that accepts everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHook;

impl TransferHook for NoopHook {
    fn before_transfer(&self, _context: &TransferContext) -> Result<(), LedgerError> {
        Ok(())
    }
}

// =============================================================================
// METADATA PROVIDER
// =============================================================================

/// Holds the metadata URI.
pub trait MetadataProvider: Send + Sync {
    /// URI for `id`.
    fn uri(&self, id: TokenId) -> String;

    /// Replace the base URI.
    fn set_base_uri(&mut self, uri: String);
}

// =============================================================================
// SNAPSHOT STORE
// =============================================================================

/// Durable storage for encoded ledger snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Persist `bytes` as the latest snapshot.
    fn save(&self, bytes: Vec<u8>) -> Result<(), SnapshotError>;

    /// Load the latest snapshot.
    fn load(&self) -> Result<Vec<u8>, SnapshotError>;
}
