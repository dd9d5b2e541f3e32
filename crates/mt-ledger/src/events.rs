//! # Notification Schema
//!
//! Events the ledger hands to its notification sink after an operation
//! commits. Delivery is fire-and-forget: the sink cannot fail an operation.
//!
//! | Event | Emitted by |
//! |-------|-----------|
//! | `TransferSingle` | `mint`, `transfer`, `burn` |
//! | `TransferBatch` | `mint_batch`, `transfer_batch`, `burn_batch` |
//! | `ApprovalForAll` | `set_operator_approval` |
//! | `Approval` | `approve_amount` |
//! | `Uri` | `set_metadata_uri` |

use crate::domain::value_objects::{Address, TokenId, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// LEDGER EVENTS
// =============================================================================

/// A committed state change, as seen by external observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// One identifier moved. `from` is null for mints, `to` is null for burns.
    TransferSingle {
        /// Caller that performed the operation.
        operator: Address,
        /// Source account.
        from: Address,
        /// Destination account.
        to: Address,
        /// Identifier moved.
        id: TokenId,
        /// Amount moved.
        value: U256,
    },
    /// Several identifiers moved in one call.
    TransferBatch {
        /// Caller that performed the operation.
        operator: Address,
        /// Source account.
        from: Address,
        /// Destination account.
        to: Address,
        /// Identifiers moved.
        ids: Vec<TokenId>,
        /// Amounts paired with `ids`.
        values: Vec<U256>,
    },
    /// Operator approval granted or revoked.
    ApprovalForAll {
        /// Account whose holdings are affected.
        owner: Address,
        /// Account gaining or losing rights.
        operator: Address,
        /// New approval state.
        approved: bool,
    },
    /// Amount slot written.
    Approval {
        /// Holder that wrote the slot.
        owner: Address,
        /// Delegate recorded in the slot.
        delegate: Address,
        /// Identifier of the slot.
        id: TokenId,
        /// Amount of the slot.
        amount: U256,
    },
    /// Metadata URI changed.
    Uri {
        /// New URI.
        value: String,
        /// Identifier the URI applies to, `None` for the shared base URI.
        id: Option<TokenId>,
    },
}

impl LedgerEvent {
    /// Bus topic this event is published under.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::TransferSingle { .. } | Self::TransferBatch { .. } => topics::TRANSFERS,
            Self::ApprovalForAll { .. } | Self::Approval { .. } => topics::APPROVALS,
            Self::Uri { .. } => topics::METADATA,
        }
    }

    /// Returns true if `account` appears in the event.
    #[must_use]
    pub fn involves(&self, account: Address) -> bool {
        match self {
            Self::TransferSingle {
                operator, from, to, ..
            }
            | Self::TransferBatch {
                operator, from, to, ..
            } => [*operator, *from, *to].contains(&account),
            Self::ApprovalForAll {
                owner, operator, ..
            } => *owner == account || *operator == account,
            Self::Approval {
                owner, delegate, ..
            } => *owner == account || *delegate == account,
            Self::Uri { .. } => false,
        }
    }
}

/// An event stamped with delivery metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEventRecord {
    /// Monotonic sequence number across all events of one ledger.
    pub sequence: u64,
    /// Identifier shared by all events of one operation.
    pub operation_id: Uuid,
    /// The event itself.
    pub event: LedgerEvent,
}

// =============================================================================
// EVENT BUS TOPICS
// =============================================================================

/// Topics for ledger notifications.
pub mod topics {
    /// Mints, transfers and burns.
    pub const TRANSFERS: &str = "token_ledger.transfers";

    /// Operator approvals and amount slots.
    pub const APPROVALS: &str = "token_ledger.approvals";

    /// Metadata URI changes.
    pub const METADATA: &str = "token_ledger.metadata";
}

// =============================================================================
// TESTS
// =============================================================================
