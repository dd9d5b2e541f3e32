//! Domain Layer - Pure ledger logic
//!
//! This layer contains:
//! - Value objects (addresses, identifiers, payloads)
//! - Balance store, holder index and approval tables
//! - The staged mint / transfer / burn protocol
//! - Invariant auditing and snapshots
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No locking; the service layer owns synchronisation
//! - Nothing is written until a prepared operation is committed

pub mod approvals;
pub mod balances;
pub mod config;
pub mod entities;
pub mod holders;
pub mod invariants;
pub mod ledger;
pub mod protocol;
pub mod snapshot;
pub mod staging;
pub mod value_objects;

pub use approvals::{ApprovalRegistry, SlotKey};
pub use balances::{BalanceKey, BalanceStore};
pub use config::{LedgerConfig, LedgerConfigBuilder, MAX_BATCH_SIZE_LIMIT};
pub use entities::{BalanceRecord, CreditTarget, OperationKind, TransferContext};
pub use holders::{HolderIndex, HolderSet};
pub use invariants::{check_all_invariants, InvariantCheckResult, InvariantViolation};
pub use ledger::{ProtocolPolicy, TokenLedger};
pub use protocol::PreparedOperation;
pub use snapshot::{LedgerSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use staging::{Changeset, MembershipChange, StagedLedger};
pub use value_objects::{Address, Bytes, TokenId, U256};
