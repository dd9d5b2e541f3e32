//! # MT Ledger
//!
//! Multi-asset ownership ledger: for any number of token identifiers it
//! tracks how much each account holds, who may move those holdings, and
//! which accounts currently hold a nonzero balance of each identifier.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure state and protocol, no I/O
//!   - `BalanceStore`: per-(identifier, holder) balance records
//!   - `HolderIndex`: per-identifier holder sets with O(1) removal
//!   - `ApprovalRegistry`: operator approvals and advisory amount slots
//!   - `TokenLedger`: staged mint / transfer / burn protocol
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MultiTokenApi`: Driving port (inbound API)
//!   - `CallerIdentity`, `EventSink`, `TransferHook`, `MetadataProvider`,
//!     `SnapshotStore`: Driven ports
//!
//! - **Adapters Layer** (`adapters/`): In-memory and tracing-backed ports
//!
//! - **Service Layer** (`service.rs`): `LedgerService` serialises calls,
//!   runs the hook, commits and publishes
//!
//! ## Invariants
//!
//! - A balance record's amount is zero exactly when it is marked burned
//! - Every registered holder appears once in its identifier's holder sequence
//! - A holder is registered exactly when its balance is positive (except
//!   under the `Operator` credit target, which diverges by construction)
//!
//! ## Usage Example
//!
//! ```ignore
//! use mt_ledger::prelude::*;
//!
//! let service = LedgerService::new(LedgerConfig::default())?;
//! let alice = Address::repeat_byte(0xA1);
//! let bob = Address::repeat_byte(0xB2);
//!
//! service.mint(&alice, alice, TokenId::from(1u64), U256::from(10))?;
//! service.transfer(&alice, alice, bob, TokenId::from(1u64), U256::from(4), Bytes::new())?;
//!
//! assert_eq!(service.balance_of(bob, TokenId::from(1u64)), U256::from(4));
//! assert_eq!(service.holders(TokenId::from(1u64)), vec![alice, bob]);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::config::{LedgerConfig, LedgerConfigBuilder};
    pub use crate::domain::entities::{
        BalanceRecord, CreditTarget, OperationKind, TransferContext,
    };
    pub use crate::domain::ledger::{ProtocolPolicy, TokenLedger};
    pub use crate::domain::protocol::PreparedOperation;
    pub use crate::domain::snapshot::LedgerSnapshot;
    pub use crate::domain::value_objects::{Address, Bytes, TokenId, U256};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::MultiTokenApi;
    pub use crate::ports::outbound::{
        CallerIdentity, EventSink, MetadataProvider, NoopHook, SnapshotStore, TransferHook,
    };

    // Events
    pub use crate::events::{topics, LedgerEvent, LedgerEventRecord};

    // Errors
    pub use crate::errors::{ConfigError, LedgerError, SnapshotError};

    // Adapters
    pub use crate::adapters::{
        DenyListHook, InMemoryEventLog, InMemorySnapshotStore, JsonLinesSink, RecordingHook,
        StaticMetadata, TracingEventSink,
    };

    // Service
    pub use crate::service::{LedgerService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Multi-Token Ledger";

// =============================================================================
// TESTS
// =============================================================================
