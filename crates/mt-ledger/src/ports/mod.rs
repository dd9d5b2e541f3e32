//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - the ledger API
//! - Driven Ports (outbound) - collaborators the ledger calls out to

pub mod inbound;
pub mod outbound;

pub use inbound::MultiTokenApi;
pub use outbound::{
    CallerIdentity, EventSink, MetadataProvider, NoopHook, SnapshotStore, TransferHook,
};
