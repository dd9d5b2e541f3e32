//! Adapters Layer
//!
//! Implementations of the outbound ports:
//! - `InMemorySnapshotStore`: latest snapshot held in memory
//! - `InMemoryEventLog`: ordered capture of published events
//! - `TracingEventSink`: structured log line per event
//! - `JsonLinesSink`: JSON document per event on any writer
//! - `StaticMetadata`: shared base URI
//! - `DenyListHook` / `RecordingHook`: pre-transfer policies

pub mod hooks;
pub mod json_sink;
pub mod memory;
pub mod metadata;
pub mod tracing_sink;

pub use hooks::{DenyListHook, RecordingHook};
pub use json_sink::JsonLinesSink;
pub use memory::{InMemoryEventLog, InMemorySnapshotStore};
pub use metadata::StaticMetadata;
pub use tracing_sink::TracingEventSink;
