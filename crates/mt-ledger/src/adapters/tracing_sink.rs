//! Notification sink that writes every event to the `tracing` pipeline.

use crate::domain::value_objects::U256;
use crate::events::{LedgerEvent, LedgerEventRecord};
use crate::ports::outbound::EventSink;
use tracing::info;

/// Logs each event as a structured record under its topic.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Create the sink.
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn publish(&self, record: &LedgerEventRecord) {
        let sequence = record.sequence;
        let operation_id = record.operation_id.to_string();
        let topic = record.event.topic();

        match &record.event {
            LedgerEvent::TransferSingle {
                operator,
                from,
                to,
                id,
                value,
            } => info!(
                sequence,
                %operation_id,
                topic,
                operator = %operator,
                from = %from,
                to = %to,
                id = %id,
                value = %value,
                "TransferSingle"
            ),
            LedgerEvent::TransferBatch {
                operator,
                from,
                to,
                ids,
                values,
            } => {
                let total = values
                    .iter()
                    .fold(U256::zero(), |acc, value| acc.saturating_add(*value));
                info!(
                    sequence,
                    %operation_id,
                    topic,
                    operator = %operator,
                    from = %from,
                    to = %to,
                    entries = ids.len(),
                    total = %total,
                    "TransferBatch"
                );
            }
            LedgerEvent::ApprovalForAll {
                owner,
                operator,
                approved,
            } => info!(
                sequence,
                %operation_id,
                topic,
                owner = %owner,
                operator = %operator,
                approved,
                "ApprovalForAll"
            ),
            LedgerEvent::Approval {
                owner,
                delegate,
                id,
                amount,
            } => info!(
                sequence,
                %operation_id,
                topic,
                owner = %owner,
                delegate = %delegate,
                id = %id,
                amount = %amount,
                "Approval"
            ),
            LedgerEvent::Uri { value, id } => info!(
                sequence,
                %operation_id,
                topic,
                uri = %value,
                id = ?id,
                "URI"
            ),
        }
    }
}
