//! Notification sink writing one JSON document per line.

use crate::events::LedgerEventRecord;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;
use std::io::Write;
use tracing::warn;

/// Serialises every record as a JSON line into `W`.
///
/// Write failures are logged and dropped; they never fail the operation that
/// produced the event.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_record(&self, record: &LedgerEventRecord) -> std::io::Result<()> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn publish(&self, record: &LedgerEventRecord) {
        if let Err(e) = self.write_record(record) {
            warn!(sequence = record.sequence, error = %e, "Failed to write event line");
        }
    }
}
