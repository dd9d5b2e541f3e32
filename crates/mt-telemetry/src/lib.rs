//! # MT Telemetry
//!
//! Logging bootstrap for the multi-token ledger.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mt_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Ledger logs and notifications now flow to the configured output
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MTL_SERVICE_NAME` | `mt-ledger` | Service name in log lines |
//! | `MTL_LOG_LEVEL` | `info` | Log filter |
//! | `MTL_CONSOLE_OUTPUT` | `true` | Write logs to the console |
//! | `MTL_JSON_LOGS` | `false` | JSON lines instead of pretty output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber was installed earlier.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Initialize logging for the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(config)
}
