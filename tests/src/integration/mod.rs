//! Integration tests for the ledger service and its ports.

pub mod flows;
pub mod properties;
pub mod scenarios;

use mt_ledger::prelude::*;
use std::sync::Arc;

/// Well-known accounts used across the suite.
pub mod accounts {
    use mt_ledger::prelude::Address;

    pub const ALICE: Address = Address::repeat_byte(0xA1);
    pub const BOB: Address = Address::repeat_byte(0xB2);
    pub const CAROL: Address = Address::repeat_byte(0xC3);
    pub const ADMIN: Address = Address::repeat_byte(0xAD);
}

/// Identifier shorthand.
pub fn token(n: u64) -> TokenId {
    TokenId::from(n)
}

/// Amount shorthand.
pub fn units(n: u64) -> U256 {
    U256::from(n)
}

/// Service with default config and an in-memory event log.
pub fn service_with_log(config: LedgerConfig) -> (LedgerService, Arc<InMemoryEventLog>) {
    mt_telemetry::init_test_logging();
    let log = Arc::new(InMemoryEventLog::new());
    let service = LedgerService::new(config)
        .expect("valid config")
        .with_sink(log.clone());
    (service, log)
}
