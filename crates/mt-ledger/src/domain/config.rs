//! Ledger configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use mt_ledger::domain::{CreditTarget, LedgerConfigBuilder};
//!
//! let config = LedgerConfigBuilder::new()
//!     .base_uri("ipfs://collection/")
//!     .max_batch_size(256)
//!     .single_transfer_credit(CreditTarget::Recipient)
//!     .build()?;
//! ```

use crate::domain::entities::CreditTarget;
use crate::domain::value_objects::Address;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Upper bound accepted for `max_batch_size`.
pub const MAX_BATCH_SIZE_LIMIT: usize = 10_000;

/// Ledger configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Base metadata URI shared by every identifier
    pub base_uri: String,
    /// Maximum entries in one batch call (0 = unbounded)
    pub max_batch_size: usize,
    /// Balance slot credited by single-item transfers
    pub single_transfer_credit: CreditTarget,
    /// Account allowed to change the metadata URI (None = anyone)
    pub admin: Option<Address>,
    /// Log rejected operations at `warn` instead of `debug`
    pub log_rejections: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_uri: String::new(),
            max_batch_size: 0,
            single_transfer_credit: CreditTarget::Recipient,
            admin: None,
            log_rejections: true,
        }
    }
}

impl LedgerConfig {
    /// Read configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MTL_BASE_URI`: Base metadata URI (default: empty)
    /// - `MTL_MAX_BATCH_SIZE`: Batch limit, 0 for none (default: 0)
    /// - `MTL_SINGLE_TRANSFER_CREDIT`: `recipient` or `operator` (default: recipient)
    /// - `MTL_ADMIN`: Hex address of the metadata administrator (default: unset)
    /// - `MTL_LOG_REJECTIONS`: `true`/`false` (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_batch_size = match env::var("MTL_MAX_BATCH_SIZE") {
            Ok(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MTL_MAX_BATCH_SIZE",
                value: v,
            })?,
            Err(_) => defaults.max_batch_size,
        };

        let single_transfer_credit = match env::var("MTL_SINGLE_TRANSFER_CREDIT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MTL_SINGLE_TRANSFER_CREDIT",
                value: v,
            })?,
            Err(_) => defaults.single_transfer_credit,
        };

        let admin = match env::var("MTL_ADMIN") {
            Ok(v) => Some(Address::from_hex(&v).ok_or(ConfigError::InvalidValue {
                key: "MTL_ADMIN",
                value: v,
            })?),
            Err(_) => defaults.admin,
        };

        let config = Self {
            base_uri: env::var("MTL_BASE_URI").unwrap_or(defaults.base_uri),
            max_batch_size,
            single_transfer_credit,
            admin,
            log_rejections: env::var("MTL_LOG_REJECTIONS")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.log_rejections),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_batch_size > MAX_BATCH_SIZE_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_batch_size {} exceeds {}",
                self.max_batch_size, MAX_BATCH_SIZE_LIMIT
            )));
        }

        if self.admin.is_some_and(|admin| admin.is_zero()) {
            return Err(ConfigError::Invalid(
                "admin cannot be the zero address".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the base URI
    pub fn with_base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = uri.into();
        self
    }

    /// Builder-style method to set the batch limit
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }

    /// Builder-style method to choose the single-transfer credit target
    pub fn with_single_transfer_credit(mut self, target: CreditTarget) -> Self {
        self.single_transfer_credit = target;
        self
    }

    /// Builder-style method to set the metadata administrator
    pub fn with_admin(mut self, admin: Address) -> Self {
        self.admin = Some(admin);
        self
    }
}

/// Builder for LedgerConfig with validation
#[derive(Default)]
pub struct LedgerConfigBuilder {
    base_uri: Option<String>,
    max_batch_size: Option<usize>,
    single_transfer_credit: Option<CreditTarget>,
    admin: Option<Address>,
    log_rejections: Option<bool>,
}

impl LedgerConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base metadata URI
    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    /// Set the maximum batch size (0 = unbounded)
    pub fn max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = Some(max);
        self
    }

    /// Choose which slot single-item transfers credit
    pub fn single_transfer_credit(mut self, target: CreditTarget) -> Self {
        self.single_transfer_credit = Some(target);
        self
    }

    /// Restrict metadata changes to `admin`
    pub fn admin(mut self, admin: Address) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Log rejected operations at `warn`
    pub fn log_rejections(mut self, enabled: bool) -> Self {
        self.log_rejections = Some(enabled);
        self
    }

    /// Build the LedgerConfig, validating all parameters
    pub fn build(self) -> Result<LedgerConfig, ConfigError> {
        let defaults = LedgerConfig::default();

        let config = LedgerConfig {
            base_uri: self.base_uri.unwrap_or(defaults.base_uri),
            max_batch_size: self.max_batch_size.unwrap_or(defaults.max_batch_size),
            single_transfer_credit: self
                .single_transfer_credit
                .unwrap_or(defaults.single_transfer_credit),
            admin: self.admin.or(defaults.admin),
            log_rejections: self.log_rejections.unwrap_or(defaults.log_rejections),
        };

        config.validate()?;
        Ok(config)
    }
}
