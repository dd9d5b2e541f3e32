//! # Core Domain Entities
//!
//! Records and descriptors the ledger stores and passes around.

use crate::domain::value_objects::{Address, Bytes, TokenId, U256};
use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// BALANCE RECORD
// =============================================================================

/// Balance of one holder for one token identifier.
///
/// ## Invariants
/// - `amount == 0` if and only if `burned` (after every completed operation)
/// - `addr` equals the holder component of the key the record is stored under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Holder the record belongs to (mirrors the storage key).
    pub addr: Address,
    /// Current amount.
    pub amount: U256,
    /// Set once the amount has been driven to zero.
    pub burned: bool,
}

impl BalanceRecord {
    /// A freshly credited record.
    #[must_use]
    pub fn fresh(holder: Address, amount: U256) -> Self {
        Self {
            addr: holder,
            amount,
            burned: false,
        }
    }

    /// Returns the record left after removing `amount` for `holder`.
    ///
    /// Checks, in order: burned flag, ownership tag, sufficient amount.
    pub fn debited(
        &self,
        id: TokenId,
        holder: Address,
        amount: U256,
    ) -> Result<Self, LedgerError> {
        if self.burned {
            return Err(LedgerError::AlreadyBurned { id, holder });
        }
        if self.addr != holder {
            return Err(LedgerError::UnrecognizedOwnership {
                id,
                expected: holder,
                recorded: self.addr,
            });
        }
        let remaining = self
            .amount
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                id,
                required: amount,
                available: self.amount,
            })?;

        Ok(Self {
            addr: self.addr,
            amount: remaining,
            burned: remaining.is_zero(),
        })
    }

    /// Returns true if the record satisfies `amount == 0 ⇔ burned`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.amount.is_zero() == self.burned
    }
}

// =============================================================================
// CREDIT TARGET
// =============================================================================

/// Which balance slot a single-item transfer credits.
///
/// The batch path always credits the recipient. `Operator` reproduces the
/// legacy single-transfer behaviour where the authorising caller's slot is
/// overwritten while the recipient is registered in the holder index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTarget {
    /// Credit the stated recipient.
    #[default]
    Recipient,
    /// Credit the caller that authorised the transfer.
    Operator,
}

impl std::str::FromStr for CreditTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recipient" => Ok(Self::Recipient),
            "operator" => Ok(Self::Operator),
            other => Err(format!("unknown credit target: {other}")),
        }
    }
}

// =============================================================================
// OPERATION DESCRIPTORS
// =============================================================================

/// The balance-affecting operations of the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Single mint.
    Mint,
    /// Batched mint.
    MintBatch,
    /// Single transfer.
    Transfer,
    /// Batched transfer.
    TransferBatch,
    /// Single burn.
    Burn,
    /// Batched burn.
    BurnBatch,
}

impl OperationKind {
    /// Returns true for the batched variants.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::MintBatch | Self::TransferBatch | Self::BurnBatch)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mint => "mint",
            Self::MintBatch => "mint_batch",
            Self::Transfer => "transfer",
            Self::TransferBatch => "transfer_batch",
            Self::Burn => "burn",
            Self::BurnBatch => "burn_batch",
        };
        f.write_str(name)
    }
}

/// Argument tuple handed to the pre-transfer hook.
///
/// `from` is the null address for mints, `to` is the null address for burns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferContext {
    /// Which operation is about to run.
    pub kind: OperationKind,
    /// Authenticated caller.
    pub operator: Address,
    /// Source account.
    pub from: Address,
    /// Destination account.
    pub to: Address,
    /// Identifiers touched, in call order.
    pub ids: Vec<TokenId>,
    /// Amounts paired with `ids`.
    pub amounts: Vec<U256>,
    /// Opaque caller data.
    pub data: Bytes,
}

// =============================================================================
// TESTS
// =============================================================================
