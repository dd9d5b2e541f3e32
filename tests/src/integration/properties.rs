//! # Ledger Properties
//!
//! Randomised operation sequences checked against the ledger invariants.

use mt_ledger::prelude::*;

/// One randomly generated call against the ledger.
#[derive(Clone, Debug)]
pub enum LedgerOp {
    /// Mint to `to`.
    Mint { caller: u8, to: u8, id: u64, amount: u64 },
    /// Transfer between two accounts.
    Transfer { caller: u8, from: u8, to: u8, id: u64, amount: u64 },
    /// Transfer several identifiers at once.
    TransferBatch { caller: u8, from: u8, to: u8, entries: Vec<(u64, u64)> },
    /// Burn from `from`.
    Burn { caller: u8, from: u8, id: u64, amount: u64 },
    /// Burn several identifiers at once.
    BurnBatch { caller: u8, from: u8, entries: Vec<(u64, u64)> },
    /// Grant or revoke an operator.
    Approve { owner: u8, operator: u8, approved: bool },
}

/// Account for a small index. Index 0 is the null address.
pub fn account(index: u8) -> Address {
    if index == 0 {
        Address::ZERO
    } else {
        Address::repeat_byte(index)
    }
}

/// Apply `op` through the service API.
pub fn apply(service: &LedgerService, op: &LedgerOp) -> Result<(), LedgerError> {
    let split = |entries: &[(u64, u64)]| -> (Vec<TokenId>, Vec<U256>) {
        entries
            .iter()
            .map(|(id, amount)| (TokenId::from(*id), U256::from(*amount)))
            .unzip()
    };

    match op {
        LedgerOp::Mint { caller, to, id, amount } => service.mint(
            &account(*caller),
            account(*to),
            TokenId::from(*id),
            U256::from(*amount),
        ),
        LedgerOp::Transfer { caller, from, to, id, amount } => service.transfer(
            &account(*caller),
            account(*from),
            account(*to),
            TokenId::from(*id),
            U256::from(*amount),
            Bytes::new(),
        ),
        LedgerOp::TransferBatch { caller, from, to, entries } => {
            let (ids, amounts) = split(entries);
            service.transfer_batch(
                &account(*caller),
                account(*from),
                account(*to),
                &ids,
                &amounts,
                Bytes::new(),
            )
        }
        LedgerOp::Burn { caller, from, id, amount } => service.burn(
            &account(*caller),
            account(*from),
            TokenId::from(*id),
            U256::from(*amount),
        ),
        LedgerOp::BurnBatch { caller, from, entries } => {
            let (ids, amounts) = split(entries);
            service.burn_batch(&account(*caller), account(*from), &ids, &amounts)
        }
        LedgerOp::Approve { owner, operator, approved } => {
            service.set_operator_approval(&account(*owner), account(*operator), *approved)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ACCOUNTS: u8 = 4;
    const IDS: u64 = 3;

    fn entries() -> impl Strategy<Value = Vec<(u64, u64)>> {
        prop::collection::vec((0..IDS, 0u64..12), 1..4)
    }

    fn op() -> impl Strategy<Value = LedgerOp> {
        let acct = || 0..ACCOUNTS;
        prop_oneof![
            3 => (1..ACCOUNTS, acct(), 0..IDS, 0u64..20)
                .prop_map(|(caller, to, id, amount)| LedgerOp::Mint { caller, to, id, amount }),
            3 => (1..ACCOUNTS, acct(), acct(), 0..IDS, 0u64..20).prop_map(
                |(caller, from, to, id, amount)| LedgerOp::Transfer { caller, from, to, id, amount }
            ),
            1 => (1..ACCOUNTS, acct(), acct(), entries()).prop_map(
                |(caller, from, to, entries)| LedgerOp::TransferBatch { caller, from, to, entries }
            ),
            2 => (1..ACCOUNTS, acct(), 0..IDS, 0u64..20)
                .prop_map(|(caller, from, id, amount)| LedgerOp::Burn { caller, from, id, amount }),
            1 => (1..ACCOUNTS, acct(), entries())
                .prop_map(|(caller, from, entries)| LedgerOp::BurnBatch { caller, from, entries }),
            1 => (1..ACCOUNTS, acct(), any::<bool>()).prop_map(
                |(owner, operator, approved)| LedgerOp::Approve { owner, operator, approved }
            ),
        ]
    }

    fn image(service: &LedgerService) -> Vec<(u64, Vec<Address>, Vec<Option<BalanceRecord>>)> {
        (0..IDS)
            .map(|id| {
                let id_value = TokenId::from(id);
                let records = (0..ACCOUNTS)
                    .map(|a| service.record(id_value, account(a)))
                    .collect();
                (id, service.holders(id_value), records)
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        /// Under recipient crediting every reachable state passes the full audit.
        #[test]
        fn prop_recipient_mode_keeps_all_invariants(ops in prop::collection::vec(op(), 1..40)) {
            let service = LedgerService::new(LedgerConfig::default()).unwrap();
            for op in &ops {
                let _ = apply(&service, op);
                let audit = service.audit();
                prop_assert!(audit.is_valid(), "{:?} after {:?}", audit.violations(), op);
            }
        }

        /// Operator crediting may decouple holders from balances but never
        /// corrupts burn flags or holder sets.
        #[test]
        fn prop_operator_mode_stays_structurally_sound(ops in prop::collection::vec(op(), 1..40)) {
            let config = LedgerConfig::default().with_single_transfer_credit(CreditTarget::Operator);
            let service = LedgerService::new(config).unwrap();
            for op in &ops {
                let _ = apply(&service, op);
                prop_assert!(!service.audit().is_structurally_broken());
            }
        }

        /// A failed call leaves every balance record and holder list untouched.
        #[test]
        fn prop_failed_operations_change_nothing(ops in prop::collection::vec(op(), 1..40)) {
            let service = LedgerService::new(LedgerConfig::default()).unwrap();
            for op in &ops {
                let before = image(&service);
                let generation = service.generation();
                if apply(&service, op).is_err() {
                    prop_assert_eq!(image(&service), before);
                    prop_assert_eq!(service.generation(), generation);
                }
            }
        }

        /// Burning reduces the balance by exactly the burned amount or fails whole.
        #[test]
        fn prop_burn_reduces_balance_exactly(
            minted in 1u64..1_000,
            burned in 1u64..1_000,
        ) {
            let service = LedgerService::new(LedgerConfig::default()).unwrap();
            let holder = account(1);
            service.mint(&holder, holder, TokenId::from(0u64), U256::from(minted)).unwrap();

            let result = service.burn(&holder, holder, TokenId::from(0u64), U256::from(burned));
            if burned <= minted {
                prop_assert!(result.is_ok());
                prop_assert_eq!(service.balance_of(holder, TokenId::from(0u64)), U256::from(minted - burned));
                prop_assert_eq!(service.holders(TokenId::from(0u64)).is_empty(), burned == minted);
            } else {
                let is_insufficient = matches!(result, Err(LedgerError::InsufficientBalance { .. }));
                prop_assert!(is_insufficient);
                prop_assert_eq!(service.balance_of(holder, TokenId::from(0u64)), U256::from(minted));
            }
        }
    }
}
