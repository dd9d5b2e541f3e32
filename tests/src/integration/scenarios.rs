//! # Reference Scenarios
//!
//! The canonical ledger walkthroughs plus the protocol-level properties:
//! mint/burn round trip, overwrite semantics, operator rights, batch
//! atomicity and single-element batch equivalence.

#[cfg(test)]
mod tests {
    use crate::integration::accounts::{ALICE, BOB, CAROL};
    use crate::integration::{service_with_log, token, units};
    use mt_ledger::prelude::*;

    // =============================================================================
    // CANONICAL SCENARIOS
    // =============================================================================

    #[test]
    fn test_mint_registers_holder() {
        let (service, _) = service_with_log(LedgerConfig::default());
        service.mint(&ALICE, ALICE, token(1), units(10)).unwrap();

        assert_eq!(service.balance_of(ALICE, token(1)), units(10));
        assert_eq!(service.holders(token(1)), vec![ALICE]);
    }

    #[test]
    fn test_burn_after_mint_empties_holders() {
        let (service, log) = service_with_log(LedgerConfig::default());
        service.mint(&ALICE, ALICE, token(1), units(10)).unwrap();
        service.burn(&ALICE, ALICE, token(1), units(10)).unwrap();

        assert_eq!(service.balance_of(ALICE, token(1)), U256::zero());
        assert!(service.holders(token(1)).is_empty());
        assert!(service.record(token(1), ALICE).unwrap().burned);
        assert_eq!(
            log.last(),
            Some(LedgerEvent::TransferSingle {
                operator: ALICE,
                from: ALICE,
                to: Address::ZERO,
                id: token(1),
                value: units(10),
            })
        );
    }

    #[test]
    fn test_second_mint_overwrites() {
        let (service, _) = service_with_log(LedgerConfig::default());
        service.mint(&ALICE, ALICE, token(1), units(5)).unwrap();
        service.mint(&ALICE, ALICE, token(1), units(3)).unwrap();

        assert_eq!(service.balance_of(ALICE, token(1)), units(3));
        assert_eq!(service.holders(token(1)), vec![ALICE]);
    }

    #[test]
    fn test_operator_transfer_requires_approval() {
        let (service, _) = service_with_log(LedgerConfig::default());
        service.mint(&ALICE, ALICE, token(1), units(5)).unwrap();

        let err = service
            .transfer(&BOB, ALICE, CAROL, token(1), units(2), Bytes::new())
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::NotAuthorized {
                caller: BOB,
                owner: ALICE
            }
        );

        service.set_operator_approval(&ALICE, BOB, true).unwrap();
        service
            .transfer(&BOB, ALICE, CAROL, token(1), units(2), Bytes::new())
            .unwrap();

        assert_eq!(service.balance_of(ALICE, token(1)), units(3));
        assert_eq!(service.balance_of(CAROL, token(1)), units(2));
        assert_eq!(service.holders(token(1)), vec![ALICE, CAROL]);
    }

    #[test]
    fn test_mismatched_batch_leaves_balances() {
        let (service, log) = service_with_log(LedgerConfig::default());
        service
            .mint_batch(&ALICE, ALICE, &[token(1), token(2)], &[units(4), units(6)])
            .unwrap();
        let events_before = log.len();

        let err = service
            .transfer_batch(
                &ALICE,
                ALICE,
                BOB,
                &[token(1), token(2)],
                &[units(1)],
                Bytes::new(),
            )
            .unwrap_err();

        assert_eq!(err, LedgerError::ids_amounts_mismatch(2, 1));
        assert_eq!(
            service
                .balance_of_batch(&[ALICE, ALICE, BOB, BOB], &[token(1), token(2), token(1), token(2)])
                .unwrap(),
            vec![units(4), units(6), U256::zero(), U256::zero()]
        );
        assert_eq!(log.len(), events_before);
    }

    // =============================================================================
    // PROTOCOL PROPERTIES
    // =============================================================================

    #[test]
    fn test_exact_balance_transfer_burns_sender() {
        let (service, _) = service_with_log(LedgerConfig::default());
        service.mint(&ALICE, ALICE, token(1), units(7)).unwrap();
        service
            .transfer(&ALICE, ALICE, BOB, token(1), units(7), Bytes::new())
            .unwrap();

        let record = service.record(token(1), ALICE).unwrap();
        assert!(record.amount.is_zero());
        assert!(record.burned);
        assert_eq!(service.holders(token(1)), vec![BOB]);

        // A burned record refuses further transfers; burns see an empty balance
        assert_eq!(
            service.transfer(&ALICE, ALICE, BOB, token(1), units(1), Bytes::new()),
            Err(LedgerError::AlreadyBurned {
                id: token(1),
                holder: ALICE
            })
        );
        assert_eq!(
            service.burn(&ALICE, ALICE, token(1), units(1)),
            Err(LedgerError::InsufficientBalance {
                id: token(1),
                required: units(1),
                available: U256::zero(),
            })
        );
    }

    #[test]
    fn test_mint_revives_burned_record() {
        let (service, _) = service_with_log(LedgerConfig::default());
        service.mint(&ALICE, ALICE, token(1), units(2)).unwrap();
        service.burn(&ALICE, ALICE, token(1), units(2)).unwrap();
        service.mint(&ALICE, ALICE, token(1), units(9)).unwrap();

        let record = service.record(token(1), ALICE).unwrap();
        assert!(!record.burned);
        assert_eq!(record.amount, units(9));
        assert_eq!(service.holders(token(1)), vec![ALICE]);
    }

    #[test]
    fn test_single_element_batch_matches_single_transfer() {
        let (single, single_log) = service_with_log(LedgerConfig::default());
        let (batch, batch_log) = service_with_log(LedgerConfig::default());

        for service in [&single, &batch] {
            service.mint(&ALICE, ALICE, token(3), units(10)).unwrap();
            service.mint(&BOB, BOB, token(3), units(1)).unwrap();
        }

        single
            .transfer(&ALICE, ALICE, BOB, token(3), units(4), Bytes::new())
            .unwrap();
        batch
            .transfer_batch(&ALICE, ALICE, BOB, &[token(3)], &[units(4)], Bytes::new())
            .unwrap();

        for account in [ALICE, BOB] {
            assert_eq!(
                single.record(token(3), account),
                batch.record(token(3), account)
            );
        }
        assert_eq!(single.holders(token(3)), batch.holders(token(3)));
        assert!(matches!(single_log.last(), Some(LedgerEvent::TransferSingle { .. })));
        assert!(matches!(batch_log.last(), Some(LedgerEvent::TransferBatch { .. })));
    }

    #[test]
    fn test_transfer_credit_overwrites_recipient_balance() {
        let (service, _) = service_with_log(LedgerConfig::default());
        service.mint(&ALICE, ALICE, token(1), units(10)).unwrap();
        service.mint(&BOB, BOB, token(1), units(50)).unwrap();

        service
            .transfer(&ALICE, ALICE, BOB, token(1), units(4), Bytes::new())
            .unwrap();

        // Credits replace the recipient's record rather than adding to it
        assert_eq!(service.balance_of(BOB, token(1)), units(4));
        assert_eq!(service.balance_of(ALICE, token(1)), units(6));
    }

    #[test]
    fn test_operator_approval_is_idempotent() {
        let (service, log) = service_with_log(LedgerConfig::default());
        service.set_operator_approval(&ALICE, BOB, true).unwrap();
        service.set_operator_approval(&ALICE, BOB, true).unwrap();
        assert!(service.is_operator_approved(ALICE, BOB));
        assert_eq!(log.len(), 2);

        service.set_operator_approval(&ALICE, BOB, false).unwrap();
        assert!(!service.is_operator_approved(ALICE, BOB));

        assert_eq!(
            service.set_operator_approval(&ALICE, ALICE, true),
            Err(LedgerError::SelfApproval(ALICE))
        );
    }

    #[test]
    fn test_amount_slot_is_advisory() {
        let (service, log) = service_with_log(LedgerConfig::default());
        service.mint(&ALICE, ALICE, token(1), units(5)).unwrap();

        service.approve_amount(&ALICE, BOB, token(1), units(5)).unwrap();
        assert_eq!(service.approval_slot(token(1), units(5)), Some(BOB));
        assert_eq!(
            log.last(),
            Some(LedgerEvent::Approval {
                owner: ALICE,
                delegate: BOB,
                id: token(1),
                amount: units(5),
            })
        );

        assert!(service
            .transfer(&BOB, ALICE, BOB, token(1), units(5), Bytes::new())
            .unwrap_err()
            .is_authorization_error());

        // Non-holders cannot write slots
        assert_eq!(
            service.approve_amount(&CAROL, BOB, token(1), units(1)),
            Err(LedgerError::NotOwner {
                caller: CAROL,
                id: token(1)
            })
        );
    }

    #[test]
    fn test_zero_inputs_rejected_everywhere() {
        let (service, _) = service_with_log(LedgerConfig::default());
        service.mint(&ALICE, ALICE, token(1), units(5)).unwrap();

        assert_eq!(
            service.mint(&ALICE, ALICE, token(1), U256::zero()),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(
            service.transfer(&ALICE, ALICE, BOB, token(1), U256::zero(), Bytes::new()),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(
            service.burn_batch(&ALICE, ALICE, &[token(1)], &[U256::zero()]),
            Err(LedgerError::ZeroAmount)
        );
        assert!(matches!(
            service.mint_batch(&ALICE, Address::ZERO, &[token(1)], &[units(1)]),
            Err(LedgerError::ZeroAddress { .. })
        ));
        assert!(matches!(
            service.burn(&ALICE, Address::ZERO, token(1), units(1)),
            Err(LedgerError::ZeroAddress { .. })
        ));
        assert_eq!(service.balance_of(ALICE, token(1)), units(5));
    }

    #[test]
    fn test_batch_limit_from_config() {
        let (service, _) = service_with_log(LedgerConfig::default().with_max_batch_size(2));
        assert_eq!(
            service.mint_batch(
                &ALICE,
                ALICE,
                &[token(1), token(2), token(3)],
                &[units(1), units(1), units(1)]
            ),
            Err(LedgerError::BatchTooLarge { size: 3, max: 2 })
        );
        service
            .mint_batch(&ALICE, ALICE, &[token(1), token(2)], &[units(1), units(1)])
            .unwrap();
    }

    #[test]
    fn test_metadata_uri_is_identifier_independent() {
        let (service, _) =
            service_with_log(LedgerConfig::default().with_base_uri("https://meta.example/{id}.json"));
        assert_eq!(service.metadata_uri(token(1)), service.metadata_uri(token(2)));
        assert_eq!(service.metadata_uri(token(1)), "https://meta.example/{id}.json");
    }
}
