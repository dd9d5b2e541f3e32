//! # Service Flows
//!
//! End-to-end flows through `LedgerService` and its adapters:
//!
//! 1. Pre-transfer hooks (deny list, recording) gate every balance change
//! 2. Sinks and hooks may read the ledger but not mutate it
//! 3. Checkpoint / restore through a shared snapshot store
//! 4. Concurrent callers are serialised
//! 5. Events reach JSON consumers intact

#[cfg(test)]
mod tests {
    use crate::integration::accounts::{ADMIN, ALICE, BOB, CAROL};
    use crate::integration::{service_with_log, token, units};
    use mt_ledger::prelude::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;

    // =========================================================================
    // HOOKS
    // =========================================================================

    #[test]
    fn test_deny_list_blocks_both_directions() {
        let hook = Arc::new(DenyListHook::new());
        let (service, log) = service_with_log(LedgerConfig::default());
        let service = service.with_hook(hook.clone());

        service.mint(&ALICE, ALICE, token(1), units(10)).unwrap();
        service.mint(&CAROL, CAROL, token(1), units(10)).unwrap();
        hook.deny(CAROL);

        // Outbound and inbound are both refused
        assert!(matches!(
            service.transfer(&ALICE, ALICE, CAROL, token(1), units(1), Bytes::new()),
            Err(LedgerError::HookRejected(_))
        ));
        assert!(matches!(
            service.burn(&CAROL, CAROL, token(1), units(1)),
            Err(LedgerError::HookRejected(_))
        ));
        assert_eq!(service.balance_of(CAROL, token(1)), units(10));
        assert_eq!(log.len(), 2);

        // Approvals are not gated
        service.set_operator_approval(&CAROL, BOB, true).unwrap();

        assert!(hook.allow(CAROL));
        service
            .transfer(&ALICE, ALICE, CAROL, token(1), units(1), Bytes::new())
            .unwrap();
        assert_eq!(service.stats().hook_rejections, 2);
    }

    #[test]
    fn test_hook_runs_once_per_batch() {
        let hook = Arc::new(RecordingHook::new());
        let (service, _) = service_with_log(LedgerConfig::default());
        let service = service.with_hook(hook.clone());

        service
            .mint_batch(
                &ALICE,
                ALICE,
                &[token(1), token(2), token(3)],
                &[units(1), units(2), units(3)],
            )
            .unwrap();
        service
            .burn_batch(&ALICE, ALICE, &[token(1), token(2)], &[units(1), units(2)])
            .unwrap();

        let calls = hook.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].kind, OperationKind::BurnBatch);
        assert_eq!(calls[1].to, Address::ZERO);
        assert_eq!(calls[1].amounts, vec![units(1), units(2)]);
    }

    /// Sink that tries to mutate the ledger it listens to.
    #[derive(Default)]
    struct MeddlingSink {
        service: Mutex<Option<Arc<LedgerService>>>,
        attempts: Mutex<Vec<Result<(), LedgerError>>>,
        seen_holders: Mutex<Vec<Vec<Address>>>,
    }

    impl EventSink for MeddlingSink {
        fn publish(&self, record: &LedgerEventRecord) {
            let Some(service) = self.service.lock().clone() else {
                return;
            };
            if let LedgerEvent::TransferSingle { id, to, .. } = record.event {
                self.seen_holders.lock().push(service.holders(id));
                let attempt = service.burn(&to, to, id, units(1));
                self.attempts.lock().push(attempt);
            }
        }
    }

    #[test]
    fn test_sink_cannot_reenter_mutations() {
        let sink = Arc::new(MeddlingSink::default());
        let service = Arc::new(
            LedgerService::new(LedgerConfig::default())
                .unwrap()
                .with_sink(sink.clone()),
        );
        *sink.service.lock() = Some(service.clone());

        service.mint(&ALICE, ALICE, token(1), units(5)).unwrap();

        assert_eq!(sink.attempts.lock().as_slice(), &[Err(LedgerError::Reentrancy)]);
        // The sink observes committed state
        assert_eq!(sink.seen_holders.lock().as_slice(), &[vec![ALICE]]);
        assert_eq!(service.balance_of(ALICE, token(1)), units(5));

        // Outside the sink the same call goes through
        sink.service.lock().take();
        service.burn(&ALICE, ALICE, token(1), units(1)).unwrap();
        assert_eq!(service.balance_of(ALICE, token(1)), units(4));
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    #[test]
    fn test_restore_into_fresh_service() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let config = LedgerConfig::default().with_base_uri("ipfs://ledger/");

        let (source, _) = service_with_log(config.clone());
        let source = source.with_snapshot_store(store.clone());
        source
            .mint_batch(&ALICE, ALICE, &[token(1), token(2)], &[units(3), units(4)])
            .unwrap();
        source.set_operator_approval(&ALICE, BOB, true).unwrap();
        source.approve_amount(&ALICE, CAROL, token(2), units(4)).unwrap();
        let generation = source.checkpoint().unwrap();
        assert!(store.has_snapshot().unwrap());

        let (replica, _) = service_with_log(LedgerConfig::default());
        let replica = replica.with_snapshot_store(store);
        assert_eq!(replica.restore().unwrap(), generation);

        assert_eq!(replica.holders(token(2)), vec![ALICE]);
        assert_eq!(replica.balance_of(ALICE, token(2)), units(4));
        assert!(replica.is_operator_approved(ALICE, BOB));
        assert_eq!(replica.approval_slot(token(2), units(4)), Some(CAROL));
        assert_eq!(replica.metadata_uri(token(9)), "ipfs://ledger/");
        assert!(replica.audit().is_valid());

        // The replica keeps working from the restored state
        replica
            .transfer(&BOB, ALICE, CAROL, token(1), units(3), Bytes::new())
            .unwrap();
        assert_eq!(replica.holders(token(1)), vec![CAROL]);
    }

    #[test]
    fn test_restored_foreign_record_refuses_debit() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let (source, _) = service_with_log(LedgerConfig::default());
        let source = source.with_snapshot_store(store.clone());
        source.mint(&BOB, BOB, token(1), units(5)).unwrap();
        source.checkpoint().unwrap();

        // Re-tag Bob's record as Alice's before restoring it
        let mut snapshot = LedgerSnapshot::decode(&store.load().unwrap()).unwrap();
        for (_, _, record) in &mut snapshot.records {
            record.addr = ALICE;
        }
        store.save(snapshot.encode().unwrap()).unwrap();

        let (replica, _) = service_with_log(LedgerConfig::default());
        let replica = replica.with_snapshot_store(store);
        replica.restore().unwrap();

        assert!(replica
            .audit()
            .violations()
            .iter()
            .any(|v| matches!(v, InvariantViolation::ForeignRecord { .. })));
        assert_eq!(
            replica.burn(&BOB, BOB, token(1), units(1)),
            Err(LedgerError::UnrecognizedOwnership {
                id: token(1),
                expected: BOB,
                recorded: ALICE,
            })
        );
        assert_eq!(replica.balance_of(BOB, token(1)), units(5));
    }

    #[test]
    fn test_corrupted_snapshot_keeps_current_state() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let (service, _) = service_with_log(LedgerConfig::default());
        let service = service.with_snapshot_store(store.clone());
        service.mint(&ALICE, ALICE, token(1), units(5)).unwrap();
        service.checkpoint().unwrap();

        // A zero amount without the burned flag
        let mut snapshot = LedgerSnapshot::decode(&store.load().unwrap()).unwrap();
        for (_, _, record) in &mut snapshot.records {
            record.amount = U256::zero();
        }
        store.save(snapshot.encode().unwrap()).unwrap();

        service.mint(&ALICE, ALICE, token(1), units(8)).unwrap();
        assert!(matches!(
            service.restore(),
            Err(LedgerError::Snapshot(SnapshotError::Corrupted(_)))
        ));
        assert_eq!(service.balance_of(ALICE, token(1)), units(8));

        store.save(b"not a snapshot".to_vec()).unwrap();
        assert!(service.restore().is_err());
        assert_eq!(service.balance_of(ALICE, token(1)), units(8));
    }

    // =========================================================================
    // CONCURRENCY
    // =========================================================================

    #[test]
    fn test_concurrent_callers_are_serialised() {
        let (service, log) = service_with_log(LedgerConfig::default());
        let service = Arc::new(service);
        let callers: Vec<Address> = (1..=8u8).map(Address::repeat_byte).collect();

        let handles: Vec<_> = callers
            .iter()
            .copied()
            .map(|caller| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    for n in 1..=25u64 {
                        service.mint(&caller, caller, token(n % 5), units(n)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(service.stats().operations_committed, 200);
        assert_eq!(service.generation(), 200);
        assert_eq!(log.len(), 200);

        let sequences: Vec<u64> = log.records().iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, (1..=200).collect::<Vec<_>>());

        for id in 0..5u64 {
            assert_eq!(service.holders(token(id)).len(), callers.len());
        }
        assert!(service.audit().is_valid());
    }

    // =========================================================================
    // EVENT DELIVERY
    // =========================================================================

    #[test]
    fn test_json_lines_sink_output() {
        let sink = Arc::new(JsonLinesSink::new(Vec::new()));
        let service = LedgerService::new(LedgerConfig::default().with_admin(ADMIN))
            .unwrap()
            .with_sink(sink.clone());

        service.mint(&ALICE, ALICE, token(7), units(2)).unwrap();
        service.set_operator_approval(&ALICE, BOB, true).unwrap();
        service.set_metadata_uri(&ADMIN, "ar://new/").unwrap();
        drop(service);

        let bytes = match Arc::try_unwrap(sink) {
            Ok(sink) => sink.into_inner(),
            Err(_) => panic!("sink still shared"),
        };
        let lines: Vec<serde_json::Value> = String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["sequence"], 1);
        assert_eq!(lines[0]["event"]["type"], "transfer_single");
        assert_eq!(lines[1]["event"]["type"], "approval_for_all");
        assert_eq!(lines[1]["event"]["approved"], true);
        assert_eq!(lines[2]["event"]["type"], "uri");
        assert_eq!(lines[2]["event"]["value"], "ar://new/");
    }

    #[test]
    fn test_event_record_json_roundtrip() {
        let (service, log) = service_with_log(LedgerConfig::default());
        service
            .mint_batch(&ALICE, BOB, &[token(1), token(2)], &[units(9), units(1)])
            .unwrap();

        let record = log.records().pop().unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let decoded: LedgerEventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(record.event.topic(), topics::TRANSFERS);
        assert!(record.event.involves(BOB));
        assert!(!record.event.involves(CAROL));
    }
}
