//! # Ledger Service
//!
//! Wires the outbound ports around a [`TokenLedger`] and implements
//! [`MultiTokenApi`].
//!
//! ## Execution model
//!
//! Calls are strictly sequential. The ledger sits behind a
//! `ReentrantMutex`, so calls from other threads queue up, while a call made
//! on the same thread from inside the pre-transfer hook or the notification
//! sink gets through the lock and is then turned away by the in-operation
//! flag with [`LedgerError::Reentrancy`]. Views stay available to hooks and
//! sinks and observe the state before the running operation commits.
//!
//! ## Operation flow
//!
//! ```text
//! prepare (checks + staging) -> hook -> commit -> publish
//! ```
//!
//! Nothing is written before commit, so a failure at any earlier step leaves
//! the ledger untouched.

use crate::adapters::{InMemorySnapshotStore, StaticMetadata, TracingEventSink};
use crate::domain::config::LedgerConfig;
use crate::domain::entities::{BalanceRecord, OperationKind};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::ledger::{ProtocolPolicy, TokenLedger};
use crate::domain::protocol::PreparedOperation;
use crate::domain::snapshot::LedgerSnapshot;
use crate::domain::value_objects::{Address, Bytes, TokenId, U256};
use crate::errors::{ConfigError, LedgerError};
use crate::events::{LedgerEvent, LedgerEventRecord};
use crate::ports::inbound::MultiTokenApi;
use crate::ports::outbound::{
    CallerIdentity, EventSink, MetadataProvider, NoopHook, SnapshotStore, TransferHook,
};

use parking_lot::{ReentrantMutex, RwLock};
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Statistics for the ledger service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Operations that committed.
    pub operations_committed: u64,
    /// Operations that failed any check, hook rejections included.
    pub operations_rejected: u64,
    /// Rejections raised by the pre-transfer hook.
    pub hook_rejections: u64,
    /// Notifications handed to the sink.
    pub events_emitted: u64,
}

struct LedgerCell {
    ledger: RefCell<TokenLedger>,
    busy: Cell<bool>,
}

/// Marks the ledger as busy for the lifetime of one operation.
struct OperationGuard<'a> {
    busy: &'a Cell<bool>,
}

impl<'a> OperationGuard<'a> {
    fn enter(busy: &'a Cell<bool>) -> Result<Self, LedgerError> {
        if busy.replace(true) {
            return Err(LedgerError::Reentrancy);
        }
        Ok(Self { busy })
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

/// The multi-token ledger service.
pub struct LedgerService {
    config: LedgerConfig,
    state: ReentrantMutex<LedgerCell>,
    metadata: RwLock<Box<dyn MetadataProvider>>,
    sink: Arc<dyn EventSink>,
    hook: Arc<dyn TransferHook>,
    snapshots: Arc<dyn SnapshotStore>,
    stats: RwLock<ServiceStats>,
}

impl LedgerService {
    /// Create a service with the default adapters: shared base URI from
    /// `config`, tracing sink, no-op hook, in-memory snapshot store.
    pub fn new(config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let policy = ProtocolPolicy {
            credit_target: config.single_transfer_credit,
            max_batch_size: config.max_batch_size,
        };
        info!(
            credit_target = ?policy.credit_target,
            max_batch_size = policy.max_batch_size,
            admin = ?config.admin,
            "Initializing ledger service"
        );

        Ok(Self {
            metadata: RwLock::new(Box::new(StaticMetadata::new(config.base_uri.clone()))),
            state: ReentrantMutex::new(LedgerCell {
                ledger: RefCell::new(TokenLedger::with_policy(policy)),
                busy: Cell::new(false),
            }),
            sink: Arc::new(TracingEventSink::new()),
            hook: Arc::new(NoopHook),
            snapshots: Arc::new(InMemorySnapshotStore::new()),
            stats: RwLock::new(ServiceStats::default()),
            config,
        })
    }

    /// Replace the pre-transfer hook.
    pub fn with_hook(mut self, hook: Arc<dyn TransferHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Replace the notification sink.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the metadata provider.
    pub fn with_metadata(mut self, metadata: impl MetadataProvider + 'static) -> Self {
        self.metadata = RwLock::new(Box::new(metadata));
        self
    }

    /// Replace the snapshot store.
    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = store;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Number of committed mutations.
    pub fn generation(&self) -> u64 {
        self.state.lock().ledger.borrow().generation()
    }

    /// Audit the ledger tables.
    pub fn audit(&self) -> InvariantCheckResult {
        check_all_invariants(&self.state.lock().ledger.borrow())
    }

    // =========================================================================
    // METADATA
    // =========================================================================

    /// Replace the shared metadata URI.
    ///
    /// Restricted to the configured administrator when one is set.
    #[instrument(skip_all, fields(caller = %caller.caller()))]
    pub fn set_metadata_uri(
        &self,
        caller: &dyn CallerIdentity,
        uri: impl Into<String>,
    ) -> Result<(), LedgerError> {
        let caller = caller.caller();
        let uri = uri.into();

        let state = self.state.lock();
        let result = OperationGuard::enter(&state.busy).and_then(|_guard| {
            if let Some(admin) = self.config.admin {
                if caller != admin {
                    return Err(LedgerError::NotAdmin(caller));
                }
            }
            self.metadata.write().set_base_uri(uri.clone());
            self.publish(LedgerEvent::Uri {
                value: uri,
                id: None,
            });
            Ok(())
        });
        self.finish("set_metadata_uri", result)
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    /// Encode the ledger and metadata URI and hand them to the snapshot store.
    ///
    /// Returns the generation captured.
    #[instrument(skip(self))]
    pub fn checkpoint(&self) -> Result<u64, LedgerError> {
        let state = self.state.lock();
        let _guard = OperationGuard::enter(&state.busy)?;

        let snapshot = {
            let ledger = state.ledger.borrow();
            ledger.to_snapshot(&self.metadata.read().uri(TokenId::default()))
        };
        let bytes = snapshot.encode()?;
        let size = bytes.len();
        self.snapshots.save(bytes)?;

        info!(
            generation = snapshot.generation,
            records = snapshot.records.len(),
            size,
            "Checkpoint saved"
        );
        Ok(snapshot.generation)
    }

    /// Replace the ledger with the latest snapshot from the store.
    ///
    /// The snapshot is verified before anything is replaced; the active
    /// credit target and batch limit are kept.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Result<u64, LedgerError> {
        let state = self.state.lock();
        let _guard = OperationGuard::enter(&state.busy)?;

        let bytes = self.snapshots.load()?;
        let snapshot = LedgerSnapshot::decode(&bytes)?;
        let policy = state.ledger.borrow().policy();
        let restored = TokenLedger::from_snapshot(&snapshot, policy).map_err(|e| {
            warn!(error = %e, "Rejected snapshot");
            e
        })?;

        let mut ledger = state
            .ledger
            .try_borrow_mut()
            .map_err(|_| LedgerError::Reentrancy)?;
        *ledger = restored;
        self.metadata.write().set_base_uri(snapshot.base_uri);

        info!(generation = snapshot.generation, "Ledger restored from snapshot");
        Ok(snapshot.generation)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Run one balance-affecting operation through prepare, hook and commit.
    fn execute<F>(&self, kind: OperationKind, prepare: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&TokenLedger) -> Result<PreparedOperation, LedgerError>,
    {
        let state = self.state.lock();
        let result = OperationGuard::enter(&state.busy).and_then(|_guard| {
            let op = prepare(&*state.ledger.borrow())?;
            debug!(%kind, "Operation prepared, running pre-transfer hook");

            self.hook.before_transfer(op.context()).map_err(|e| {
                self.stats.write().hook_rejections += 1;
                e
            })?;

            let event = state
                .ledger
                .try_borrow_mut()
                .map_err(|_| LedgerError::Reentrancy)?
                .commit(op)?;
            self.publish(event);
            Ok(())
        });
        self.finish(&kind.to_string(), result)
    }

    /// Run one approval-table mutation.
    fn mutate<F>(&self, label: &str, apply: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut TokenLedger) -> Result<LedgerEvent, LedgerError>,
    {
        let state = self.state.lock();
        let result = OperationGuard::enter(&state.busy).and_then(|_guard| {
            let event = {
                let mut ledger = state
                    .ledger
                    .try_borrow_mut()
                    .map_err(|_| LedgerError::Reentrancy)?;
                apply(&mut *ledger)?
            };
            self.publish(event);
            Ok(())
        });
        self.finish(label, result)
    }

    fn publish(&self, event: LedgerEvent) {
        let sequence = {
            let mut stats = self.stats.write();
            stats.events_emitted += 1;
            stats.events_emitted
        };
        let record = LedgerEventRecord {
            sequence,
            operation_id: Uuid::new_v4(),
            event,
        };
        self.sink.publish(&record);
    }

    fn finish(&self, operation: &str, result: Result<(), LedgerError>) -> Result<(), LedgerError> {
        match &result {
            Ok(()) => {
                self.stats.write().operations_committed += 1;
                info!(operation, "Operation committed");
            }
            Err(e) => {
                self.stats.write().operations_rejected += 1;
                if self.config.log_rejections {
                    warn!(operation, error = %e, "Operation rejected");
                } else {
                    debug!(operation, error = %e, "Operation rejected");
                }
            }
        }
        result
    }

    fn view<T>(&self, read: impl FnOnce(&TokenLedger) -> T) -> T {
        let state = self.state.lock();
        let ledger = state.ledger.borrow();
        read(&*ledger)
    }
}

impl MultiTokenApi for LedgerService {
    #[instrument(skip_all, fields(caller = %caller.caller(), to = %to, id = %id))]
    fn mint(
        &self,
        caller: &dyn CallerIdentity,
        to: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let caller = caller.caller();
        self.execute(OperationKind::Mint, |ledger| {
            ledger.prepare_mint(caller, to, id, amount)
        })
    }

    #[instrument(skip_all, fields(caller = %caller.caller(), to = %to, entries = ids.len()))]
    fn mint_batch(
        &self,
        caller: &dyn CallerIdentity,
        to: Address,
        ids: &[TokenId],
        amounts: &[U256],
    ) -> Result<(), LedgerError> {
        let caller = caller.caller();
        self.execute(OperationKind::MintBatch, |ledger| {
            ledger.prepare_mint_batch(caller, to, ids, amounts)
        })
    }

    #[instrument(skip_all, fields(caller = %caller.caller(), from = %from, to = %to, id = %id))]
    fn transfer(
        &self,
        caller: &dyn CallerIdentity,
        from: Address,
        to: Address,
        id: TokenId,
        amount: U256,
        data: Bytes,
    ) -> Result<(), LedgerError> {
        let caller = caller.caller();
        self.execute(OperationKind::Transfer, |ledger| {
            ledger.prepare_transfer(caller, from, to, id, amount, data)
        })
    }

    #[instrument(skip_all, fields(caller = %caller.caller(), from = %from, to = %to, entries = ids.len()))]
    fn transfer_batch(
        &self,
        caller: &dyn CallerIdentity,
        from: Address,
        to: Address,
        ids: &[TokenId],
        amounts: &[U256],
        data: Bytes,
    ) -> Result<(), LedgerError> {
        let caller = caller.caller();
        self.execute(OperationKind::TransferBatch, |ledger| {
            ledger.prepare_transfer_batch(caller, from, to, ids, amounts, data)
        })
    }

    #[instrument(skip_all, fields(caller = %caller.caller(), from = %from, id = %id))]
    fn burn(
        &self,
        caller: &dyn CallerIdentity,
        from: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let caller = caller.caller();
        self.execute(OperationKind::Burn, |ledger| {
            ledger.prepare_burn(caller, from, id, amount)
        })
    }

    #[instrument(skip_all, fields(caller = %caller.caller(), from = %from, entries = ids.len()))]
    fn burn_batch(
        &self,
        caller: &dyn CallerIdentity,
        from: Address,
        ids: &[TokenId],
        amounts: &[U256],
    ) -> Result<(), LedgerError> {
        let caller = caller.caller();
        self.execute(OperationKind::BurnBatch, |ledger| {
            ledger.prepare_burn_batch(caller, from, ids, amounts)
        })
    }

    #[instrument(skip_all, fields(caller = %caller.caller(), operator = %operator, approved = approved))]
    fn set_operator_approval(
        &self,
        caller: &dyn CallerIdentity,
        operator: Address,
        approved: bool,
    ) -> Result<(), LedgerError> {
        let owner = caller.caller();
        self.mutate("set_operator_approval", |ledger| {
            ledger.set_operator_approval(owner, operator, approved)
        })
    }

    #[instrument(skip_all, fields(caller = %caller.caller(), delegate = %delegate, id = %id))]
    fn approve_amount(
        &self,
        caller: &dyn CallerIdentity,
        delegate: Address,
        id: TokenId,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let owner = caller.caller();
        self.mutate("approve_amount", |ledger| {
            ledger.approve_amount(owner, delegate, id, amount)
        })
    }

    fn balance_of(&self, account: Address, id: TokenId) -> U256 {
        self.view(|ledger| ledger.balance_of(account, id))
    }

    fn balance_of_batch(
        &self,
        accounts: &[Address],
        ids: &[TokenId],
    ) -> Result<Vec<U256>, LedgerError> {
        self.view(|ledger| ledger.balance_of_batch(accounts, ids))
    }

    fn holders(&self, id: TokenId) -> Vec<Address> {
        self.view(|ledger| ledger.holders(id).to_vec())
    }

    fn record(&self, id: TokenId, account: Address) -> Option<BalanceRecord> {
        self.view(|ledger| ledger.record(id, account))
    }

    fn metadata_uri(&self, id: TokenId) -> String {
        self.metadata.read().uri(id)
    }

    fn is_operator_approved(&self, owner: Address, operator: Address) -> bool {
        self.view(|ledger| ledger.is_operator_approved(owner, operator))
    }

    fn approval_slot(&self, id: TokenId, amount: U256) -> Option<Address> {
        self.view(|ledger| ledger.approval_slot(id, amount))
    }
}

// =============================================================================
// TESTS
// =============================================================================
