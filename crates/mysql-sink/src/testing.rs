//! In-memory target store for tests.
//!
//! `RecordingStore` journals every successful store call and only moves
//! executed rows into its committed set on commit, so tests can check both
//! the call sequence and transactional visibility.

use crate::store::{StoreTransaction, TargetStore};
use anyhow::{bail, Result};
use async_trait::async_trait;
use river_core::RowValue;
use std::sync::{Arc, Mutex};

/// A store call that completed.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    Begin,
    Prepare(String),
    Execute(String, Vec<RowValue>),
    Close(String),
    Commit,
    Rollback,
}

/// Where the store should inject a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FailPoint {
    Begin,
    Prepare,
    /// Fail the execution bound to exactly these values.
    Execute(Vec<RowValue>),
    Commit,
}

#[derive(Default)]
struct State {
    journal: Vec<StoreOp>,
    committed: Vec<(String, Vec<RowValue>)>,
    fail_at: Option<FailPoint>,
}

#[derive(Clone, Default)]
pub struct RecordingStore {
    state: Arc<Mutex<State>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_at(self, point: FailPoint) -> Self {
        self.state.lock().unwrap().fail_at = Some(point);
        self
    }

    pub fn journal(&self) -> Vec<StoreOp> {
        self.state.lock().unwrap().journal.clone()
    }

    /// Executions that were part of a committed transaction, in order.
    pub fn committed(&self) -> Vec<(String, Vec<RowValue>)> {
        self.state.lock().unwrap().committed.clone()
    }

    fn record(&self, op: StoreOp) {
        self.state.lock().unwrap().journal.push(op);
    }

    fn should_fail(&self, point: &FailPoint) -> bool {
        self.state.lock().unwrap().fail_at.as_ref() == Some(point)
    }
}

#[async_trait]
impl TargetStore for RecordingStore {
    type Transaction = RecordingTransaction;

    async fn begin(&self) -> Result<RecordingTransaction> {
        if self.should_fail(&FailPoint::Begin) {
            bail!("injected begin failure");
        }
        self.record(StoreOp::Begin);
        Ok(RecordingTransaction {
            store: self.clone(),
            pending: Vec::new(),
        })
    }
}

pub struct RecordingTransaction {
    store: RecordingStore,
    pending: Vec<(String, Vec<RowValue>)>,
}

#[async_trait]
impl StoreTransaction for RecordingTransaction {
    type Statement = String;

    async fn prepare(&mut self, query: &str) -> Result<String> {
        if self.store.should_fail(&FailPoint::Prepare) {
            bail!("injected prepare failure");
        }
        self.store.record(StoreOp::Prepare(query.to_string()));
        Ok(query.to_string())
    }

    async fn execute(&mut self, stmt: &String, values: &[RowValue]) -> Result<()> {
        if self.store.should_fail(&FailPoint::Execute(values.to_vec())) {
            bail!("injected execute failure");
        }
        self.store
            .record(StoreOp::Execute(stmt.clone(), values.to_vec()));
        self.pending.push((stmt.clone(), values.to_vec()));
        Ok(())
    }

    async fn close(&mut self, stmt: String) -> Result<()> {
        self.store.record(StoreOp::Close(stmt));
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        if self.store.should_fail(&FailPoint::Commit) {
            bail!("injected commit failure");
        }
        self.store.record(StoreOp::Commit);
        self.store
            .state
            .lock()
            .unwrap()
            .committed
            .extend(self.pending);
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.store.record(StoreOp::Rollback);
        Ok(())
    }
}
