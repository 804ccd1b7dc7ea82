//! Transactional batch apply.
//!
//! Each batch handed over by the event handler becomes exactly one
//! transaction: every request lands or none does. Batches from different
//! events are independent transactions.

use crate::group::{group_requests, RequestGroup};
use crate::request::SqlRequest;
use crate::store::{StoreTransaction, TargetStore};
use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Applies request batches to a [`TargetStore`].
pub struct Applier<S> {
    store: S,
}

impl<S: TargetStore> Applier<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one batch atomically. Empty batches succeed without touching
    /// the store.
    ///
    /// Begin, prepare, execute and commit failures are all fatal to the
    /// batch and are not retried here.
    pub async fn apply(&self, requests: Vec<SqlRequest>) -> Result<()> {
        if requests.is_empty() {
            return Ok(());
        }

        let count = requests.len();
        let mut tx = self
            .store
            .begin()
            .await
            .context("failed to begin transaction")?;

        let groups = group_requests(requests);
        debug!("Applying {count} requests in {} groups", groups.len());

        for group in &groups {
            if let Err(e) = apply_group(&mut tx, group).await {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed after apply error: {rollback_err:#}");
                }
                return Err(e);
            }
        }

        tx.commit().await.context("failed to commit transaction")
    }
}

async fn apply_group<T: StoreTransaction>(tx: &mut T, group: &RequestGroup) -> Result<()> {
    let stmt = tx
        .prepare(&group.query)
        .await
        .with_context(|| format!("failed to prepare '{}'", group.query))?;

    let mut result = Ok(());
    for req in &group.requests {
        if let Err(e) = tx.execute(&stmt, &req.values).await {
            result = Err(e.context(format!(
                "failed to execute {} on table '{}'",
                req.action, req.table
            )));
            break;
        }
    }

    let closed = tx.close(stmt).await;
    result?;
    closed.context("failed to close statement")
}
