//! Target store abstraction.
//!
//! The applier only needs transaction begin/commit/rollback, prepare-by-text
//! and execute-with-positional-parameters. [`MySqlStore`] implements these
//! on a `mysql_async` pool; tests use [`crate::testing::RecordingStore`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Pool, Statement, Transaction, TxOpts};
use mysql_types::to_params;
use river_core::RowValue;

/// A store that can open transactions.
#[async_trait]
pub trait TargetStore: Send + Sync {
    type Transaction: StoreTransaction;

    async fn begin(&self) -> Result<Self::Transaction>;
}

/// An open transaction owned by one apply call.
#[async_trait]
pub trait StoreTransaction: Send {
    type Statement: Send + Sync;

    async fn prepare(&mut self, query: &str) -> Result<Self::Statement>;

    async fn execute(&mut self, stmt: &Self::Statement, values: &[RowValue]) -> Result<()>;

    /// Release a prepared statement.
    async fn close(&mut self, stmt: Self::Statement) -> Result<()>;

    async fn commit(self) -> Result<()>;

    async fn rollback(self) -> Result<()>;
}

/// Create a MySQL connection pool from a `mysql://` URI.
pub fn new_mysql_pool(uri: &str) -> Result<Pool> {
    let opts = mysql_async::Opts::from_url(uri).context("invalid MySQL connection URI")?;
    Ok(Pool::new(opts))
}

/// MySQL target backed by a connection pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: Pool,
}

impl MySqlStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TargetStore for MySqlStore {
    type Transaction = MySqlTransaction;

    async fn begin(&self) -> Result<MySqlTransaction> {
        let tx = self.pool.start_transaction(TxOpts::default()).await?;
        Ok(MySqlTransaction { tx })
    }
}

pub struct MySqlTransaction {
    tx: Transaction<'static>,
}

#[async_trait]
impl StoreTransaction for MySqlTransaction {
    type Statement = Statement;

    async fn prepare(&mut self, query: &str) -> Result<Statement> {
        Ok(self.tx.prep(query).await?)
    }

    async fn execute(&mut self, stmt: &Statement, values: &[RowValue]) -> Result<()> {
        self.tx.exec_drop(stmt.clone(), to_params(values)).await?;
        Ok(())
    }

    async fn close(&mut self, stmt: Statement) -> Result<()> {
        self.tx.close(stmt).await?;
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
