//! Consumer side of the request channel.

use anyhow::Result;
use async_trait::async_trait;
use mysql_sink::{Applier, SqlRequest, TargetStore};
use search_sink::{BulkWriter, DocumentRequest};
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Destination for request batches taken off the channel.
#[async_trait]
pub trait BatchSink<R: Send + 'static>: Send {
    async fn apply_batch(&mut self, batch: Vec<R>) -> Result<()>;
}

#[async_trait]
impl<S: TargetStore> BatchSink<SqlRequest> for Applier<S> {
    async fn apply_batch(&mut self, batch: Vec<SqlRequest>) -> Result<()> {
        self.apply(batch).await
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> BatchSink<DocumentRequest> for BulkWriter<W> {
    async fn apply_batch(&mut self, batch: Vec<DocumentRequest>) -> Result<()> {
        self.write_batch(&batch).await
    }
}

/// Drain the channel in FIFO order, applying one batch at a time.
///
/// Returns the number of batches applied once every sender is gone, or once
/// the token is cancelled and the channel holds nothing more. The first
/// apply failure cancels the pipeline; there is no retry.
pub async fn run_consumer<R, S>(
    mut rx: mpsc::Receiver<Vec<R>>,
    mut sink: S,
    cancel: CancellationToken,
) -> Result<usize>
where
    R: Send + 'static,
    S: BatchSink<R>,
{
    let mut applied = 0usize;

    loop {
        let batch = tokio::select! {
            biased;
            batch = rx.recv() => match batch {
                Some(batch) => batch,
                None => break,
            },
            _ = cancel.cancelled() => {
                info!("Consumer stopping on cancellation");
                break;
            }
        };

        let len = batch.len();
        if let Err(e) = sink.apply_batch(batch).await {
            error!("Failed to apply batch of {len} requests: {e:#}");
            cancel.cancel();
            return Err(e.context("failed to apply batch"));
        }

        applied += 1;
        debug!("Applied batch of {len} requests");
        if applied % 100 == 0 {
            info!("Applied {applied} batches");
        }
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mysql_sink::testing::{FailPoint, RecordingStore, StoreOp};
    use river_core::{Action, RowValue};
    use std::sync::Arc;

    fn batch(id: i64) -> Vec<SqlRequest> {
        vec![SqlRequest::new(
            Action::Insert,
            "users",
            Arc::from("INSERT q"),
            vec![RowValue::Int(id)],
        )]
    }

    #[tokio::test]
    async fn test_consumer_applies_in_fifo_order() {
        let store = RecordingStore::new();
        let (tx, rx) = mpsc::channel(4);
        tx.send(batch(1)).await.unwrap();
        tx.send(batch(2)).await.unwrap();
        drop(tx);

        let applied = run_consumer(rx, Applier::new(store.clone()), CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(applied, 2);
        let ids: Vec<Vec<RowValue>> = store.committed().into_iter().map(|(_, v)| v).collect();
        assert_eq!(ids, vec![vec![RowValue::Int(1)], vec![RowValue::Int(2)]]);
    }

    #[tokio::test]
    async fn test_apply_failure_cancels_pipeline() {
        let store = RecordingStore::new().fail_at(FailPoint::Execute(vec![RowValue::Int(2)]));
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel(4);
        tx.send(batch(1)).await.unwrap();
        tx.send(batch(2)).await.unwrap();
        tx.send(batch(3)).await.unwrap();

        let err = run_consumer(rx, Applier::new(store.clone()), cancel.clone())
            .await
            .unwrap_err();

        assert!(format!("{err:#}").starts_with("failed to apply batch"));
        assert!(cancel.is_cancelled());
        assert_eq!(store.committed().len(), 1);
        assert_eq!(
            store.journal().iter().filter(|op| **op == StoreOp::Rollback).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_bulk_writer_sink() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(vec![DocumentRequest::delete("users", "1".into())])
            .await
            .unwrap();
        drop(tx);

        let applied = run_consumer(rx, BulkWriter::new(Vec::new()), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(applied, 1);
    }
}
