//! Bulk request bodies.
//!
//! Batches render to the newline-delimited `_bulk` format understood by
//! Elasticsearch and OpenSearch: one action line per request, followed by a
//! source line for index and update actions.

use crate::document::{DocAction, DocumentRequest};
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Render a batch as one `_bulk` request body.
pub fn bulk_body(requests: &[DocumentRequest]) -> Result<String, serde_json::Error> {
    let mut body = String::new();
    for req in requests {
        let mut meta = Map::new();
        meta.insert(
            req.action.as_str().to_string(),
            json!({ "_index": req.index, "_id": req.id }),
        );
        body.push_str(&serde_json::to_string(&meta)?);
        body.push('\n');

        if let Some(doc) = &req.doc {
            let source = match req.action {
                DocAction::Update => json!({ "doc": doc }),
                _ => Value::Object(doc.clone()),
            };
            body.push_str(&serde_json::to_string(&source)?);
            body.push('\n');
        }
    }
    Ok(body)
}

/// Writes each batch as a `_bulk` body to an async writer.
///
/// The output can be replayed against a search cluster with
/// `curl -H 'Content-Type: application/x-ndjson' --data-binary @FILE .../_bulk`.
pub struct BulkWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin + Send> BulkWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write_batch(&mut self, requests: &[DocumentRequest]) -> Result<()> {
        if requests.is_empty() {
            return Ok(());
        }
        let body = bulk_body(requests).context("failed to serialize bulk body")?;
        self.writer
            .write_all(body.as_bytes())
            .await
            .context("failed to write bulk body")?;
        self.writer.flush().await.context("failed to flush bulk body")?;
        debug!("Wrote bulk body with {} requests", requests.len());
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
