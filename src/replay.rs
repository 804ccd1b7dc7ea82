//! Replay of pre-decoded row events from a JSON Lines file.
//!
//! Each line holds one decoded rows event:
//!
//! ```json
//! {"schema":"shop","table":"users","action":"update","rows":[[1,"a",10],[1,"a",11]]}
//! ```
//!
//! Lines are fed through the [`EventHandler`] exactly as a live decoder
//! would, while a consumer task applies the resulting batches.

use crate::handler::EventHandler;
use crate::sink::{run_consumer, BatchSink};
use anyhow::{Context, Result};
use river_core::{Action, RequestBuilder, Row, RowChangeEvent, RuleSet};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// One event as written by the decoder, before the action is validated.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodedEvent {
    pub schema: String,
    pub table: String,
    pub action: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub batches: usize,
}

/// Feed every event of `path` through `handler`.
///
/// An unknown action is routed through [`EventHandler::fail`], so it
/// cancels the pipeline like any other untranslatable event.
pub async fn replay_events<B: RequestBuilder>(
    path: &Path,
    handler: &EventHandler<B>,
) -> Result<usize> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("failed to open events file {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    let mut count = 0usize;
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let decoded: DecodedEvent = serde_json::from_str(&line)
            .with_context(|| format!("invalid event at line {line_no}"))?;
        let action = match decoded.action.parse::<Action>() {
            Ok(action) => action,
            Err(e) => return Err(handler.fail(&decoded.action, e).into()),
        };
        let event = RowChangeEvent::new(decoded.schema, decoded.table, action, decoded.rows);

        handler
            .on_row(&event)
            .await
            .with_context(|| format!("event at line {line_no}"))?;
        count += 1;
    }

    Ok(count)
}

/// Run the handler and a consumer task over one events file.
///
/// Any producer failure cancels the pipeline. When both sides fail, the
/// consumer's error wins because it is the root cause of the producer
/// observing cancellation.
pub async fn run_replay<B, S>(
    rules: Arc<RuleSet>,
    builder: B,
    sink: S,
    events: &Path,
    channel_capacity: usize,
    cancel: CancellationToken,
) -> Result<ReplaySummary>
where
    B: RequestBuilder,
    S: BatchSink<B::Request> + 'static,
{
    let (tx, rx) = mpsc::channel(channel_capacity);
    let consumer = tokio::spawn(run_consumer(rx, sink, cancel.clone()));

    let handler = EventHandler::new(rules, builder, tx, cancel.clone());
    let produced = replay_events(events, &handler).await;
    if produced.is_err() {
        cancel.cancel();
    }
    drop(handler);

    let applied = consumer.await.context("consumer task panicked")?;
    let batches = applied?;
    let events = produced?;

    info!("Replay finished: {events} events, {batches} batches applied");
    Ok(ReplaySummary { events, batches })
}
