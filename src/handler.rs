//! Per-event callback between the binlog decoder and the sink.
//!
//! The decoder calls [`EventHandler::on_row`] once per rows event and waits
//! for it to return before delivering the next one. The handler resolves the
//! table's rule, builds the request batch and hands it to the consumer over a
//! bounded channel. A full channel blocks the handler, which in turn blocks
//! the decoder: channel capacity is the only back-pressure knob.
//!
//! A build failure cancels the shared [`CancellationToken`]. Continuing
//! would silently skip a change, so this is the one place where a bad event
//! stops the whole pipeline.

use river_core::{BuildError, RequestBuilder, RowChangeEvent, RuleSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, trace};

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("make {action} request err: {source}, close sync")]
    Build {
        action: String,
        #[source]
        source: BuildError,
    },

    #[error("request channel closed, close sync")]
    ChannelClosed,

    #[error("sync cancelled")]
    Cancelled,
}

pub struct EventHandler<B: RequestBuilder> {
    rules: Arc<RuleSet>,
    builder: B,
    tx: mpsc::Sender<Vec<B::Request>>,
    cancel: CancellationToken,
}

impl<B: RequestBuilder> EventHandler<B> {
    pub fn new(
        rules: Arc<RuleSet>,
        builder: B,
        tx: mpsc::Sender<Vec<B::Request>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            rules,
            builder,
            tx,
            cancel,
        }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Translate one event and hand its batch to the consumer.
    ///
    /// Events for tables without a rule are ignored. After a successful send
    /// the shared token is checked, so a shutdown requested elsewhere is
    /// reported back to the decoder.
    pub async fn on_row(&self, event: &RowChangeEvent) -> Result<(), HandlerError> {
        let Some(rule) = self.rules.get(&event.schema, &event.table) else {
            trace!("No rule for {}.{}, skipping", event.schema, event.table);
            return Ok(());
        };

        let batch = match self.builder.build(rule, event.action, &event.rows) {
            Ok(batch) => batch,
            Err(e) => return Err(self.fail(event.action.as_str(), e)),
        };

        trace!(
            "Built {} {} requests for {}.{}",
            batch.len(),
            event.action,
            event.schema,
            event.table
        );

        tokio::select! {
            biased;
            sent = self.tx.send(batch) => {
                if sent.is_err() {
                    error!("Request channel closed, stopping sync");
                    self.cancel.cancel();
                    return Err(HandlerError::ChannelClosed);
                }
            }
            _ = self.cancel.cancelled() => return Err(HandlerError::Cancelled),
        }

        if self.cancel.is_cancelled() {
            return Err(HandlerError::Cancelled);
        }
        Ok(())
    }

    /// Cancel the pipeline because an event could not be translated.
    pub fn fail(&self, action: &str, source: BuildError) -> HandlerError {
        error!("Failed to make {action} request: {source}, stopping sync");
        self.cancel.cancel();
        HandlerError::Build {
            action: action.to_string(),
            source,
        }
    }
}
