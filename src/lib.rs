//! mysql-river
//!
//! The change-application core of a MySQL CDC pipeline: turns decoded binlog
//! rows events into write requests for a relational or search-index target
//! and applies them batch by batch.
//!
//! # Pipeline
//!
//! ```text
//! decoder ──► EventHandler::on_row ──► RequestBuilder ──► mpsc channel
//!                  │ build error                              │
//!                  ▼                                          ▼
//!          CancellationToken ◄──── apply error ──── run_consumer ──► BatchSink
//! ```
//!
//! # Crates
//!
//! - `river_core` - rules, row values, events, the `RequestBuilder` seam
//! - `mysql_sink` - SQL request builders, grouping and transactional apply
//! - `search_sink` - document request builders and `_bulk` bodies
//!
//! # CLI Usage
//!
//! ```bash
//! # Validate a rule file
//! mysql-river check --config river.toml
//!
//! # Apply pre-decoded events to a MySQL target
//! mysql-river replay --config river.toml --events events.jsonl --sink mysql
//!
//! # Render the same events as a search-index bulk body
//! mysql-river replay --config river.toml --events events.jsonl --sink bulk --bulk-output out.ndjson
//! ```

use clap::Parser;

pub mod config;
pub mod handler;
pub mod replay;
pub mod sink;

pub use config::{ConfigError, RiverConfig, RuleConfig, TargetConfig};
pub use handler::{EventHandler, HandlerError};
pub use replay::{replay_events, run_replay, DecodedEvent, ReplaySummary};
pub use sink::{run_consumer, BatchSink};

#[derive(Parser, Clone, Debug)]
pub struct TargetOpts {
    /// MySQL target connection URI (overrides `[target].uri` in the config)
    #[arg(long, env = "RIVER_TARGET_URI")]
    pub target_uri: Option<String>,

    /// Request channel capacity (overrides `channel_capacity` in the config)
    #[arg(long)]
    pub channel_capacity: Option<usize>,
}
