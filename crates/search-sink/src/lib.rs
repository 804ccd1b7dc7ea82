//! Search-index sink for mysql-river.
//!
//! Translates row-change events into document requests keyed by primary key
//! and renders batches as `_bulk` bodies. Submitting the bodies to a cluster
//! is left to the caller.

mod builder;
mod bulk;
mod document;

pub use builder::{build_delete, build_index, build_update, doc_id, DocumentRequestBuilder};
pub use bulk::{bulk_body, BulkWriter};
pub use document::{to_json, DocAction, DocumentRequest};
