//! Therapy Memory — read-only retrieval core over a journal of
//! therapeutic conversation records.
//!
//! Single-crate library providing the record store, snapshot cache,
//! lexical classifier, similarity search and aggregation queries behind
//! an MCP server binary.

// Foundation types
pub mod error;
pub mod time_utils;

// Core types
pub mod config;
pub mod record;

// Sub-systems
pub mod bank;
pub mod classify;
pub mod embedding;
pub mod queries;
pub mod search;
pub mod storage;
pub mod tracing_init;

#[cfg(test)]
pub mod test_helpers;

// Re-exports for convenience
pub use error::{MemoryError, MemoryResult};
