//! Shared test utilities — builders and on-disk store setup.
//!
//! Available only under `#[cfg(test)]`.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::record::{Record, Speaker};

// ============================================================================
// RecordBuilder
// ============================================================================

pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            record: Record {
                id: uuid::Uuid::new_v4().to_string(),
                timestamp: Utc::now(),
                sender: Speaker::Client,
                content: "Test record content".to_string(),
                summary: String::new(),
                key_topics: vec![],
                embedding: None,
                session_id: String::new(),
                metadata: HashMap::new(),
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.record.id = id.to_string();
        self
    }

    pub fn sender(mut self, s: Speaker) -> Self {
        self.record.sender = s;
        self
    }

    pub fn content(mut self, c: &str) -> Self {
        self.record.content = c.to_string();
        self
    }

    pub fn summary(mut self, s: &str) -> Self {
        self.record.summary = s.to_string();
        self
    }

    pub fn key_topics(mut self, topics: &[&str]) -> Self {
        self.record.key_topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn timestamp(mut self, dt: DateTime<Utc>) -> Self {
        self.record.timestamp = dt;
        self
    }

    pub fn embedding(mut self, values: &[f32]) -> Self {
        self.record.embedding = Some(values.to_vec());
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

// ============================================================================
// Store setup helpers
// ============================================================================

/// Serialize a record into `<dir>/<id>.json` the way the journal
/// writer lays files out.
pub fn write_record_file(dir: &Path, record: &Record) {
    let path = dir.join(format!("{}.json", record.id));
    let json = serde_json::to_string_pretty(record).unwrap();
    std::fs::write(path, json).unwrap();
}
