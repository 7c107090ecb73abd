//! Memory bank — facade tying loader, cache, classifier and search into
//! one read-only view of the journal. This is the object the request
//! router holds; it never writes a record.

use std::sync::Arc;

use crate::classify;
use crate::config::MemoryConfig;
use crate::error::MemoryResult;
use crate::queries::{
    self, CopingStrategy, EmotionalPattern, Insight, MemoryStats,
};
use crate::record::{Category, EnrichedRecord, Record, SearchHit};
use crate::search::SearchEngine;
use crate::storage::cache::SnapshotCache;
use crate::storage::loader::RecordStore;

pub struct MemoryBank {
    store: RecordStore,
    cache: SnapshotCache,
    engine: SearchEngine,
}

impl MemoryBank {
    pub fn new(config: &MemoryConfig) -> Self {
        let store = RecordStore::new(config.data_dir.clone(), config.load_timeout());
        let cache = SnapshotCache::new(config.cache_ttl());
        let engine = SearchEngine::new(config.embedding.build());
        if !engine.has_embedder() {
            tracing::info!("No embedding capability configured, search uses keyword fallback");
        }
        Self { store, cache, engine }
    }

    /// Full record set, newest first, served from the snapshot cache.
    pub fn records(&self) -> Arc<Vec<Record>> {
        self.cache.get_or_reload(|| self.store.load_all())
    }

    /// Candidate set: records about the subject per the selection predicate.
    pub fn subject_records(&self) -> Vec<Record> {
        self.records()
            .iter()
            .filter(|r| classify::is_about_subject(r))
            .cloned()
            .collect()
    }

    /// Candidate set with classifier signals attached. A `Contract` error
    /// here means a classifier bug and is propagated, not swallowed.
    pub fn enriched_subject_records(&self) -> MemoryResult<Vec<EnrichedRecord>> {
        self.records()
            .iter()
            .filter(|r| classify::is_about_subject(r))
            .map(classify::enrich)
            .collect()
    }

    pub fn search(
        &self,
        query: &str,
        limit: usize,
        category: Option<Category>,
    ) -> Vec<SearchHit> {
        self.engine.search(&self.records(), query, limit, category)
    }

    pub fn insights(&self, category: Option<Category>) -> Vec<Insight> {
        queries::extract_insights(&self.records(), category)
    }

    pub fn coping_strategies(&self) -> Vec<CopingStrategy> {
        queries::extract_coping_strategies(&self.records())
    }

    pub fn emotional_patterns(&self) -> Vec<EmotionalPattern> {
        queries::extract_emotional_patterns(&self.records())
    }

    pub fn stats(&self) -> MemoryStats {
        queries::compute_stats(&self.records(), self.store.storage_size_bytes())
    }
}
