//! Search engine — vector ranking with a deterministic keyword fallback.
//!
//! Ranking policy: in vector mode the sort key is the mean of cosine
//! similarity and therapeutic relevance. In fallback mode the sort key is
//! the normalized keyword score alone; relevance is still reported on each
//! hit but never drives the fallback ordering. Ties keep the input order,
//! which is newest-first coming from the cache.

use crate::classify;
use crate::embedding::{cosine_similarity, Embedder};
use crate::record::{Category, Record, SearchHit};

pub struct SearchEngine {
    embedder: Option<Box<dyn Embedder>>,
}

impl SearchEngine {
    pub fn new(embedder: Option<Box<dyn Embedder>>) -> Self {
        Self { embedder }
    }

    pub fn has_embedder(&self) -> bool {
        self.embedder.is_some()
    }

    /// Rank subject records against a query, best first, at most `limit`.
    ///
    /// Embedding failures never reach the caller: they are logged and the
    /// keyword fallback answers instead.
    pub fn search(
        &self,
        records: &[Record],
        query: &str,
        limit: usize,
        category: Option<Category>,
    ) -> Vec<SearchHit> {
        let candidates: Vec<&Record> = records
            .iter()
            .filter(|r| classify::is_about_subject(r))
            .filter(|r| category.map_or(true, |c| classify::categorize(r) == c))
            .collect();

        if candidates.is_empty() {
            return Vec::new();
        }

        if let Some(embedder) = &self.embedder {
            match self.vector_search(embedder.as_ref(), &candidates, query, limit) {
                Ok(hits) => return hits,
                Err(e) => {
                    tracing::warn!(error = %e, "Vector search failed, falling back to keywords");
                }
            }
        }

        keyword_search(&candidates, query, limit)
    }

    fn vector_search(
        &self,
        embedder: &dyn Embedder,
        candidates: &[&Record],
        query: &str,
        limit: usize,
    ) -> crate::MemoryResult<Vec<SearchHit>> {
        let query_embedding = embedder.embed(query)?;

        let mut hits: Vec<SearchHit> = candidates
            .iter()
            .filter_map(|record| {
                let stored = record.embedding.as_ref()?;
                let similarity = cosine_similarity(&query_embedding, stored);
                Some(SearchHit {
                    record: (*record).clone(),
                    similarity,
                    relevance: classify::therapeutic_relevance(record),
                })
            })
            .collect();

        // Stable sort: equal combined scores keep newest-first input order.
        hits.sort_by(|a, b| {
            b.ranking_score()
                .partial_cmp(&a.ranking_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);

        tracing::debug!(hits = hits.len(), mode = "vector", "Search complete");
        Ok(hits)
    }
}

/// Keyword-overlap scoring: 1.0 per term in content, 0.5 in summary, 0.8
/// among topic tags, normalized by the term count. Zero-score candidates
/// are dropped rather than ranked.
fn keyword_search(candidates: &[&Record], query: &str, limit: usize) -> Vec<SearchHit> {
    let query_lower = query.to_lowercase();
    let terms: Vec<&str> = query_lower.split_whitespace().collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = candidates
        .iter()
        .filter_map(|record| {
            let content = record.content.to_lowercase();
            let summary = record.summary.to_lowercase();
            let topics: Vec<String> =
                record.key_topics.iter().map(|t| t.to_lowercase()).collect();

            let mut score = 0.0;
            for term in &terms {
                if content.contains(term) {
                    score += 1.0;
                }
                if summary.contains(term) {
                    score += 0.5;
                }
                if topics.iter().any(|t| t == term) {
                    score += 0.8;
                }
            }

            if score <= 0.0 {
                return None;
            }
            Some(SearchHit {
                record: (*record).clone(),
                similarity: score / terms.len() as f64,
                relevance: classify::insight_level(record),
            })
        })
        .collect();

    // Fallback sorts by the keyword score alone; relevance is carried but
    // not a sort key.
    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    hits.truncate(limit);

    tracing::debug!(hits = hits.len(), mode = "keyword", "Search complete");
    hits
}
