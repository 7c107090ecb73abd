//! Aggregation queries — derived views over the loaded record set.
//!
//! Insights, coping strategies and emotional patterns read the candidate
//! (subject) set; statistics always cover the full store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify;
use crate::record::{Category, Record};

/// A distilled realization drawn from a high-insight record.
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub id: String,
    pub content: String,
    pub category: Category,
    pub discovered_at: DateTime<Utc>,
    /// Confidence equals the record's insight level.
    pub confidence: f64,
}

/// A coping approach the subject has learned, one per coping record.
#[derive(Debug, Clone, Serialize)]
pub struct CopingStrategy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub situations: Vec<String>,
    pub effectiveness: f64,
}

/// A recurring emotional theme.
#[derive(Debug, Clone, Serialize)]
pub struct EmotionalPattern {
    pub id: String,
    pub description: String,
    pub triggers: Vec<String>,
    pub effectiveness: f64,
}

/// Corpus-level statistics, computed fresh at query time.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryStats {
    pub total_records: usize,
    pub oldest: DateTime<Utc>,
    pub newest: DateTime<Utc>,
    pub storage_size_bytes: u64,
    pub breakthrough_count: usize,
    pub high_insight_count: usize,
    pub emotional_awareness_count: usize,
}

const INSIGHT_THRESHOLD: f64 = 0.6;
const HIGH_INSIGHT_THRESHOLD: f64 = 0.7;
const MAX_PATTERNS: usize = 5;

/// Truncate to at most `max` characters on a char boundary, appending an
/// ellipsis when cut. Byte slicing would panic mid-codepoint.
fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}

/// Summary if present, else a truncated slice of the content.
pub fn summary_or_excerpt(record: &Record, max: usize) -> String {
    if record.summary.is_empty() {
        truncated(&record.content, max)
    } else {
        record.summary.clone()
    }
}

/// High-insight records (insight level > 0.6), optionally category-filtered.
pub fn extract_insights(records: &[Record], category: Option<Category>) -> Vec<Insight> {
    records
        .iter()
        .filter(|r| classify::is_about_subject(r))
        .filter_map(|record| {
            let level = classify::insight_level(record);
            if level <= INSIGHT_THRESHOLD {
                return None;
            }
            let cat = classify::categorize(record);
            if let Some(wanted) = category {
                if cat != wanted {
                    return None;
                }
            }
            Some(Insight {
                id: record.id.clone(),
                content: summary_or_excerpt(record, 200),
                category: cat,
                discovered_at: record.timestamp,
                confidence: level,
            })
        })
        .collect()
}

/// One strategy per record classified as a coping mechanism.
pub fn extract_coping_strategies(records: &[Record]) -> Vec<CopingStrategy> {
    records
        .iter()
        .filter(|r| classify::is_about_subject(r))
        .filter(|r| classify::categorize(r) == Category::CopingMechanisms)
        .map(|record| CopingStrategy {
            id: record.id.clone(),
            name: format!("Strategy from {}", record.timestamp.format("%Y-%m-%d")),
            description: summary_or_excerpt(record, 150),
            situations: record.key_topics.clone(),
            effectiveness: classify::insight_level(record),
        })
        .collect()
}

/// Up to five emotional-awareness records, newest first per input order.
pub fn extract_emotional_patterns(records: &[Record]) -> Vec<EmotionalPattern> {
    records
        .iter()
        .filter(|r| classify::is_about_subject(r))
        .filter(|r| classify::categorize(r) == Category::EmotionalAwareness)
        .take(MAX_PATTERNS)
        .map(|record| EmotionalPattern {
            id: record.id.clone(),
            description: summary_or_excerpt(record, 100),
            triggers: record.key_topics.clone(),
            effectiveness: classify::insight_level(record),
        })
        .collect()
}

/// Statistics over the full record set. An empty store yields zeroed counts
/// with both timestamps at the current instant — never an error.
pub fn compute_stats(records: &[Record], storage_size_bytes: u64) -> MemoryStats {
    if records.is_empty() {
        let now = crate::time_utils::now();
        return MemoryStats {
            total_records: 0,
            oldest: now,
            newest: now,
            storage_size_bytes: 0,
            breakthrough_count: 0,
            high_insight_count: 0,
            emotional_awareness_count: 0,
        };
    }

    let oldest = records.iter().map(|r| r.timestamp).min().unwrap_or_else(crate::time_utils::now);
    let newest = records.iter().map(|r| r.timestamp).max().unwrap_or_else(crate::time_utils::now);

    MemoryStats {
        total_records: records.len(),
        oldest,
        newest,
        storage_size_bytes,
        breakthrough_count: records.iter().filter(|r| classify::is_breakthrough(r)).count(),
        high_insight_count: records
            .iter()
            .filter(|r| classify::insight_level(r) > HIGH_INSIGHT_THRESHOLD)
            .count(),
        emotional_awareness_count: records
            .iter()
            .filter(|r| classify::categorize(r) == Category::EmotionalAwareness)
            .count(),
    }
}
