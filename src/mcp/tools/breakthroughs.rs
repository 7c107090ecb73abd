use chrono::Duration;

use therapy_memory::queries::summary_or_excerpt;
use therapy_memory::record::EnrichedRecord;
use therapy_memory::{time_utils, MemoryResult};

use super::{optional_bool, optional_str, ToolContext};

const HIGH_INSIGHT: f64 = 0.8;
const RECENT_DAYS: i64 = 14;

pub fn handle_breakthroughs(
    params: &serde_json::Value,
    ctx: &ToolContext,
) -> MemoryResult<serde_json::Value> {
    let topic = optional_str(params, "topic").unwrap_or_default();
    let recent_only = optional_bool(params, "recent_only").unwrap_or(false);

    let mut breakthroughs: Vec<EnrichedRecord> = ctx
        .bank
        .enriched_subject_records()?
        .into_iter()
        .filter(|e| e.breakthrough || e.insight_level > HIGH_INSIGHT)
        .collect();

    if !topic.is_empty() {
        let needle = topic.to_lowercase();
        breakthroughs.retain(|e| {
            e.record.content.to_lowercase().contains(&needle)
                || e.record
                    .key_topics
                    .iter()
                    .any(|t| t.to_lowercase() == needle)
        });
    }

    if recent_only {
        let cutoff = time_utils::now() - Duration::days(RECENT_DAYS);
        breakthroughs.retain(|e| e.record.timestamp >= cutoff);
    }

    Ok(serde_json::Value::String(format_breakthroughs(
        &breakthroughs,
        &topic,
    )))
}

fn format_breakthroughs(breakthroughs: &[EnrichedRecord], topic: &str) -> String {
    if breakthroughs.is_empty() {
        return "No recorded breakthrough moments for this topic.".to_string();
    }

    let mut out = String::from("## Therapeutic Breakthroughs\n\n");

    if !topic.is_empty() {
        out.push_str(&format!("Focus: *{}*\n\n", topic));
    }

    for (i, entry) in breakthroughs.iter().take(4).enumerate() {
        let record = &entry.record;
        out.push_str(&format!(
            "**Breakthrough {}** ({})\n",
            i + 1,
            record.timestamp.format("%Y-%m-%d")
        ));
        out.push_str(&format!("*{}*\n", summary_or_excerpt(record, 150)));
        out.push_str(&format!(
            "Insight level: {:.1} | Category: {}\n\n",
            entry.insight_level,
            entry.category.as_str()
        ));
    }

    out.push_str("**Integration into the current interaction:**\n");
    out.push_str(
        "These moments carry the deepest learning in the journal and anchor \
         a wiser, more grounded response.",
    );
    out
}
