use chrono::Duration;

use therapy_memory::classify;
use therapy_memory::queries::summary_or_excerpt;
use therapy_memory::record::{Category, SearchHit};
use therapy_memory::{time_utils, MemoryResult};

use super::{optional_bool, optional_str, ToolContext};

const SEARCH_LIMIT: usize = 8;

fn focus_category(focus_area: &str) -> Option<Category> {
    match focus_area {
        "emotional_awareness" => Some(Category::EmotionalAwareness),
        "relationships" => Some(Category::RelationshipPatterns),
        "communication" => Some(Category::CommunicationStyle),
        "growth" => Some(Category::GrowthMoments),
        "coping" => Some(Category::CopingMechanisms),
        "self_discovery" => Some(Category::SelfDiscovery),
        "goals" => Some(Category::TherapeuticGoals),
        _ => None,
    }
}

pub fn handle_reflect(
    params: &serde_json::Value,
    ctx: &ToolContext,
) -> MemoryResult<serde_json::Value> {
    let focus_area = optional_str(params, "focus_area").unwrap_or_else(|| "general".to_string());
    let time_period = optional_str(params, "time_period").unwrap_or_else(|| "recent".to_string());
    let include_breakthroughs = optional_bool(params, "include_breakthroughs").unwrap_or(true);

    let query = if focus_area == "general" {
        "therapeutic insights personal growth emotional development".to_string()
    } else {
        format!("{} therapeutic insights growth learning", focus_area)
    };

    let mut hits = ctx.bank.search(&query, SEARCH_LIMIT, focus_category(&focus_area));

    let cutoff = match time_period.as_str() {
        "recent" => Some(time_utils::now() - Duration::days(30)),
        "session" => Some(time_utils::now() - Duration::days(1)),
        _ => None,
    };
    if let Some(cutoff) = cutoff {
        hits.retain(|h| h.record.timestamp >= cutoff);
    }

    Ok(serde_json::Value::String(format_reflection(
        &hits,
        &focus_area,
        include_breakthroughs,
    )))
}

fn format_reflection(hits: &[SearchHit], focus_area: &str, include_breakthroughs: bool) -> String {
    if hits.is_empty() {
        return format!(
            "No journal entries about {} to reflect on right now.",
            focus_area
        );
    }

    let mut out = format!("## Therapeutic Insights: {}\n\n", focus_area);

    for (i, hit) in hits.iter().take(5).enumerate() {
        let record = &hit.record;
        let days_ago = (time_utils::now() - record.timestamp).num_days();
        let insight = classify::insight_level(record);

        out.push_str(&format!("**{}. Insight from {} days ago**", i + 1, days_ago));
        if include_breakthroughs && classify::is_breakthrough(record) {
            out.push_str(" *Breakthrough moment*");
        }
        out.push_str(&format!(" (Insight level: {:.1})\n", insight));
        out.push_str(&format!("*{}*\n", summary_or_excerpt(record, 150)));
        if !record.key_topics.is_empty() {
            out.push_str(&format!("Topics: {}\n", record.key_topics.join(", ")));
        }
        out.push_str(&format!(
            "Category: {}\n\n",
            classify::categorize(record).as_str()
        ));
    }

    out.push_str("\n**How this informs the current interaction:**\n");
    out.push_str(
        "These insights support responding with greater emotional intelligence, \
         authenticity, and understanding of recurring patterns.",
    );
    out
}
