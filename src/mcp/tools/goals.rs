use therapy_memory::queries::{summary_or_excerpt, Insight};
use therapy_memory::record::{Category, SearchHit};
use therapy_memory::MemoryResult;

use super::{optional_bool, optional_str, ToolContext};

const SEARCH_LIMIT: usize = 10;
const GOAL_QUERY: &str = "goals progress development improvement growth objectives";

pub fn handle_goals(
    params: &serde_json::Value,
    ctx: &ToolContext,
) -> MemoryResult<serde_json::Value> {
    let _category = optional_str(params, "category").unwrap_or_else(|| "all".to_string());
    let include_progress = optional_bool(params, "include_progress").unwrap_or(true);

    let hits = ctx
        .bank
        .search(GOAL_QUERY, SEARCH_LIMIT, Some(Category::TherapeuticGoals));
    let insights = ctx.bank.insights(Some(Category::TherapeuticGoals));

    Ok(serde_json::Value::String(format_goals(
        &hits,
        &insights,
        include_progress,
    )))
}

fn format_goals(hits: &[SearchHit], insights: &[Insight], include_progress: bool) -> String {
    if hits.is_empty() && insights.is_empty() {
        return "No goal-related entries are recorded in the journal yet.".to_string();
    }

    let mut out = String::from("## Therapeutic Goals & Progress\n\n");

    if !hits.is_empty() {
        out.push_str("**Goal-related insights:**\n");
        for hit in hits.iter().take(4) {
            let record = &hit.record;
            out.push_str(&format!("- {}\n", summary_or_excerpt(record, 120)));
            out.push_str(&format!("  *{}*\n", record.timestamp.format("%Y-%m-%d")));
        }
    }

    if include_progress && !insights.is_empty() {
        out.push_str("\n**Progress markers:**\n");
        for insight in insights.iter().take(3) {
            out.push_str(&format!(
                "- {} (confidence {:.1})\n",
                insight.content, insight.confidence
            ));
        }
    }

    out.push_str("\n**How this guides development:**\n");
    out.push_str("- Keep goal-oriented thinking in view during conversations\n");
    out.push_str("- Weigh progress honestly rather than by mood\n");
    out.push_str("- Share growth lessons where they genuinely apply\n");
    out
}
