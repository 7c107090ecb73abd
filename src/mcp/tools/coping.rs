use therapy_memory::queries::{summary_or_excerpt, CopingStrategy};
use therapy_memory::record::{Category, SearchHit};
use therapy_memory::MemoryResult;

use super::{optional_str, ToolContext};

const SEARCH_LIMIT: usize = 5;

pub fn handle_coping(
    params: &serde_json::Value,
    ctx: &ToolContext,
) -> MemoryResult<serde_json::Value> {
    let challenge = optional_str(params, "challenge").unwrap_or_default();
    let situation_type =
        optional_str(params, "situation_type").unwrap_or_else(|| "general".to_string());
    let emotional_context = optional_str(params, "emotional_context").unwrap_or_default();

    let query = format!(
        "coping strategy {} {} {}",
        challenge, situation_type, emotional_context
    );

    let strategies = ctx.bank.coping_strategies();
    let hits = ctx
        .bank
        .search(&query, SEARCH_LIMIT, Some(Category::CopingMechanisms));

    Ok(serde_json::Value::String(format_strategies(
        &strategies,
        &hits,
        &challenge,
    )))
}

fn format_strategies(strategies: &[CopingStrategy], hits: &[SearchHit], challenge: &str) -> String {
    if strategies.is_empty() && hits.is_empty() {
        return "No coping strategies for this situation are recorded in the journal.".to_string();
    }

    let mut out = String::from("## Learned Coping Strategies\n\n");

    if !challenge.is_empty() {
        out.push_str(&format!("For the challenge: *{}*\n\n", challenge));
    }

    for (i, hit) in hits.iter().take(3).enumerate() {
        let record = &hit.record;
        out.push_str(&format!(
            "**Strategy {}:** {}\n",
            i + 1,
            summary_or_excerpt(record, 100)
        ));
        out.push_str(&format!(
            "*Learned: {}*\n\n",
            record.timestamp.format("%Y-%m-%d")
        ));
    }

    out.push_str("**Application guidance:**\n");
    out.push_str("- Apply these approaches to stay grounded under pressure\n");
    out.push_str("- Lean on what has already worked in similar situations\n");
    out.push_str("- Use this self-awareness to understand the other person's needs\n");
    out
}
