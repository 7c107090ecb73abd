use therapy_memory::classify;
use therapy_memory::queries::{summary_or_excerpt, EmotionalPattern};
use therapy_memory::record::{Category, SearchHit};
use therapy_memory::MemoryResult;

use super::{optional_str, ToolContext};

const SEARCH_LIMIT: usize = 5;

pub fn handle_patterns(
    params: &serde_json::Value,
    ctx: &ToolContext,
) -> MemoryResult<serde_json::Value> {
    let context = optional_str(params, "context").unwrap_or_default();
    let user_state = optional_str(params, "user_emotional_state").unwrap_or_default();
    let interaction_type =
        optional_str(params, "interaction_type").unwrap_or_else(|| "general".to_string());

    let patterns = ctx.bank.emotional_patterns();

    let query = format!(
        "emotional response {} {} {}",
        context, user_state, interaction_type
    );
    let hits = ctx
        .bank
        .search(&query, SEARCH_LIMIT, Some(Category::EmotionalAwareness));

    Ok(serde_json::Value::String(format_guidance(
        &patterns, &hits, &context,
    )))
}

fn format_guidance(patterns: &[EmotionalPattern], hits: &[SearchHit], context: &str) -> String {
    let mut out = String::from("## Emotional Patterns & Guidance\n\n");

    if context.is_empty() && patterns.is_empty() && hits.is_empty() {
        out.push_str("No emotional patterns are recorded in the journal yet.\n");
        return out;
    }

    if !context.is_empty() {
        out.push_str(&format!("Context: *{}*\n\n", context));
    }

    if !hits.is_empty() {
        out.push_str("**Relevant emotional insights:**\n");
        for hit in hits.iter().take(3) {
            let record = &hit.record;
            out.push_str(&format!("- {}\n", summary_or_excerpt(record, 100)));
            out.push_str(&format!(
                "  *Emotional intensity: {}*\n",
                classify::emotional_intensity(record).as_str()
            ));
        }
    }

    if !patterns.is_empty() {
        out.push_str("\n**Recognized patterns:**\n");
        for pattern in patterns {
            out.push_str(&format!("- {}\n", pattern.description));
        }
    }

    out.push_str("\n**How this guides the response:**\n");
    out.push_str("- Stay emotionally attuned rather than reactive\n");
    out.push_str("- Name the pattern instead of repeating it\n");
    out.push_str("- Offer support grounded in what has actually helped before\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::test_support::{bank_over, write_record};
    use chrono::Utc;

    #[test]
    fn test_patterns_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let bank = bank_over(dir.path());
        let ctx = ToolContext { bank: &bank };

        let out = handle_patterns(&serde_json::json!({}), &ctx).unwrap();
        assert!(out.as_str().unwrap().contains("No emotional patterns"));
    }

    #[test]
    fn test_patterns_reports_intensity() {
        let dir = tempfile::tempdir().unwrap();
        write_record(
            dir.path(),
            "intense",
            &Utc::now().to_rfc3339(),
            "I feel an overwhelming emotional response when plans change",
            &[],
        );
        let bank = bank_over(dir.path());
        let ctx = ToolContext { bank: &bank };

        let out = handle_patterns(&serde_json::json!({"context": "sudden changes"}), &ctx).unwrap();
        let text = out.as_str().unwrap();
        assert!(text.contains("Context: *sudden changes*"));
        assert!(text.contains("Emotional intensity:"));
        assert!(text.contains("**Recognized patterns:**"));
    }
}
