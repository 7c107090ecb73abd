use therapy_memory::queries::summary_or_excerpt;
use therapy_memory::record::{Category, SearchHit};
use therapy_memory::MemoryResult;

use super::{optional_str, ToolContext};

/// Per-category slices feeding the combined context.
const SECTIONS: &[(&str, Category, usize)] = &[
    ("Emotional intelligence insights", Category::EmotionalAwareness, 3),
    ("Relationship pattern insights", Category::RelationshipPatterns, 3),
    ("Communication style insights", Category::CommunicationStyle, 3),
    ("Coping strategies", Category::CopingMechanisms, 2),
];

pub fn handle_combined_context(
    params: &serde_json::Value,
    ctx: &ToolContext,
) -> MemoryResult<serde_json::Value> {
    let interaction_context = optional_str(params, "interaction_context").unwrap_or_default();
    let user_needs = optional_str(params, "user_needs").unwrap_or_default();
    let emotional_tone = optional_str(params, "emotional_tone").unwrap_or_default();

    let query = format!("{} {} {}", interaction_context, user_needs, emotional_tone);

    let mut out = String::from("## Combined Therapeutic Context\n\n");
    out.push_str(&format!("**Interaction context:** {}\n\n", interaction_context));

    let mut any = false;
    for &(title, category, limit) in SECTIONS {
        let hits = ctx.bank.search(&query, limit, Some(category));
        if hits.is_empty() {
            continue;
        }
        any = true;
        out.push_str(&format!("**{}:**\n", title));
        for hit in hits.iter().take(2) {
            out.push_str(&format!("- {}\n", excerpt(hit)));
        }
        out.push('\n');
    }

    if !any {
        return Ok(serde_json::Value::String(
            "No journal entries matched the current interaction context.".to_string(),
        ));
    }

    out.push_str("**Integrated guidance for this interaction:**\n");
    out.push_str(
        "Drawing on the journal, respond with emotional intelligence, genuine \
         empathy, and a clear read of what the other person needs.",
    );
    Ok(serde_json::Value::String(out))
}

fn excerpt(hit: &SearchHit) -> String {
    summary_or_excerpt(&hit.record, 80)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::test_support::{bank_over, write_record};
    use chrono::Utc;

    #[test]
    fn test_combined_context_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let bank = bank_over(dir.path());
        let ctx = ToolContext { bank: &bank };

        let out = handle_combined_context(
            &serde_json::json!({"interaction_context": "difficult feedback"}),
            &ctx,
        )
        .unwrap();
        assert!(out.as_str().unwrap().contains("No journal entries matched"));
    }

    #[test]
    fn test_combined_context_sections_per_category() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now().to_rfc3339();
        write_record(
            dir.path(),
            "emo",
            &now,
            "I feel tense when feedback arrives unannounced",
            &[],
        );
        write_record(
            dir.path(),
            "cope",
            &now,
            "Pausing before replying to feedback is a strategy that helps me",
            &[],
        );
        let bank = bank_over(dir.path());
        let ctx = ToolContext { bank: &bank };

        let out = handle_combined_context(
            &serde_json::json!({"interaction_context": "feedback conversation"}),
            &ctx,
        )
        .unwrap();
        let text = out.as_str().unwrap();
        assert!(text.contains("**Interaction context:** feedback conversation"));
        assert!(text.contains("**Emotional intelligence insights:**"));
        assert!(text.contains("**Coping strategies:**"));
        assert!(!text.contains("**Relationship pattern insights:**"));
        assert!(text.contains("**Integrated guidance for this interaction:**"));
    }
}
