use therapy_memory::MemoryResult;

use super::{optional_bool, ToolContext};

/// Structured statistics, unlike the narrative tools.
pub fn handle_statistics(
    params: &serde_json::Value,
    ctx: &ToolContext,
) -> MemoryResult<serde_json::Value> {
    let include_details = optional_bool(params, "include_details").unwrap_or(true);

    let stats = ctx.bank.stats();

    let mut out = serde_json::json!({
        "total_records": stats.total_records,
        "breakthrough_count": stats.breakthrough_count,
        "high_insight_count": stats.high_insight_count,
        "emotional_awareness_count": stats.emotional_awareness_count,
    });

    if include_details {
        let details = serde_json::json!({
            "oldest": stats.oldest.to_rfc3339(),
            "newest": stats.newest.to_rfc3339(),
            "storage_size_kb": stats.storage_size_bytes as f64 / 1024.0,
        });
        if let Some(map) = out.as_object_mut() {
            map.insert("details".to_string(), details);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tools::test_support::{bank_over, write_record};
    use crate::mcp::tools::ToolContext;

    #[test]
    fn test_statistics_empty_store_is_zeroed() {
        let dir = tempfile::tempdir().unwrap();
        let bank = bank_over(dir.path());
        let ctx = ToolContext { bank: &bank };

        let out = handle_statistics(&serde_json::json!({}), &ctx).unwrap();
        assert_eq!(out["total_records"], 0);
        assert_eq!(out["breakthrough_count"], 0);
        assert!(out["details"].is_object());
    }

    #[test]
    fn test_statistics_counts_and_details() {
        let dir = tempfile::tempdir().unwrap();
        write_record(
            dir.path(),
            "s-1",
            "2026-03-01T08:00:00Z",
            "A quiet check-in about the week",
            &[],
        );
        write_record(
            dir.path(),
            "s-2",
            "2026-03-02T08:00:00Z",
            "A breakthrough about how i feel in groups",
            &[],
        );
        let bank = bank_over(dir.path());
        let ctx = ToolContext { bank: &bank };

        let out = handle_statistics(&serde_json::json!({}), &ctx).unwrap();
        assert_eq!(out["total_records"], 2);
        assert_eq!(out["breakthrough_count"], 1);
        assert_eq!(out["emotional_awareness_count"], 1);
        assert!(out["details"]["oldest"]
            .as_str()
            .unwrap()
            .starts_with("2026-03-01"));

        let compact = handle_statistics(&serde_json::json!({"include_details": false}), &ctx).unwrap();
        assert!(compact.get("details").is_none());
    }
}
