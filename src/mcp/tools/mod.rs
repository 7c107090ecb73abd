pub mod breakthroughs;
pub mod context;
pub mod coping;
pub mod goals;
pub mod patterns;
pub mod reflect;
pub mod status;

use therapy_memory::bank::MemoryBank;
use therapy_memory::{MemoryError, MemoryResult};

/// Shared context passed to every tool handler.
pub struct ToolContext<'a> {
    pub bank: &'a MemoryBank,
}

/// Route a tool call by name to the appropriate handler.
pub fn route_tool(
    name: &str,
    params: &serde_json::Value,
    ctx: &ToolContext,
) -> MemoryResult<serde_json::Value> {
    tracing::info!(tool = %name, "MCP tool called");

    let result = match name {
        "reflect_on_history" => reflect::handle_reflect(params, ctx),
        "fetch_coping_strategies" => coping::handle_coping(params, ctx),
        "fetch_emotional_patterns" => patterns::handle_patterns(params, ctx),
        "fetch_breakthroughs" => breakthroughs::handle_breakthroughs(params, ctx),
        "fetch_goals" => goals::handle_goals(params, ctx),
        "fetch_statistics" => status::handle_statistics(params, ctx),
        "fetch_combined_context" => context::handle_combined_context(params, ctx),
        _ => Err(MemoryError::InvalidInput(format!("Unknown tool: {}", name))),
    };

    match &result {
        Ok(_) => tracing::debug!(tool = %name, "MCP tool success"),
        Err(e) => tracing::warn!(tool = %name, error = %e, "MCP tool error"),
    }
    result
}

// ── Parameter extraction helpers ──

pub fn optional_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

pub fn optional_bool(params: &serde_json::Value, key: &str) -> Option<bool> {
    params.get(key).and_then(|v| {
        v.as_bool().or_else(|| match v.as_str() {
            Some("true" | "1" | "yes") => Some(true),
            Some("false" | "0" | "no") => Some(false),
            _ => None,
        })
    })
}
