use std::io::{self, BufRead, Write};

use therapy_memory::bank::MemoryBank;
use therapy_memory::config::MemoryConfig;
use therapy_memory::MemoryResult;

use super::jsonrpc::{self, JsonRpcResponse};
use super::tools::{self, ToolContext};

pub struct McpServer {
    bank: MemoryBank,
}

impl McpServer {
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            bank: MemoryBank::new(config),
        }
    }

    pub fn run(&mut self) -> MemoryResult<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };

            if line.trim().is_empty() {
                continue;
            }

            if let Some(resp) = self.handle_message(&line) {
                let out = jsonrpc::format_response(&resp);
                let _ = writeln!(stdout, "{}", out);
                let _ = stdout.flush();
            }
        }

        Ok(())
    }

    fn handle_message(&self, input: &str) -> Option<JsonRpcResponse> {
        tracing::debug!(input_len = input.len(), "MCP request received");
        let request = match jsonrpc::parse_request(input) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    -32700,
                    format!("Parse error: {}", e),
                ));
            }
        };

        // Notifications (no id) don't get responses
        if request.id.is_none() {
            return None;
        }

        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(id)),
            "tools/list" => Some(self.handle_tools_list(id)),
            "tools/call" => Some(self.handle_tools_call(id, &request.params)),
            _ => Some(JsonRpcResponse::error(
                id,
                -32601,
                format!("Method not found: {}", request.method),
            )),
        }
    }

    fn handle_initialize(&self, id: Option<serde_json::Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "therapy-memory",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<serde_json::Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            serde_json::json!({
                "tools": tool_definitions()
            }),
        )
    }

    fn handle_tools_call(
        &self,
        id: Option<serde_json::Value>,
        params: &Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let params = match params {
            Some(p) => p,
            None => {
                return JsonRpcResponse::error(id, -32602, "Missing params".into());
            }
        };

        let tool_name = match params.get("name").and_then(|v| v.as_str()) {
            Some(n) => n,
            None => {
                return JsonRpcResponse::error(id, -32602, "Missing tool name".into());
            }
        };

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        let ctx = ToolContext { bank: &self.bank };
        tracing::debug!(tool = %tool_name, "MCP tools/call dispatching");

        match tools::route_tool(tool_name, &arguments, &ctx) {
            Ok(result) => {
                // Narrative tools return plain markdown; structured tools
                // return objects, rendered as pretty JSON.
                let text = match result {
                    serde_json::Value::String(s) => s,
                    other => serde_json::to_string_pretty(&other)
                        .unwrap_or_else(|_| other.to_string()),
                };
                JsonRpcResponse::success(
                    id,
                    serde_json::json!({
                        "content": [{"type": "text", "text": text}]
                    }),
                )
            }
            Err(e) => JsonRpcResponse::success(
                id,
                serde_json::json!({
                    "content": [{"type": "text", "text": format!("Error: {}", e)}],
                    "isError": true
                }),
            ),
        }
    }
}

fn tool_definitions() -> Vec<serde_json::Value> {
    vec![
        tool_def(
            "reflect_on_history",
            "Reflect on the therapeutic journey and insights to inform the current interaction",
            &[
                ("focus_area", "string", "Area of focus: general, emotional_awareness, relationships, communication, growth, coping, self_discovery, goals"),
                ("time_period", "string", "Time period: recent, session, or all"),
                ("include_breakthroughs", "boolean", "Whether to highlight breakthrough moments"),
            ],
        ),
        tool_def(
            "fetch_coping_strategies",
            "Retrieve learned coping strategies for handling a challenging situation",
            &[
                ("challenge", "string", "Current challenge or difficult situation"),
                ("situation_type", "string", "Type of situation (emotional, technical, interpersonal)"),
                ("emotional_context", "string", "Emotional context of the situation"),
            ],
        ),
        tool_def(
            "fetch_emotional_patterns",
            "Surface recognized emotional patterns relevant to the current context",
            &[
                ("context", "string", "Current interaction context"),
                ("user_emotional_state", "string", "Perceived emotional state of the counterpart"),
                ("interaction_type", "string", "Type of interaction (support, technical, creative)"),
            ],
        ),
        tool_def(
            "fetch_breakthroughs",
            "Access breakthrough moments and the highest-insight journal entries",
            &[
                ("topic", "string", "Specific topic to focus breakthrough recall on"),
                ("recent_only", "boolean", "Restrict to the last 14 days"),
            ],
        ),
        tool_def(
            "fetch_goals",
            "Review therapeutic goals and progress",
            &[
                ("category", "string", "Category of goals to review"),
                ("include_progress", "boolean", "Whether to include progress insights"),
            ],
        ),
        tool_def(
            "fetch_statistics",
            "Get an overview of the memory bank and its progress metrics",
            &[("include_details", "boolean", "Whether to include detailed statistics")],
        ),
        tool_def(
            "fetch_combined_context",
            "Build combined therapeutic context across emotional, relationship, communication and coping categories",
            &[
                ("interaction_context", "string", "Context of the current interaction"),
                ("user_needs", "string", "Perceived needs of the counterpart"),
                ("emotional_tone", "string", "Emotional tone of the interaction"),
            ],
        ),
    ]
}

fn tool_def(name: &str, desc: &str, params: &[(&str, &str, &str)]) -> serde_json::Value {
    let mut props = serde_json::Map::new();
    for &(pname, ptype, pdesc) in params {
        props.insert(
            pname.to_string(),
            serde_json::json!({"type": ptype, "description": pdesc}),
        );
    }
    serde_json::json!({
        "name": name,
        "description": desc,
        "inputSchema": {
            "type": "object",
            "properties": props,
            "required": []
        }
    })
}
