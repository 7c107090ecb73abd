pub mod jsonrpc;
pub mod server;
pub mod tools;

use std::path::Path;

use server::McpServer;
use therapy_memory::config::MemoryConfig;

/// Run MCP JSON-RPC server on stdin/stdout.
pub fn run(config_path: Option<&Path>) {
    let config = match MemoryConfig::load_or_default(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[therapy-mcp] Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // stdout is owned by the protocol, so logs go to a file next to the
    // data directory.
    therapy_memory::tracing_init::init_file_tracing(&config.data_dir);
    tracing::info!(data_dir = %config.data_dir.display(), "MCP server starting");

    let mut server = McpServer::new(&config);
    if let Err(e) = server.run() {
        eprintln!("[therapy-mcp] Server error: {}", e);
    }
}
