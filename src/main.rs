mod mcp;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use therapy_memory::bank::MemoryBank;
use therapy_memory::config::MemoryConfig;
use therapy_memory::record::Category;

#[derive(Parser)]
#[command(name = "therapy-memory", version, about = "Therapy Memory — read-only retrieval over a therapeutic journal")]
struct App {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run MCP server (JSON-RPC on stdin/stdout)
    Mcp,
    /// Show memory bank statistics
    Stats,
    /// Search journal records
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Restrict to a category (snake_case, e.g. coping_mechanisms)
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() {
    let app = App::parse();

    match app.command {
        Commands::Mcp => {
            mcp::run(app.config.as_deref());
        }
        Commands::Stats => {
            run_stats(app.config.as_deref()).unwrap_or_else(|e| eprintln!("Error: {}", e));
        }
        Commands::Search { query, limit, category } => {
            run_search(app.config.as_deref(), &query, limit, category.as_deref())
                .unwrap_or_else(|e| eprintln!("Error: {}", e));
        }
    }
}

fn run_stats(config_path: Option<&std::path::Path>) -> therapy_memory::MemoryResult<()> {
    therapy_memory::tracing_init::init_stderr_tracing();
    let config = MemoryConfig::load_or_default(config_path)?;
    let bank = MemoryBank::new(&config);
    let stats = bank.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn run_search(
    config_path: Option<&std::path::Path>,
    query: &str,
    limit: usize,
    category: Option<&str>,
) -> therapy_memory::MemoryResult<()> {
    therapy_memory::tracing_init::init_stderr_tracing();
    let category = category
        .map(|s| {
            s.parse::<Category>()
                .map_err(therapy_memory::MemoryError::InvalidInput)
        })
        .transpose()?;

    let config = MemoryConfig::load_or_default(config_path)?;
    let bank = MemoryBank::new(&config);
    let hits = bank.search(query, limit, category);

    if hits.is_empty() {
        println!("No matching records.");
        return Ok(());
    }
    for hit in &hits {
        println!(
            "{:.3}  {}  [{}]  {}",
            hit.ranking_score(),
            hit.record.timestamp.format("%Y-%m-%d"),
            hit.record.id,
            therapy_memory::queries::summary_or_excerpt(&hit.record, 100)
        );
    }
    Ok(())
}
