//! Runtime configuration. Everything has a sensible default so the
//! binary runs with no config file at all; `THERAPY_MEMORY_DIR` points
//! the bank at a non-default journal directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::embedding::{Embedder, HashEmbedder, RemoteEmbedder};
use crate::error::MemoryResult;

pub const DATA_DIR_ENV: &str = "THERAPY_MEMORY_DIR";

const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_LOAD_TIMEOUT_SECS: u64 = 10;
const DEFAULT_EMBED_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub data_dir: PathBuf,
    pub cache_ttl_secs: u64,
    pub load_timeout_secs: u64,
    pub embedding: EmbeddingConfig,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            load_timeout_secs: DEFAULT_LOAD_TIMEOUT_SECS,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl MemoryConfig {
    /// Reads `path` if it exists, otherwise falls back to defaults.
    /// The environment override for the data directory wins either way.
    pub fn load_or_default(path: Option<&Path>) -> MemoryResult<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(p)?;
                serde_json::from_str(&raw)?
            }
            _ => Self::default(),
        };
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

/// How query embeddings are produced. `Remote` silently degrades to no
/// embedder when the API key variable is unset, so a machine without
/// credentials still serves keyword search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    Remote,
    Hash,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub mode: EmbeddingMode,
    pub api_base: String,
    pub api_key_env: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            mode: EmbeddingMode::Remote,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            model: DEFAULT_EMBED_MODEL.to_string(),
            timeout_secs: DEFAULT_EMBED_TIMEOUT_SECS,
        }
    }
}

impl EmbeddingConfig {
    pub fn build(&self) -> Option<Box<dyn Embedder>> {
        match self.mode {
            EmbeddingMode::Disabled => None,
            EmbeddingMode::Hash => Some(Box::new(HashEmbedder)),
            EmbeddingMode::Remote => match std::env::var(&self.api_key_env) {
                Ok(key) if !key.is_empty() => Some(Box::new(RemoteEmbedder::new(
                    &self.api_base,
                    key,
                    self.model.clone(),
                    Duration::from_secs(self.timeout_secs),
                ))),
                _ => {
                    tracing::warn!(
                        key_env = %self.api_key_env,
                        "Embedding API key not set, vector search disabled"
                    );
                    None
                }
            },
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".therapy-memory")
        .join("records")
}
