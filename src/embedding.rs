//! Embedding capability — the external seam for vector search.
//!
//! The search engine only needs `embed(text) -> Vec<f32>`. Two
//! implementations ship here: an offline TF-IDF hash embedder and an
//! HTTP provider speaking the OpenAI embeddings contract. Either may be
//! absent or failing, in which case search falls back to keyword scoring.

use md5::{Digest, Md5};
use serde::Deserialize;
use std::time::Duration;

use crate::error::{MemoryError, MemoryResult};

/// Dimension of the TF-IDF hash vector (fixed size).
const TFIDF_DIM: usize = 384;

/// Text-to-vector capability. Implementations must be cheap to call per
/// query; per-record embeddings are produced at write time by the external
/// producer and stored on the record.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> MemoryResult<Vec<f32>>;
}

/// Cosine similarity between two vectors.
///
/// Degenerate inputs (length mismatch, empty, zero norm) yield 0.0 rather
/// than NaN so ranking never has to special-case them.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Offline TF-IDF hash embedder: hashes unigrams and bigrams into a
/// fixed-dimension L2-normalized vector. No model download, deterministic.
pub struct HashEmbedder;

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> MemoryResult<Vec<f32>> {
        let mut vector = vec![0.0f32; TFIDF_DIM];

        let lower = text.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();
        if words.is_empty() {
            return Ok(vector);
        }

        for word in &words {
            let w = word.trim_matches(|c: char| !c.is_alphanumeric());
            if w.len() < 2 {
                continue;
            }
            hash_term_into(&mut vector, w, 1.0);
        }

        for pair in words.windows(2) {
            let bigram = format!(
                "{}_{}",
                pair[0].trim_matches(|c: char| !c.is_alphanumeric()),
                pair[1].trim_matches(|c: char| !c.is_alphanumeric())
            );
            hash_term_into(&mut vector, &bigram, 0.7);
        }

        // L2 normalize
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vector.iter_mut() {
                *v /= norm;
            }
        }

        Ok(vector)
    }
}

/// Hash a term into a fixed-dimension vector using MD5.
fn hash_term_into(vector: &mut [f32], term: &str, weight: f32) {
    let mut hasher = Md5::new();
    hasher.update(term.as_bytes());
    let hash = hasher.finalize();

    // First 4 bytes pick the slot, fifth byte the sign
    let idx = u32::from_le_bytes([hash[0], hash[1], hash[2], hash[3]]) as usize % vector.len();
    let sign = if hash[4] & 1 == 0 { 1.0f32 } else { -1.0f32 };
    vector[idx] += sign * weight;

    // Second position for better distribution
    let idx2 = u32::from_le_bytes([hash[5], hash[6], hash[7], hash[8]]) as usize % vector.len();
    let sign2 = if hash[9] & 1 == 0 { 1.0f32 } else { -1.0f32 };
    vector[idx2] += sign2 * weight * 0.5;
}

/// Remote embedding provider speaking the `POST {base}/embeddings` JSON
/// contract. Every failure mode (transport, non-2xx, decode, timeout) maps
/// to `MemoryError::Embedding` so callers can treat them uniformly.
pub struct RemoteEmbedder {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl RemoteEmbedder {
    pub fn new(api_base: &str, api_key: String, model: String, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            endpoint: format!("{}/embeddings", api_base.trim_end_matches('/')),
            api_key,
            model,
        }
    }
}

impl Embedder for RemoteEmbedder {
    fn embed(&self, text: &str) -> MemoryResult<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(|e| MemoryError::Embedding(format!("request failed: {}", e)))?;

        let parsed: EmbeddingResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| MemoryError::Embedding(format!("bad response: {}", e)))?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| MemoryError::Embedding("no embedding data returned".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embed_produces_vector() {
        let v = HashEmbedder.embed("hello world").unwrap();
        assert_eq!(v.len(), TFIDF_DIM);
        assert!(v.iter().any(|x| *x != 0.0));
    }

    #[test]
    fn test_hash_embed_empty_text() {
        let v = HashEmbedder.embed("").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_similar_texts_score_higher() {
        let a = HashEmbedder.embed("anxiety before difficult conversations").unwrap();
        let b = HashEmbedder.embed("anxiety around difficult conversations").unwrap();
        let c = HashEmbedder.embed("french cooking recipes").unwrap();
        assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
    }

    #[test]
    fn test_self_similarity_is_one() {
        let v = HashEmbedder.embed("test text").unwrap();
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
