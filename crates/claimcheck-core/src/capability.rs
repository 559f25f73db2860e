//! Injected capabilities: sentence embedding and statistical style scoring.
//!
//! Both are trait seams so the engine can run against a neural encoder and a
//! trained model in production, and against deterministic stubs in tests.
//! Built-in implementations:
//! - [`HashingEmbedder`]: feature-hashed bag-of-words vectors, no model files.
//! - [`LinearTextClassifier`]: linear model over idf-weighted n-gram counts,
//!   loaded from a JSON artifact produced by an offline training step.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CheckError, ClassifierError, Result};

/// Maps a batch of texts to fixed-dimension dense vectors.
///
/// Implementations must be deterministic: identical input text yields an
/// identical vector, so verification is reproducible.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Maps text to a single real-valued decision score (positive leans
/// sensational). Optional: the style analyzer works without one.
pub trait StyleClassifier: Send + Sync {
    fn decision(&self, text: &str) -> std::result::Result<f64, ClassifierError>;
}

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("static word pattern"))
}

fn tokens(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    word_regex()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// HashingEmbedder
// ---------------------------------------------------------------------------

/// Deterministic feature-hashing embedder.
///
/// Each lower-cased token is hashed with SHA-256; the first eight bytes pick a
/// bucket and a sign. The vector is L2-normalised, so cosine similarity tracks
/// vocabulary overlap. Text without tokens embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIM: usize = 384;

    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(CheckError::InvalidConfig(
                "embedding dimension must be positive".to_string(),
            ));
        }
        Ok(Self { dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        for tok in tokens(text) {
            let digest = Sha256::digest(tok.as_bytes());
            let mut head = [0u8; 8];
            head.copy_from_slice(&digest[..8]);
            let h = u64::from_le_bytes(head);
            let bucket = (h % self.dim as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[bucket] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dim: Self::DEFAULT_DIM,
        }
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

// ---------------------------------------------------------------------------
// LinearTextClassifier
// ---------------------------------------------------------------------------

fn default_ngram_max() -> usize {
    1
}

/// On-disk form of a trained linear style model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    /// Term (space-joined n-gram) to feature index.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature.
    pub idf: Vec<f64>,
    /// One weight per feature.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,
    /// Tokens removed before n-grams are formed, so "secret of the truth"
    /// yields the bigram "secret truth" when "of" and "the" are listed.
    #[serde(default)]
    pub stop_words: Vec<String>,
}

/// Linear classifier over an idf-weighted, L2-normalised bag of n-grams.
#[derive(Debug, Clone)]
pub struct LinearTextClassifier {
    model: LinearModelArtifact,
    stop_words: HashSet<String>,
}

impl LinearTextClassifier {
    pub fn new(model: LinearModelArtifact) -> Self {
        let stop_words = model
            .stop_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .collect();
        Self { model, stop_words }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(s)?))
    }

    /// Load a model artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    fn term_counts(&self, text: &str) -> HashMap<usize, f64> {
        let mut toks = tokens(text);
        toks.retain(|t| !self.stop_words.contains(t));
        let mut counts = HashMap::new();
        for n in 1..=self.model.ngram_max.max(1) {
            for window in toks.windows(n) {
                if let Some(&idx) = self.model.vocabulary.get(&window.join(" ")) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }
        counts
    }
}

impl StyleClassifier for LinearTextClassifier {
    fn decision(&self, text: &str) -> std::result::Result<f64, ClassifierError> {
        let features = self.model.coefficients.len();
        if self.model.idf.len() != features {
            return Err(ClassifierError::FeatureMismatch {
                expected: features,
                actual: self.model.idf.len(),
            });
        }

        let mut weighted = Vec::new();
        for (idx, tf) in self.term_counts(text) {
            if idx >= features {
                return Err(ClassifierError::FeatureMismatch {
                    expected: features,
                    actual: idx + 1,
                });
            }
            weighted.push((idx, tf * self.model.idf[idx]));
        }

        let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        let dot: f64 = if norm > 0.0 {
            weighted
                .iter()
                .map(|(idx, w)| (w / norm) * self.model.coefficients[*idx])
                .sum()
        } else {
            0.0
        };

        let decision = dot + self.model.intercept;
        if decision.is_finite() {
            Ok(decision)
        } else {
            Err(ClassifierError::NonFinite)
        }
    }
}
