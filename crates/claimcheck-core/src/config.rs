//! Runtime configuration for the claim checking pipeline.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, Result};

/// Pipeline limits and timeouts.
///
/// Defaults can be overridden from a TOML file ([`CheckerConfig::load`]) or
/// from `CLAIMCHECK_*` environment variables ([`CheckerConfig::from_env`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Maximum number of candidate documents considered per claim.
    pub max_sources: usize,
    /// Only the first `max_sentences` candidates of a document are embedded.
    pub max_sentences: usize,
    /// Sentence candidates with this many words or fewer are discarded.
    pub min_sentence_words: usize,
    /// Per-document verification timeout.
    pub embed_timeout_ms: u64,
    /// Documents verified concurrently.
    pub max_concurrency: usize,
    /// Extracted article text is truncated to this many characters.
    pub max_content_chars: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_sources: 10,
            max_sentences: 50,
            min_sentence_words: 5,
            embed_timeout_ms: 10_000,
            max_concurrency: 4,
            max_content_chars: 10_000,
        }
    }
}

impl CheckerConfig {
    /// Defaults overridden by `CLAIMCHECK_MAX_SOURCES`, `CLAIMCHECK_MAX_SENTENCES`,
    /// `CLAIMCHECK_EMBED_TIMEOUT_MS` and `CLAIMCHECK_MAX_CONCURRENCY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = parse_var(&lookup, "CLAIMCHECK_MAX_SOURCES")? {
            cfg.max_sources = v;
        }
        if let Some(v) = parse_var(&lookup, "CLAIMCHECK_MAX_SENTENCES")? {
            cfg.max_sentences = v;
        }
        if let Some(v) = parse_var(&lookup, "CLAIMCHECK_EMBED_TIMEOUT_MS")? {
            cfg.embed_timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "CLAIMCHECK_MAX_CONCURRENCY")? {
            cfg.max_concurrency = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a config from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("max_sources", self.max_sources),
            ("max_sentences", self.max_sentences),
            ("max_concurrency", self.max_concurrency),
        ] {
            if value == 0 {
                return Err(CheckError::InvalidConfig(format!(
                    "{} must be positive",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn embed_timeout(&self) -> Duration {
        Duration::from_millis(self.embed_timeout_ms)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CheckError::InvalidConfig(format!("{}={:?} is not a number", key, raw))),
    }
}
