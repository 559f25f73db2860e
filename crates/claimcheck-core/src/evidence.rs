//! Evidence data model and the retrieval/parsing collaborator interfaces.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::text::ClaimText;

/// Stance of one evidence sentence toward the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Supports,
    Refutes,
    NoEvidence,
}

impl Stance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supports => "supports",
            Self::Refutes => "refutes",
            Self::NoEvidence => "no_evidence",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Judgment of a single evidence document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceJudgment {
    pub verdict: Stance,
    /// In [0, 1].
    pub confidence: f64,
    /// Cosine similarity between the claim and `snippet`.
    pub similarity: f64,
    /// Best-matching evidence sentence.
    pub snippet: String,
}

impl EvidenceJudgment {
    /// Judgment for a document without any usable sentence.
    pub fn no_evidence() -> Self {
        Self {
            verdict: Stance::NoEvidence,
            confidence: 0.0,
            similarity: 0.0,
            snippet: String::new(),
        }
    }
}

/// A candidate document as delivered by the retrieval collaborator.
///
/// URL resolution and de-duplication have already happened upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCandidate {
    pub source: String,
    pub url: String,
    #[serde(default)]
    pub published: String,
    /// Trust weight of the outlet, in [0, 1].
    pub reliability: f64,
}

/// An [`EvidenceJudgment`] enriched with its source metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvidence {
    pub source: String,
    pub url: String,
    pub published: String,
    pub reliability: f64,
    pub verdict: Stance,
    pub confidence: f64,
    pub similarity: f64,
    pub snippet: String,
}

impl ScoredEvidence {
    pub fn new(candidate: &SourceCandidate, judgment: EvidenceJudgment) -> Self {
        Self {
            source: candidate.source.clone(),
            url: candidate.url.clone(),
            published: candidate.published.clone(),
            reliability: candidate.reliability.clamp(0.0, 1.0),
            verdict: judgment.verdict,
            confidence: judgment.confidence,
            similarity: judgment.similarity,
            snippet: judgment.snippet,
        }
    }

    /// Aggregation weight: reliability x confidence x similarity.
    pub fn weight(&self) -> f64 {
        self.reliability * self.confidence * self.similarity
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Finds candidate documents for a claim.
#[async_trait]
pub trait EvidenceRetriever: Send + Sync {
    async fn search(&self, claim: &ClaimText, max_results: usize) -> Result<Vec<SourceCandidate>>;
}

/// Extracts plain article text from a URL.
///
/// An empty string signals extraction failure; the document is skipped.
#[async_trait]
pub trait ArticleParser: Send + Sync {
    async fn parse(&self, url: &str) -> String;
}

// ---------------------------------------------------------------------------
// StaticCorpus
// ---------------------------------------------------------------------------

/// A document with pre-extracted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub source: String,
    pub url: String,
    #[serde(default)]
    pub published: String,
    pub reliability: f64,
    #[serde(default)]
    pub content: String,
}

/// In-memory retriever and parser over a fixed document set.
///
/// Every document is a candidate for every claim. Duplicate URLs keep their
/// first occurrence.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    documents: Vec<CorpusDocument>,
}

impl StaticCorpus {
    pub fn new(documents: Vec<CorpusDocument>) -> Self {
        let mut seen = HashSet::new();
        let documents = documents
            .into_iter()
            .filter(|d| seen.insert(d.url.clone()))
            .collect();
        Self { documents }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let documents: Vec<CorpusDocument> = serde_json::from_str(s)?;
        Ok(Self::new(documents))
    }

    /// Load a JSON array of [`CorpusDocument`]s.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl EvidenceRetriever for StaticCorpus {
    async fn search(&self, _claim: &ClaimText, max_results: usize) -> Result<Vec<SourceCandidate>> {
        Ok(self
            .documents
            .iter()
            .take(max_results)
            .map(|d| SourceCandidate {
                source: d.source.clone(),
                url: d.url.clone(),
                published: d.published.clone(),
                reliability: d.reliability,
            })
            .collect())
    }
}

#[async_trait]
impl ArticleParser for StaticCorpus {
    async fn parse(&self, url: &str) -> String {
        self.documents
            .iter()
            .find(|d| d.url == url)
            .map(|d| d.content.clone())
            .unwrap_or_default()
    }
}
