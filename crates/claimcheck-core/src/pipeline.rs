//! End-to-end claim checking.
//!
//! [`FactChecker`] wires the collaborators together: style analysis once per
//! claim, bounded-concurrency verification of every retrieved document, then
//! hybrid scoring over the surviving evidence.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::capability::Embedder;
use crate::config::CheckerConfig;
use crate::error::{CheckError, Result};
use crate::evidence::{ArticleParser, EvidenceRetriever, ScoredEvidence, SourceCandidate, Stance};
use crate::lexicon::Lexicon;
use crate::metrics::METRICS;
use crate::obs;
use crate::scorer::{EvidenceCount, FinalScore, HybridScorer, Verdict};
use crate::style::{StyleAnalyzer, StyleFeatures, StyleResult};
use crate::text::ClaimText;
use crate::verifier::EvidenceVerifier;

pub const NO_SOURCES_REASONING: &str = "No evidence sources found";
pub const NO_VERIFIABLE_REASONING: &str = "No verifiable evidence found";

/// A document whose verification failed. Other documents are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFailure {
    pub source: String,
    pub url: String,
    /// Machine-readable error kind, see [`CheckError::kind`].
    pub kind: String,
    pub message: String,
}

/// Full result of checking one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub check_id: Uuid,
    pub claim: ClaimText,
    pub verdict: Verdict,
    pub confidence: f64,
    pub reasoning: String,
    pub scores: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_count: Option<EvidenceCount>,
    /// Evidence that reached the scorer, in retrieval order.
    pub evidence: Vec<ScoredEvidence>,
    pub style_features: StyleFeatures,
    #[serde(default)]
    pub failures: Vec<DocumentFailure>,
    pub checked_at: DateTime<Utc>,
}

impl CheckReport {
    fn new(
        claim: ClaimText,
        style: StyleResult,
        score: FinalScore,
        evidence: Vec<ScoredEvidence>,
        failures: Vec<DocumentFailure>,
    ) -> Self {
        Self {
            check_id: Uuid::new_v4(),
            claim,
            verdict: score.verdict,
            confidence: score.confidence,
            reasoning: score.reasoning,
            scores: score.scores,
            evidence_count: score.evidence_count,
            evidence,
            style_features: style.features,
            failures,
            checked_at: Utc::now(),
        }
    }
}

/// Outcome of verifying a single candidate document.
enum DocumentOutcome {
    Evidence(ScoredEvidence),
    Skipped,
    Failed(DocumentFailure),
}

/// Orchestrates retrieval, verification and scoring for a claim.
#[derive(Clone)]
pub struct FactChecker {
    retriever: Arc<dyn EvidenceRetriever>,
    parser: Arc<dyn ArticleParser>,
    style: StyleAnalyzer,
    verifier: EvidenceVerifier,
    scorer: HybridScorer,
    config: CheckerConfig,
}

impl FactChecker {
    /// Build a checker with the default lexicon, no style classifier and
    /// default limits.
    pub fn new(
        retriever: Arc<dyn EvidenceRetriever>,
        parser: Arc<dyn ArticleParser>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let lexicon = Arc::new(Lexicon::default());
        let config = CheckerConfig::default();
        Self {
            retriever,
            parser,
            style: StyleAnalyzer::new(Arc::clone(&lexicon)),
            verifier: EvidenceVerifier::new(embedder, lexicon).with_config(&config),
            scorer: HybridScorer::new(),
            config,
        }
    }

    pub fn with_style_analyzer(mut self, style: StyleAnalyzer) -> Self {
        self.style = style;
        self
    }

    pub fn with_verifier(mut self, verifier: EvidenceVerifier) -> Self {
        self.verifier = verifier.with_config(&self.config);
        self
    }

    /// Replace the limits. Sentence limits are pushed down to the verifier.
    pub fn with_config(mut self, config: CheckerConfig) -> Self {
        self.verifier = self.verifier.with_config(&config);
        self.config = config;
        self
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Style analysis only, without retrieval.
    pub fn analyze_style(&self, claim: &str) -> StyleResult {
        self.style.analyze(&ClaimText::new(claim))
    }

    /// Check a claim against retrieved evidence.
    ///
    /// Only retrieval errors abort the check. Per-document failures are
    /// reported in [`CheckReport::failures`].
    pub async fn check(&self, claim: &str) -> Result<CheckReport> {
        let claim = ClaimText::new(claim);
        let span = obs::claim_span(&claim.short_digest());
        self.check_claim(claim).instrument(span).await
    }

    async fn check_claim(&self, claim: ClaimText) -> Result<CheckReport> {
        let digest = claim.short_digest();
        METRICS.inc_claims();

        let style = self.style.analyze(&claim);
        let candidates = self
            .retriever
            .search(&claim, self.config.max_sources)
            .await?;
        obs::emit_claim_started(&digest, candidates.len());

        if candidates.is_empty() {
            let score = FinalScore::no_evidence(style.style_score, NO_SOURCES_REASONING);
            obs::emit_claim_scored(&digest, score.verdict, score.confidence, 0);
            return Ok(CheckReport::new(claim, style, score, Vec::new(), Vec::new()));
        }

        let mut outcomes: Vec<(usize, DocumentOutcome)> = stream::iter(
            candidates
                .into_iter()
                .take(self.config.max_sources)
                .enumerate(),
        )
        .map(|(idx, candidate)| {
            let claim = &claim;
            async move { (idx, self.verify_document(claim, &candidate).await) }
        })
        .buffer_unordered(self.config.max_concurrency.max(1))
        .collect()
        .await;
        outcomes.sort_by_key(|(idx, _)| *idx);

        let mut evidence = Vec::new();
        let mut failures = Vec::new();
        for (_, outcome) in outcomes {
            match outcome {
                DocumentOutcome::Evidence(ev) => evidence.push(ev),
                DocumentOutcome::Failed(f) => failures.push(f),
                DocumentOutcome::Skipped => {}
            }
        }

        let score = if evidence.is_empty() {
            FinalScore::no_evidence(style.style_score, NO_VERIFIABLE_REASONING)
        } else {
            self.scorer.score(&claim, &style, &evidence)
        };

        obs::emit_claim_scored(&digest, score.verdict, score.confidence, evidence.len());
        info!(
            claim = %digest,
            evidence = evidence.len(),
            failures = failures.len(),
            "claim checked"
        );
        Ok(CheckReport::new(claim, style, score, evidence, failures))
    }

    async fn verify_document(
        &self,
        claim: &ClaimText,
        candidate: &SourceCandidate,
    ) -> DocumentOutcome {
        let content = self.parser.parse(&candidate.url).await;
        let content = truncate_chars(&content, self.config.max_content_chars);
        if content.trim().is_empty() {
            METRICS.inc_skipped();
            obs::emit_evidence_skipped(&candidate.url, "empty_content");
            return DocumentOutcome::Skipped;
        }

        let timeout = self.config.embed_timeout();
        let judged = match tokio::time::timeout(timeout, self.verifier.verify(claim, content)).await
        {
            Ok(res) => res,
            Err(_) => Err(CheckError::Timeout {
                url: candidate.url.clone(),
                millis: self.config.embed_timeout_ms,
            }),
        };

        match judged {
            Ok(judgment) if judgment.verdict == Stance::NoEvidence => {
                METRICS.inc_skipped();
                obs::emit_evidence_skipped(&candidate.url, "no_evidence");
                DocumentOutcome::Skipped
            }
            Ok(judgment) => {
                METRICS.inc_verified();
                obs::emit_evidence_verified(
                    &candidate.url,
                    judgment.verdict,
                    judgment.confidence,
                    judgment.similarity,
                );
                DocumentOutcome::Evidence(ScoredEvidence::new(candidate, judgment))
            }
            Err(e) => {
                METRICS.inc_failed();
                obs::emit_evidence_failed(&candidate.url, e.kind(), &e);
                DocumentOutcome::Failed(DocumentFailure {
                    source: candidate.source.clone(),
                    url: candidate.url.clone(),
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

impl std::fmt::Debug for FactChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactChecker")
            .field("style", &self.style)
            .field("verifier", &self.verifier)
            .field("config", &self.config)
            .finish()
    }
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            debug!(max_chars, "article content truncated");
            &text[..byte_idx]
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_report_serializes_verdict_label() {
        let style = StyleAnalyzer::default().analyze(&ClaimText::new("plain claim"));
        let score = FinalScore::no_evidence(style.style_score, NO_SOURCES_REASONING);
        let report = CheckReport::new(
            ClaimText::new("plain claim"),
            style,
            score,
            Vec::new(),
            Vec::new(),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdict"], "UNVERIFIABLE");
        assert_eq!(json["claim"], "plain claim");
        assert!(json.get("evidence_count").is_none());
    }
}
