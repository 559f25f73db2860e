//! Hybrid scoring: fuse the style signal with weighted evidence stances.
//!
//! Each evidence item contributes `reliability * confidence * similarity` to
//! the support or refute total. A side dominates only when it exceeds the
//! other by [`DOMINANCE_MARGIN`]; otherwise the claim is unverifiable.
//!
//! Style is asymmetric: it is a penalty when evidence supports the claim and
//! a bonus when evidence refutes it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evidence::{ScoredEvidence, Stance};
use crate::style::StyleResult;
use crate::text::ClaimText;

pub const DOMINANCE_MARGIN: f64 = 1.2;
/// Keeps ratios finite when both totals are zero.
pub const STABILIZER: f64 = 0.01;
pub const CONFIDENCE_CAP: f64 = 0.95;
/// Confidence above which a dominant side yields a definite verdict.
pub const DEFINITE_THRESHOLD: f64 = 0.70;
pub const CONTESTED_CONFIDENCE: f64 = 0.5;

const STYLE_WEIGHT: f64 = 0.25;
const EVIDENCE_WEIGHT: f64 = 0.5;
const CONSISTENCY_WEIGHT: f64 = 0.25;
const STYLE_PENALTY: f64 = 0.3;
const STYLE_BONUS: f64 = 0.2;
const SUSPICIOUS_STYLE: f64 = 0.6;

/// Final verdict on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "TRUE")]
    True,
    #[serde(rename = "LIKELY TRUE")]
    LikelyTrue,
    #[serde(rename = "FALSE")]
    False,
    #[serde(rename = "LIKELY FALSE")]
    LikelyFalse,
    #[serde(rename = "UNVERIFIABLE")]
    Unverifiable,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "TRUE",
            Self::LikelyTrue => "LIKELY TRUE",
            Self::False => "FALSE",
            Self::LikelyFalse => "LIKELY FALSE",
            Self::Unverifiable => "UNVERIFIABLE",
        }
    }

    /// TRUE above [`DEFINITE_THRESHOLD`], LIKELY TRUE at or below it.
    pub fn supported(confidence: f64) -> Self {
        if confidence > DEFINITE_THRESHOLD {
            Self::True
        } else {
            Self::LikelyTrue
        }
    }

    /// FALSE above [`DEFINITE_THRESHOLD`], LIKELY FALSE at or below it.
    pub fn refuted(confidence: f64) -> Self {
        if confidence > DEFINITE_THRESHOLD {
            Self::False
        } else {
            Self::LikelyFalse
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of supporting and refuting items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceCount {
    pub supports: usize,
    pub refutes: usize,
}

/// Weighted evidence totals. Order-independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceTally {
    pub supports_score: f64,
    pub refutes_score: f64,
    pub count: EvidenceCount,
}

impl EvidenceTally {
    /// Sum item weights per stance. `no_evidence` items are ignored.
    pub fn from_evidence(evidence: &[ScoredEvidence]) -> Self {
        let mut tally = Self::default();
        for ev in evidence {
            match ev.verdict {
                Stance::Supports => {
                    tally.supports_score += ev.weight();
                    tally.count.supports += 1;
                }
                Stance::Refutes => {
                    tally.refutes_score += ev.weight();
                    tally.count.refutes += 1;
                }
                Stance::NoEvidence => {}
            }
        }
        tally
    }

    pub fn total(&self) -> f64 {
        self.supports_score + self.refutes_score
    }

    /// How unanimously the evidence leans one way.
    pub fn consistency(&self) -> f64 {
        self.supports_score.max(self.refutes_score) / (self.total() + STABILIZER)
    }
}

/// Which side of the evidence wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dominance {
    Supports,
    Refutes,
    Contested,
}

impl Dominance {
    /// Ordered guards: support is tested before refutation.
    pub fn of(tally: &EvidenceTally) -> Self {
        if tally.supports_score > tally.refutes_score * DOMINANCE_MARGIN {
            Self::Supports
        } else if tally.refutes_score > tally.supports_score * DOMINANCE_MARGIN {
            Self::Refutes
        } else {
            Self::Contested
        }
    }
}

/// Output of [`HybridScorer::score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScore {
    pub verdict: Verdict,
    pub confidence: f64,
    pub reasoning: String,
    /// Named diagnostics.
    pub scores: BTreeMap<String, f64>,
    /// Absent only when there was no evidence at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_count: Option<EvidenceCount>,
}

impl FinalScore {
    /// Result when no evidence reached the scorer.
    pub fn no_evidence(style_score: f64, reasoning: &str) -> Self {
        Self {
            verdict: Verdict::Unverifiable,
            confidence: 0.0,
            reasoning: reasoning.to_string(),
            scores: BTreeMap::from([
                ("style".to_string(), style_score),
                ("evidence".to_string(), 0.0),
                ("nli".to_string(), 0.0),
            ]),
            evidence_count: None,
        }
    }
}

/// Stateless fusion of style and evidence into a [`FinalScore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridScorer;

impl HybridScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        claim: &ClaimText,
        style: &StyleResult,
        evidence: &[ScoredEvidence],
    ) -> FinalScore {
        let style_score = style.style_score;
        if evidence.is_empty() {
            return FinalScore::no_evidence(style_score, "No evidence found");
        }

        let tally = EvidenceTally::from_evidence(evidence);
        let denom = tally.total() + STABILIZER;
        let consistency = tally.consistency();
        let dominance = Dominance::of(&tally);

        let (verdict, confidence, reasoning) = match dominance {
            Dominance::Supports => {
                let raw = (1.0 - style_score) * STYLE_WEIGHT
                    + (tally.supports_score / denom) * EVIDENCE_WEIGHT
                    + consistency * CONSISTENCY_WEIGHT
                    - style_score * STYLE_PENALTY;
                let confidence = raw.clamp(0.0, CONFIDENCE_CAP);
                let verdict = Verdict::supported(confidence);
                let mut reasoning = format!("Supported by {} sources", tally.count.supports);
                if style_score > SUSPICIOUS_STYLE {
                    reasoning.push_str(" (but suspicious language detected)");
                }
                (verdict, confidence, reasoning)
            }
            Dominance::Refutes => {
                let raw = style_score * STYLE_WEIGHT
                    + (tally.refutes_score / denom) * EVIDENCE_WEIGHT
                    + consistency * CONSISTENCY_WEIGHT
                    + style_score * STYLE_BONUS;
                let confidence = raw.clamp(0.0, CONFIDENCE_CAP);
                let verdict = Verdict::refuted(confidence);
                let reasoning = format!("Refuted by {} sources", tally.count.refutes);
                (verdict, confidence, reasoning)
            }
            Dominance::Contested => (
                Verdict::Unverifiable,
                CONTESTED_CONFIDENCE,
                format!(
                    "Conflicting evidence ({} support, {} refute)",
                    tally.count.supports, tally.count.refutes
                ),
            ),
        };

        debug!(
            claim = %claim.short_digest(),
            supports = tally.supports_score,
            refutes = tally.refutes_score,
            dominance = ?dominance,
            verdict = %verdict,
            "evidence aggregated"
        );

        FinalScore {
            verdict,
            confidence,
            reasoning,
            scores: BTreeMap::from([
                ("style".to_string(), style_score),
                ("evidence_support".to_string(), tally.supports_score),
                ("evidence_refute".to_string(), tally.refutes_score),
                ("consistency".to_string(), consistency),
            ]),
            evidence_count: Some(tally.count),
        }
    }
}
