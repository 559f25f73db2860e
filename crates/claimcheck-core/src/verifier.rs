//! Per-document evidence verification.
//!
//! For one (claim, document) pair the verifier:
//! 1. splits the document into sentence candidates, dropping short ones;
//! 2. embeds the claim and the first `max_sentences` candidates;
//! 3. picks the candidate with the highest cosine similarity (first wins ties);
//! 4. classifies its stance with the ordered rules in [`STANCE_RULES`].
//!
//! Embedding failures propagate. Only a document without sentence candidates
//! yields `no_evidence` without consulting the embedder.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::Embedder;
use crate::config::CheckerConfig;
use crate::error::{CheckError, Result};
use crate::evidence::{EvidenceJudgment, Stance};
use crate::lexicon::Lexicon;
use crate::text::ClaimText;

// ---------------------------------------------------------------------------
// Stance decision table
// ---------------------------------------------------------------------------

/// Inputs to stance classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StanceSignals {
    pub similarity: f64,
    /// A negation/falsity word occurs in the sentence.
    pub has_negation: bool,
    /// Fraction of claim words (3+ chars) that also occur in the sentence.
    pub overlap: f64,
}

/// Extra condition a rule needs beyond its similarity floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanceGuard {
    Always,
    Negation,
    /// Negation present and overlap above one half.
    NegationWithOverlap,
}

impl StanceGuard {
    fn holds(self, s: &StanceSignals) -> bool {
        match self {
            Self::Always => true,
            Self::Negation => s.has_negation,
            Self::NegationWithOverlap => s.has_negation && s.overlap > 0.5,
        }
    }
}

/// How a matching rule derives its confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StanceConfidence {
    /// `min(similarity + 0.1, 0.95)`
    Boosted,
    Similarity,
    Fixed(f64),
}

impl StanceConfidence {
    fn resolve(self, similarity: f64) -> f64 {
        let c = match self {
            Self::Boosted => (similarity + 0.1).min(0.95),
            Self::Similarity => similarity,
            Self::Fixed(v) => v,
        };
        c.clamp(0.0, 1.0)
    }
}

/// One row of the stance decision table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StanceRule {
    /// Exclusive lower bound on similarity.
    pub above: f64,
    pub guard: StanceGuard,
    pub verdict: Stance,
    pub confidence: StanceConfidence,
}

/// Stance rules, evaluated in order; the first match wins.
///
/// Between 0.4 and 0.6 evidence counts as weak support at a fixed 0.6
/// confidence; negation is only considered above 0.6.
pub const STANCE_RULES: &[StanceRule] = &[
    StanceRule {
        above: 0.75,
        guard: StanceGuard::NegationWithOverlap,
        verdict: Stance::Refutes,
        confidence: StanceConfidence::Boosted,
    },
    StanceRule {
        above: 0.75,
        guard: StanceGuard::Always,
        verdict: Stance::Supports,
        confidence: StanceConfidence::Boosted,
    },
    StanceRule {
        above: 0.6,
        guard: StanceGuard::Negation,
        verdict: Stance::Refutes,
        confidence: StanceConfidence::Similarity,
    },
    StanceRule {
        above: 0.6,
        guard: StanceGuard::Always,
        verdict: Stance::Supports,
        confidence: StanceConfidence::Similarity,
    },
    StanceRule {
        above: 0.4,
        guard: StanceGuard::Always,
        verdict: Stance::Supports,
        confidence: StanceConfidence::Fixed(0.6),
    },
    StanceRule {
        above: f64::NEG_INFINITY,
        guard: StanceGuard::Always,
        verdict: Stance::NoEvidence,
        confidence: StanceConfidence::Similarity,
    },
];

/// Classify stance from precomputed signals.
///
/// A non-finite similarity matches no rule and yields `no_evidence` at 0.0.
pub fn classify_stance(signals: &StanceSignals) -> (Stance, f64) {
    STANCE_RULES
        .iter()
        .find(|r| signals.similarity > r.above && r.guard.holds(signals))
        .map(|r| (r.verdict, r.confidence.resolve(signals.similarity)))
        .unwrap_or((Stance::NoEvidence, 0.0))
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("static sentence pattern"))
}

fn long_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w{3,}\b").expect("static word pattern"))
}

/// Split on runs of `.`, `!` and `?`, keeping trimmed candidates with more
/// than `min_words` words.
pub fn split_sentences(text: &str, min_words: usize) -> Vec<String> {
    sentence_boundary()
        .split(text)
        .map(str::trim)
        .filter(|s| s.split_whitespace().count() > min_words)
        .map(str::to_string)
        .collect()
}

fn word_set(lower: &str) -> HashSet<&str> {
    long_word().find_iter(lower).map(|m| m.as_str()).collect()
}

/// `|claim words ∩ sentence words| / |claim words|` over lower-cased words of
/// three or more characters; 0.0 when the claim has none.
pub fn word_overlap(claim: &str, sentence: &str) -> f64 {
    let claim_lower = claim.to_lowercase();
    let sentence_lower = sentence.to_lowercase();
    let claim_words = word_set(&claim_lower);
    if claim_words.is_empty() {
        return 0.0;
    }
    let sentence_words = word_set(&sentence_lower);
    let shared = claim_words.intersection(&sentence_words).count();
    shared as f64 / claim_words.len() as f64
}

/// Cosine similarity. Zero-norm vectors compare as 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(CheckError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let mut dot = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let denom = na.sqrt() * nb.sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }
    let sim = dot / denom;
    Ok(if sim.is_finite() { sim } else { 0.0 })
}

// ---------------------------------------------------------------------------
// EvidenceVerifier
// ---------------------------------------------------------------------------

/// Finds the evidence sentence closest to a claim and classifies its stance.
#[derive(Clone)]
pub struct EvidenceVerifier {
    embedder: Arc<dyn Embedder>,
    lexicon: Arc<Lexicon>,
    max_sentences: usize,
    min_sentence_words: usize,
}

impl EvidenceVerifier {
    pub fn new(embedder: Arc<dyn Embedder>, lexicon: Arc<Lexicon>) -> Self {
        let defaults = CheckerConfig::default();
        Self {
            embedder,
            lexicon,
            max_sentences: defaults.max_sentences,
            min_sentence_words: defaults.min_sentence_words,
        }
    }

    /// Apply the sentence limits from `config`.
    pub fn with_config(mut self, config: &CheckerConfig) -> Self {
        self.max_sentences = config.max_sentences;
        self.min_sentence_words = config.min_sentence_words;
        self
    }

    pub async fn verify(&self, claim: &ClaimText, evidence: &str) -> Result<EvidenceJudgment> {
        let mut sentences = split_sentences(evidence, self.min_sentence_words);
        if sentences.is_empty() {
            return Ok(EvidenceJudgment::no_evidence());
        }
        sentences.truncate(self.max_sentences);

        let mut batch = Vec::with_capacity(sentences.len() + 1);
        batch.push(claim.as_str().to_string());
        batch.extend(sentences.iter().cloned());

        let vectors = self.embedder.embed(&batch).await?;
        if vectors.len() != batch.len() {
            return Err(CheckError::EmbeddingUnavailable(format!(
                "expected {} vectors, got {}",
                batch.len(),
                vectors.len()
            )));
        }

        let claim_vec = &vectors[0];
        let mut best_idx = 0usize;
        let mut best_sim = f64::NEG_INFINITY;
        for (i, v) in vectors[1..].iter().enumerate() {
            let sim = cosine_similarity(claim_vec, v)?;
            if sim > best_sim {
                best_sim = sim;
                best_idx = i;
            }
        }

        let best_sent = sentences.swap_remove(best_idx);
        let signals = StanceSignals {
            similarity: best_sim,
            has_negation: self.lexicon.has_negation(&best_sent.to_lowercase()),
            overlap: word_overlap(claim.as_str(), &best_sent),
        };
        let (verdict, confidence) = classify_stance(&signals);

        debug!(
            similarity = best_sim,
            negation = signals.has_negation,
            overlap = signals.overlap,
            verdict = %verdict,
            "evidence sentence classified"
        );

        Ok(EvidenceJudgment {
            verdict,
            confidence,
            similarity: best_sim,
            snippet: best_sent,
        })
    }
}

impl std::fmt::Debug for EvidenceVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceVerifier")
            .field("max_sentences", &self.max_sentences)
            .field("min_sentence_words", &self.min_sentence_words)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(similarity: f64, has_negation: bool, overlap: f64) -> StanceSignals {
        StanceSignals {
            similarity,
            has_negation,
            overlap,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_strong_match_supports_with_boost() {
        let (v, c) = classify_stance(&signals(0.82, false, 1.0));
        assert_eq!(v, Stance::Supports);
        assert!(approx(c, 0.92));
    }

    #[test]
    fn test_strong_negated_match_with_overlap_refutes() {
        let (v, c) = classify_stance(&signals(0.78, true, 0.75));
        assert_eq!(v, Stance::Refutes);
        assert!(approx(c, 0.88));
    }

    #[test]
    fn test_strong_negated_match_without_overlap_supports() {
        let (v, _) = classify_stance(&signals(0.9, true, 0.5));
        assert_eq!(v, Stance::Supports);
    }

    #[test]
    fn test_boost_is_capped() {
        let (_, c) = classify_stance(&signals(0.99, false, 0.0));
        assert!(approx(c, 0.95));
    }

    #[test]
    fn test_moderate_band_uses_negation_only() {
        let (v, c) = classify_stance(&signals(0.7, true, 0.0));
        assert_eq!(v, Stance::Refutes);
        assert!(approx(c, 0.7));

        let (v, c) = classify_stance(&signals(0.75, false, 1.0));
        assert_eq!(v, Stance::Supports);
        assert!(approx(c, 0.75));
    }

    #[test]
    fn test_weak_band_is_fixed_support_even_with_negation() {
        let (v, c) = classify_stance(&signals(0.5, true, 1.0));
        assert_eq!(v, Stance::Supports);
        assert!(approx(c, 0.6));

        let (v, c) = classify_stance(&signals(0.6, false, 0.0));
        assert_eq!(v, Stance::Supports);
        assert!(approx(c, 0.6));
    }

    #[test]
    fn test_low_similarity_is_no_evidence() {
        let (v, c) = classify_stance(&signals(0.4, false, 0.0));
        assert_eq!(v, Stance::NoEvidence);
        assert!(approx(c, 0.4));

        let (v, c) = classify_stance(&signals(-0.3, false, 0.0));
        assert_eq!(v, Stance::NoEvidence);
        assert_eq!(c, 0.0);

        let (v, c) = classify_stance(&signals(f64::NAN, false, 0.0));
        assert_eq!(v, Stance::NoEvidence);
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_split_sentences_drops_short_candidates() {
        let text = "Too short here. This sentence has exactly six words! \
                    Is this one long enough to keep?? Five words only here.";
        let s = split_sentences(text, 5);
        assert_eq!(
            s,
            vec![
                "This sentence has exactly six words".to_string(),
                "Is this one long enough to keep".to_string(),
            ]
        );
    }

    #[test]
    fn test_word_overlap() {
        let o = word_overlap(
            "The bridge collapsed on Tuesday",
            "The bridge did not collapse and remains open",
        );
        // claim words: the, bridge, collapsed, tuesday; shared: the, bridge
        assert!(approx(o, 0.5));
        assert_eq!(word_overlap("on it", "anything at all"), 0.0);
    }

    #[test]
    fn test_cosine_similarity() {
        assert!(approx(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap(), 1.0));
        assert!(approx(cosine_similarity(&[1.0, 0.0], &[0.0, 2.0]).unwrap(), 0.0));
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 0.0]),
            Err(CheckError::DimensionMismatch { .. })
        ));
    }
}
