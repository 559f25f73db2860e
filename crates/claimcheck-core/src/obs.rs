//! Structured lifecycle events for claim checks.
//!
//! Every check runs inside a [`claim_span`]; the `emit_*` functions log the
//! milestones of a check as `event = "..."` fields so they can be filtered
//! in JSON log pipelines.

use tracing::{info, warn};

use crate::evidence::Stance;
use crate::scorer::Verdict;

/// Span covering one claim check. Attach it to the check future with
/// [`tracing::Instrument::instrument`] so it stays active across awaits.
pub fn claim_span(claim_digest: &str) -> tracing::Span {
    tracing::info_span!("claimcheck.claim", claim = %claim_digest)
}

/// A check started with `candidates` retrieved documents.
pub fn emit_claim_started(claim_digest: &str, candidates: usize) {
    info!(event = "claim.started", claim = %claim_digest, candidates = candidates);
}

pub fn emit_evidence_verified(url: &str, verdict: Stance, confidence: f64, similarity: f64) {
    info!(
        event = "evidence.verified",
        url = %url,
        verdict = %verdict,
        confidence = confidence,
        similarity = similarity,
    );
}

/// A document was dropped without an error (empty extraction, no usable sentence).
pub fn emit_evidence_skipped(url: &str, reason: &str) {
    info!(event = "evidence.skipped", url = %url, reason = %reason);
}

/// Verification of one document failed; the remaining documents continue.
pub fn emit_evidence_failed(url: &str, kind: &str, error: &dyn std::fmt::Display) {
    warn!(event = "evidence.failed", url = %url, kind = %kind, error = %error);
}

pub fn emit_claim_scored(claim_digest: &str, verdict: Verdict, confidence: f64, evidence: usize) {
    info!(
        event = "claim.scored",
        claim = %claim_digest,
        verdict = %verdict,
        confidence = confidence,
        evidence = evidence,
    );
}
