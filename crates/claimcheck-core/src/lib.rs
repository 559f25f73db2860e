//! Claimcheck Core Library
//!
//! Hybrid credibility scoring for short factual claims. A claim is judged on
//! two independent signals: how sensational its language is, and whether
//! retrieved evidence sentences support or refute it. [`FactChecker`] runs
//! the whole pipeline; the individual stages are usable on their own.

pub mod capability;
pub mod config;
pub mod error;
pub mod evidence;
pub mod lexicon;
pub mod metrics;
pub mod obs;
pub mod pipeline;
pub mod scorer;
pub mod style;
pub mod telemetry;
pub mod text;
pub mod verifier;

pub use capability::{
    Embedder, HashingEmbedder, LinearModelArtifact, LinearTextClassifier, StyleClassifier,
};
pub use config::CheckerConfig;
pub use error::{CheckError, ClassifierError, Result};
pub use evidence::{
    ArticleParser, CorpusDocument, EvidenceJudgment, EvidenceRetriever, ScoredEvidence,
    SourceCandidate, Stance, StaticCorpus,
};
pub use lexicon::{Lexicon, LexiconSpec};
pub use pipeline::{CheckReport, DocumentFailure, FactChecker};
pub use scorer::{Dominance, EvidenceCount, EvidenceTally, FinalScore, HybridScorer, Verdict};
pub use style::{StyleAnalyzer, StyleFeatures, StyleResult, STYLE_CONFIDENCE};
pub use text::ClaimText;
pub use verifier::{
    classify_stance, cosine_similarity, split_sentences, word_overlap, EvidenceVerifier,
    StanceSignals, STANCE_RULES,
};

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
