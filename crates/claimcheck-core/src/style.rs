//! Linguistic style analysis of claim text.
//!
//! Produces a bounded "sensationalism" score plus the interpretable features
//! behind it. The score comes from an optional [`StyleClassifier`]; when none
//! is configured, or its call fails, the manual heuristic score is used.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::StyleClassifier;
use crate::error::ClassifierError;
use crate::lexicon::Lexicon;
use crate::text::ClaimText;

/// Static trust placed in the style signal. Not input-dependent.
pub const STYLE_CONFIDENCE: f64 = 0.7;

/// Interpretable linguistic features of a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleFeatures {
    pub sensational_count: u32,
    pub clickbait_count: u32,
    /// Fraction of words that are all-uppercase and longer than two characters.
    pub caps_ratio: f64,
    pub exclamation_count: u32,
    pub emotional_count: u32,
    /// Fixed linear combination of the counts above, capped at 1.0.
    pub manual_score: f64,
}

impl StyleFeatures {
    /// Extract features from `text`. Deterministic and pure.
    pub fn extract(text: &str, lexicon: &Lexicon) -> Self {
        let lower = text.to_lowercase();

        let sensational_count = lexicon.sensational_hits(&lower);
        let clickbait_count = lexicon.clickbait_hits(&lower);
        let emotional_count = lexicon.emotional_hits(&lower);
        let exclamation_count = text.matches('!').count() as u32;

        let words: Vec<&str> = text.split_whitespace().collect();
        let caps_ratio = if words.is_empty() {
            0.0
        } else {
            let caps = words.iter().filter(|w| is_shouted(w)).count();
            caps as f64 / words.len() as f64
        };

        let manual_score = (0.15 * sensational_count as f64
            + 0.25 * clickbait_count as f64
            + 0.20 * caps_ratio
            + 0.10 * exclamation_count.min(3) as f64
            + 0.10 * emotional_count as f64)
            .min(1.0);

        Self {
            sensational_count,
            clickbait_count,
            caps_ratio,
            exclamation_count,
            emotional_count,
            manual_score,
        }
    }
}

/// A word counts as shouted when it has more than two characters, at least
/// one uppercase letter, and no lowercase letters.
fn is_shouted(word: &str) -> bool {
    word.chars().count() > 2
        && word.chars().any(char::is_uppercase)
        && !word.chars().any(char::is_lowercase)
}

/// Output of [`StyleAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleResult {
    /// Sensationalism score in [0, 1].
    pub style_score: f64,
    /// Always [`STYLE_CONFIDENCE`].
    pub confidence: f64,
    pub features: StyleFeatures,
}

/// Turns claim text into a [`StyleResult`].
#[derive(Clone)]
pub struct StyleAnalyzer {
    lexicon: Arc<Lexicon>,
    classifier: Option<Arc<dyn StyleClassifier>>,
}

impl StyleAnalyzer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            classifier: None,
        }
    }

    /// Attach a statistical classifier whose decision value becomes the
    /// style score.
    pub fn with_classifier(mut self, classifier: Arc<dyn StyleClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn analyze(&self, text: &ClaimText) -> StyleResult {
        let features = StyleFeatures::extract(text.as_str(), &self.lexicon);

        let style_score = match &self.classifier {
            Some(clf) => match clf.decision(text.as_str()).and_then(finite) {
                Ok(decision) => logistic(decision),
                Err(e) => {
                    debug!(error = %e, "style classifier failed, using manual score");
                    features.manual_score
                }
            },
            None => features.manual_score,
        };

        StyleResult {
            style_score: style_score.clamp(0.0, 1.0),
            confidence: STYLE_CONFIDENCE,
            features,
        }
    }
}

impl Default for StyleAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::default()))
    }
}

impl std::fmt::Debug for StyleAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleAnalyzer")
            .field("classifier", &self.classifier.is_some())
            .finish()
    }
}

fn finite(decision: f64) -> std::result::Result<f64, ClassifierError> {
    if decision.is_finite() {
        Ok(decision)
    } else {
        Err(ClassifierError::NonFinite)
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(std::result::Result<f64, ClassifierError>);

    impl StyleClassifier for Fixed {
        fn decision(&self, _text: &str) -> std::result::Result<f64, ClassifierError> {
            self.0.clone()
        }
    }

    fn analyze(text: &str) -> StyleResult {
        StyleAnalyzer::default().analyze(&ClaimText::new(text))
    }

    #[test]
    fn test_plain_claim_scores_zero() {
        let r = analyze("The council approved the budget on Monday");
        assert_eq!(r.features.sensational_count, 0);
        assert_eq!(r.features.clickbait_count, 0);
        assert_eq!(r.features.caps_ratio, 0.0);
        assert_eq!(r.style_score, 0.0);
        assert_eq!(r.confidence, STYLE_CONFIDENCE);
    }

    #[test]
    fn test_manual_score_combination() {
        // sensational: shocking, secret; emotional: panic; exclamations: 4 (capped at 3);
        // caps: SHOCKING of 4 words.
        let r = analyze("SHOCKING secret causes panic!!!!");
        let f = &r.features;
        assert_eq!(f.sensational_count, 2);
        assert_eq!(f.emotional_count, 1);
        assert_eq!(f.exclamation_count, 4);
        assert!((f.caps_ratio - 0.25).abs() < 1e-12);
        let expected = 0.15 * 2.0 + 0.20 * 0.25 + 0.10 * 3.0 + 0.10 * 1.0;
        assert!((f.manual_score - expected).abs() < 1e-12);
        assert_eq!(r.style_score, f.manual_score);
    }

    #[test]
    fn test_manual_score_is_capped() {
        let r = analyze(
            "BREAKING URGENT shocking conspiracy exposed! You won't believe what happened next, doctors hate this deadly panic!!!",
        );
        assert_eq!(r.features.manual_score, 1.0);
        assert!(r.style_score <= 1.0);
    }

    #[test]
    fn test_caps_ratio_ignores_short_and_mixed_words() {
        let r = analyze("US and UK say NATO Is fine");
        // only NATO qualifies: US/UK are too short, "Is" is mixed case.
        assert!((r.features.caps_ratio - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_claim_degrades_to_zero() {
        let r = analyze("");
        assert_eq!(r.features.caps_ratio, 0.0);
        assert_eq!(r.features.exclamation_count, 0);
        assert_eq!(r.features.manual_score, 0.0);
    }

    #[test]
    fn test_classifier_decision_is_squashed() {
        let analyzer = StyleAnalyzer::default().with_classifier(Arc::new(Fixed(Ok(0.0))));
        let r = analyzer.analyze(&ClaimText::new("anything"));
        assert!((r.style_score - 0.5).abs() < 1e-12);

        let analyzer = StyleAnalyzer::default().with_classifier(Arc::new(Fixed(Ok(2.0))));
        let r = analyzer.analyze(&ClaimText::new("anything"));
        assert!((r.style_score - 1.0 / (1.0 + (-2.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_classifier_failure_falls_back_to_manual() {
        let analyzer = StyleAnalyzer::default().with_classifier(Arc::new(Fixed(Err(
            ClassifierError::FeatureMismatch {
                expected: 5000,
                actual: 12,
            },
        ))));
        let r = analyzer.analyze(&ClaimText::new("Shocking news!"));
        assert_eq!(r.style_score, r.features.manual_score);
        assert_eq!(r.confidence, STYLE_CONFIDENCE);
    }

    #[test]
    fn test_non_finite_decision_falls_back_to_manual() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let analyzer = StyleAnalyzer::default().with_classifier(Arc::new(Fixed(Ok(bad))));
            let r = analyzer.analyze(&ClaimText::new("Shocking secret exposed!"));
            assert!(r.style_score.is_finite());
            assert_eq!(r.style_score, r.features.manual_score);
        }
    }
}
