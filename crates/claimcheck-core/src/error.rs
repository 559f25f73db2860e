//! Error taxonomy for claim checking.

/// Failures of the statistical style classifier call.
///
/// These are the only failure modes the style analyzer recovers from by
/// falling back to the manual heuristic score.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("style classifier not loaded")]
    Unavailable,

    #[error("feature mismatch: model expects {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("classifier produced a non-finite decision value")]
    NonFinite,
}

/// Claim checking errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("invalid lexicon: {0}")]
    InvalidLexicon(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("verification of {url} timed out after {millis}ms")]
    Timeout { url: String, millis: u64 },

    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// Stable machine-readable kind, used in logs and per-document failure records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmbeddingUnavailable(_) | Self::DimensionMismatch { .. } => {
                "embedding_unavailable"
            }
            Self::Classifier(_) => "classifier",
            Self::InvalidLexicon(_) => "invalid_lexicon",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Timeout { .. } => "timeout",
            Self::Retrieval(_) => "retrieval",
            Self::Serialization(_) => "serialization",
            Self::Toml(_) => "toml",
            Self::Io(_) => "io",
        }
    }
}

/// Result type for claim checking operations.
pub type Result<T> = std::result::Result<T, CheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_errors_share_a_kind() {
        let err = CheckError::EmbeddingUnavailable("backend offline".to_string());
        assert_eq!(err.kind(), "embedding_unavailable");
        assert!(err.to_string().contains("backend offline"));

        let err = CheckError::DimensionMismatch {
            expected: 384,
            actual: 12,
        };
        assert_eq!(err.kind(), "embedding_unavailable");
        assert!(err.to_string().contains("384"));
    }

    #[test]
    fn test_timeout_display() {
        let err = CheckError::Timeout {
            url: "https://example.org/a".to_string(),
            millis: 250,
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.org/a"));
        assert!(msg.contains("250ms"));
    }

    #[test]
    fn test_classifier_error_converts() {
        let err: CheckError = ClassifierError::FeatureMismatch {
            expected: 10,
            actual: 9,
        }
        .into();
        assert_eq!(err.kind(), "classifier");
        assert!(err.to_string().contains("expects 10"));
    }
}
