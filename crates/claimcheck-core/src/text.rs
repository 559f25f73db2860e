//! Claim text normalisation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A whitespace-normalised claim.
///
/// Runs of whitespace collapse to a single space and the ends are trimmed.
/// The inner string is private so every `ClaimText` is normalised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct ClaimText(String);

impl ClaimText {
    pub fn new(raw: &str) -> Self {
        ClaimText(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// SHA-256 hex digest of the normalised text. Identifies a claim in logs
    /// without echoing its content.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Short form of [`digest`](Self::digest) (first 12 hex chars).
    pub fn short_digest(&self) -> String {
        let mut d = self.digest();
        d.truncate(12);
        d
    }
}

impl From<String> for ClaimText {
    fn from(s: String) -> Self {
        ClaimText::new(&s)
    }
}

impl From<&str> for ClaimText {
    fn from(s: &str) -> Self {
        ClaimText::new(s)
    }
}

impl From<ClaimText> for String {
    fn from(c: ClaimText) -> Self {
        c.0
    }
}

impl AsRef<str> for ClaimText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClaimText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_collapsed_and_trimmed() {
        let claim = ClaimText::new("  The bridge \t collapsed\n\non   Tuesday ");
        assert_eq!(claim.as_str(), "The bridge collapsed on Tuesday");
    }

    #[test]
    fn test_empty_claim_is_accepted() {
        let claim = ClaimText::new(" \n\t ");
        assert!(claim.is_empty());
        assert_eq!(claim.as_str(), "");
    }

    #[test]
    fn test_digest_ignores_whitespace_variation() {
        let a = ClaimText::new("Water  boils at 100C");
        let b = ClaimText::new("Water boils at 100C\n");
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
        assert_eq!(a.short_digest().len(), 12);
    }

    #[test]
    fn test_deserialize_normalises() {
        let claim: ClaimText = serde_json::from_str("\"  spaced   out \"").unwrap();
        assert_eq!(claim.as_str(), "spaced out");
    }
}
