//! Vocabulary tables driving style analysis and stance detection.
//!
//! The lists are data, not code: a [`Lexicon`] can be loaded from TOML and any
//! table omitted from the file keeps its built-in default.
//!
//! ```toml
//! sensational = ["shocking", "bombshell"]
//! clickbait_patterns = ["you won'?t believe"]
//! ```

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, Result};

const SENSATIONAL: &[&str] = &[
    "shocking",
    "unbelievable",
    "breaking",
    "urgent",
    "exposed",
    "secret",
    "truth",
    "conspiracy",
    "hidden",
    "revealed",
];

const CLICKBAIT: &[&str] = &[
    r"you won'?t believe",
    r"this will \w+ your \w+",
    r"one simple trick",
    r"doctors hate",
    r"click to find out",
    r"what happened next",
];

const EMOTIONAL: &[&str] = &["fear", "panic", "crisis", "disaster", "dangerous", "deadly"];

const NEGATION: &[&str] = &[
    "not",
    "no",
    "never",
    "false",
    "fake",
    "untrue",
    "incorrect",
    "deny",
    "refute",
    "debunk",
    "hoax",
    "myth",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Serialized form of a [`Lexicon`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconSpec {
    pub sensational: Vec<String>,
    pub clickbait_patterns: Vec<String>,
    pub emotional: Vec<String>,
    pub negation: Vec<String>,
}

impl Default for LexiconSpec {
    fn default() -> Self {
        Self {
            sensational: owned(SENSATIONAL),
            clickbait_patterns: owned(CLICKBAIT),
            emotional: owned(EMOTIONAL),
            negation: owned(NEGATION),
        }
    }
}

/// Compiled vocabulary tables.
///
/// Word lists are matched by substring containment against lower-cased text,
/// so "no" also matches inside "know". Clickbait patterns are regexes; each
/// contributes at most one hit per text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LexiconSpec", into = "LexiconSpec")]
pub struct Lexicon {
    spec: LexiconSpec,
    clickbait: Vec<Regex>,
}

impl Lexicon {
    /// Compile a lexicon. Words are lower-cased and clickbait patterns match
    /// case-insensitively; an invalid clickbait pattern is rejected.
    pub fn compile(mut spec: LexiconSpec) -> Result<Self> {
        for list in [
            &mut spec.sensational,
            &mut spec.emotional,
            &mut spec.negation,
        ] {
            list.retain(|w| !w.trim().is_empty());
            for w in list.iter_mut() {
                *w = w.trim().to_lowercase();
            }
        }

        spec.clickbait_patterns.retain(|p| !p.trim().is_empty());
        let clickbait = spec
            .clickbait_patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p.trim())
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        CheckError::InvalidLexicon(format!("clickbait pattern {:?}: {}", p, e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { spec, clickbait })
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let spec: LexiconSpec = toml::from_str(s)?;
        Self::compile(spec)
    }

    /// Load a lexicon from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn spec(&self) -> &LexiconSpec {
        &self.spec
    }

    /// Number of sensational words contained in `lower`.
    pub fn sensational_hits(&self, lower: &str) -> u32 {
        contained(&self.spec.sensational, lower)
    }

    /// Number of emotional words contained in `lower`.
    pub fn emotional_hits(&self, lower: &str) -> u32 {
        contained(&self.spec.emotional, lower)
    }

    /// Number of clickbait patterns matching `lower`.
    pub fn clickbait_hits(&self, lower: &str) -> u32 {
        self.clickbait.iter().filter(|re| re.is_match(lower)).count() as u32
    }

    /// Whether any negation/falsity word occurs in `lower`.
    pub fn has_negation(&self, lower: &str) -> bool {
        self.spec.negation.iter().any(|w| lower.contains(w.as_str()))
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        // Built-in patterns are literals known to compile.
        let spec = LexiconSpec::default();
        let clickbait = CLICKBAIT
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { spec, clickbait }
    }
}

impl TryFrom<LexiconSpec> for Lexicon {
    type Error = CheckError;

    fn try_from(spec: LexiconSpec) -> Result<Self> {
        Self::compile(spec)
    }
}

impl From<Lexicon> for LexiconSpec {
    fn from(l: Lexicon) -> Self {
        l.spec
    }
}

fn contained(words: &[String], lower: &str) -> u32 {
    words.iter().filter(|w| lower.contains(w.as_str())).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lists_are_populated() {
        let lex = Lexicon::default();
        assert_eq!(lex.spec().sensational.len(), 10);
        assert_eq!(lex.spec().clickbait_patterns.len(), 6);
        assert_eq!(lex.spec().emotional.len(), 6);
        assert_eq!(lex.spec().negation.len(), 12);
    }

    #[test]
    fn test_substring_containment_counts_each_word_once() {
        let lex = Lexicon::default();
        // "shocking" twice still counts once; "truth" matches inside "untruthful".
        assert_eq!(lex.sensational_hits("shocking shocking untruthful"), 2);
        assert_eq!(lex.emotional_hits("panic and fear"), 2);
    }

    #[test]
    fn test_clickbait_pattern_counts_at_most_once() {
        let lex = Lexicon::default();
        let text = "you won't believe it. you wont believe it either";
        assert_eq!(lex.clickbait_hits(text), 1);
        assert_eq!(lex.clickbait_hits("this will blow your mind"), 1);
    }

    #[test]
    fn test_negation_is_substring_based() {
        let lex = Lexicon::default();
        assert!(lex.has_negation("officials did not confirm"));
        assert!(lex.has_negation("everyone knows"));
        assert!(!lex.has_negation("the bridge collapsed on tuesday"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let lex = Lexicon::from_toml_str("sensational = [\"Bombshell\"]").unwrap();
        assert_eq!(lex.spec().sensational, vec!["bombshell".to_string()]);
        assert_eq!(lex.spec().negation.len(), 12);
        assert_eq!(lex.sensational_hits("a bombshell report"), 1);
    }

    #[test]
    fn test_clickbait_patterns_ignore_case() {
        let lex = Lexicon::from_toml_str(
            "clickbait_patterns = [\"Doctors HATE\", \"  \", \"Shocking Twist\"]",
        )
        .unwrap();
        assert_eq!(lex.spec().clickbait_patterns.len(), 2);
        assert_eq!(lex.clickbait_hits("doctors hate this shocking twist"), 2);
        assert_eq!(lex.clickbait_hits("a quiet afternoon"), 0);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = Lexicon::from_toml_str("clickbait_patterns = [\"(unclosed\"]").unwrap_err();
        assert!(matches!(err, CheckError::InvalidLexicon(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.toml");
        std::fs::write(&path, "emotional = [\"outrage\"]\n").unwrap();

        let lex = Lexicon::load(&path).unwrap();
        assert_eq!(lex.emotional_hits("pure outrage"), 1);
        assert_eq!(lex.emotional_hits("panic"), 0);
    }
}
