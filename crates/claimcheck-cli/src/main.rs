//! Claimcheck CLI
//!
//! The `claimcheck` command scores short factual claims.
//!
//! ## Commands
//!
//! - `style`: Linguistic style analysis of a claim
//! - `check`: Full check against a local JSON corpus

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};

use claimcheck_core::metrics::METRICS;
use claimcheck_core::{
    CheckReport, CheckerConfig, ClaimText, EvidenceVerifier, FactChecker, HashingEmbedder, Lexicon,
    LinearTextClassifier, StaticCorpus, StyleAnalyzer, StyleResult,
};

#[derive(Parser)]
#[command(name = "claimcheck")]
#[command(author = "Claimcheck Developers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hybrid credibility scoring for short factual claims", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the linguistic style of a claim
    Style {
        /// Claim text
        claim: String,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Check a claim against evidence from a local corpus
    Check {
        /// Claim text
        claim: String,

        /// JSON array of documents ({source, url, published, reliability, content})
        #[arg(long)]
        corpus: PathBuf,

        /// Pipeline limits as TOML (default: CLAIMCHECK_* environment variables)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Embedding dimension of the hashing embedder
        #[arg(long, default_value_t = HashingEmbedder::DEFAULT_DIM)]
        dim: usize,

        #[command(flatten)]
        style: StyleArgs,
    },
}

#[derive(clap::Args, Debug, Default)]
struct StyleArgs {
    /// Lexicon TOML overriding the built-in word lists
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Linear style model artifact (JSON)
    #[arg(long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    claimcheck_core::telemetry::init_tracing(cli.json, level);

    match cli.command {
        Commands::Style { claim, style } => cmd_style(&claim, &style),
        Commands::Check {
            claim,
            corpus,
            config,
            dim,
            style,
        } => cmd_check(&claim, &corpus, config.as_deref(), dim, &style).await,
    }
}

fn cmd_style(claim: &str, args: &StyleArgs) -> Result<()> {
    let result = run_style(claim, args)?;
    print_json(&result)
}

async fn cmd_check(
    claim: &str,
    corpus: &Path,
    config: Option<&Path>,
    dim: usize,
    args: &StyleArgs,
) -> Result<()> {
    let report = run_check(claim, corpus, config, dim, args).await?;
    info!(
        check_id = %report.check_id,
        verdict = %report.verdict,
        confidence = report.confidence,
        "check complete"
    );
    METRICS.flush();
    print_json(&report)
}

fn run_style(claim: &str, args: &StyleArgs) -> Result<StyleResult> {
    let (_, analyzer) = build_style(args)?;
    Ok(analyzer.analyze(&ClaimText::new(claim)))
}

async fn run_check(
    claim: &str,
    corpus: &Path,
    config: Option<&Path>,
    dim: usize,
    args: &StyleArgs,
) -> Result<CheckReport> {
    let config = match config {
        Some(path) => CheckerConfig::load(path)
            .with_context(|| format!("Failed to load config: {:?}", path))?,
        None => CheckerConfig::from_env().context("Invalid CLAIMCHECK_* environment")?,
    };
    let corpus = Arc::new(
        StaticCorpus::load(corpus)
            .with_context(|| format!("Failed to load corpus: {:?}", corpus))?,
    );
    info!(documents = corpus.len(), "corpus loaded");

    let embedder = Arc::new(HashingEmbedder::new(dim)?);
    let (lexicon, analyzer) = build_style(args)?;
    let verifier = EvidenceVerifier::new(embedder.clone(), lexicon);

    let checker = FactChecker::new(corpus.clone(), corpus, embedder)
        .with_config(config)
        .with_style_analyzer(analyzer)
        .with_verifier(verifier);

    Ok(checker.check(claim).await?)
}

/// Lexicon and style analyzer from the optional `--lexicon` and `--model` files.
fn build_style(args: &StyleArgs) -> Result<(Arc<Lexicon>, StyleAnalyzer)> {
    let lexicon = match &args.lexicon {
        Some(path) => Lexicon::load(path)
            .with_context(|| format!("Failed to load lexicon: {:?}", path))?,
        None => Lexicon::default(),
    };
    let lexicon = Arc::new(lexicon);

    let mut analyzer = StyleAnalyzer::new(lexicon.clone());
    if let Some(path) = &args.model {
        let model = LinearTextClassifier::load(path)
            .with_context(|| format!("Failed to load style model: {:?}", path))?;
        analyzer = analyzer.with_classifier(Arc::new(model));
    }
    Ok((lexicon, analyzer))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimcheck_core::Verdict;

    const CORPUS: &str = r#"[
        {
            "source": "Reuters",
            "url": "https://reuters.example/council",
            "published": "2024-05-02",
            "reliability": 0.95,
            "content": "On Monday the city council approved the new transit budget after debate. Critics argued the plan would raise fares for commuters next year."
        },
        {
            "source": "Blog",
            "url": "https://blog.example/empty",
            "reliability": 0.3,
            "content": ""
        }
    ]"#;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_cli_parses_check_arguments() {
        let cli = Cli::try_parse_from([
            "claimcheck",
            "--json",
            "check",
            "Some claim",
            "--corpus",
            "corpus.json",
            "--dim",
            "64",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Check { claim, dim, .. } => {
                assert_eq!(claim, "Some claim");
                assert_eq!(dim, 64);
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_style_with_custom_lexicon() {
        let dir = tempfile::tempdir().unwrap();
        let lexicon = write(&dir, "lexicon.toml", "sensational = [\"bombshell\"]\n");
        let args = StyleArgs {
            lexicon: Some(lexicon),
            model: None,
        };

        let result = run_style("Bombshell report lands today", &args).unwrap();

        assert_eq!(result.features.sensational_count, 1);
        assert!((result.style_score - 0.15).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_check_against_corpus_file() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write(&dir, "corpus.json", CORPUS);
        let config = write(&dir, "config.toml", "max_concurrency = 2\n");

        let report = run_check(
            "The city council approved the new transit budget",
            &corpus,
            Some(&config),
            HashingEmbedder::DEFAULT_DIM,
            &StyleArgs::default(),
        )
        .await
        .unwrap();

        assert!(matches!(report.verdict, Verdict::True | Verdict::LikelyTrue));
        assert_eq!(report.evidence.len(), 1);
        assert_eq!(report.evidence[0].source, "Reuters");
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_missing_corpus_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(&dir, "config.toml", "");
        let err = run_check(
            "claim",
            &dir.path().join("absent.json"),
            Some(&config),
            16,
            &StyleArgs::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Failed to load corpus"));
    }
}
