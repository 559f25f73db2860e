//! Log output for the `claimcheck` binary.
//!
//! Reports go to stdout, so every log line is written to stderr. The filter
//! comes from `RUST_LOG`, then `CLAIMCHECK_LOG`, then the level chosen on the
//! command line.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crate-specific filter variable, consulted when `RUST_LOG` is unset.
pub const LOG_ENV: &str = "CLAIMCHECK_LOG";

/// Filter directives to use, given an environment `lookup`.
pub fn filter_directives<F>(lookup: F, level: Level) -> String
where
    F: Fn(&str) -> Option<String>,
{
    [EnvFilter::DEFAULT_ENV, LOG_ENV]
        .into_iter()
        .filter_map(|key| lookup(key))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| level.as_str().to_lowercase())
}

/// Install the global subscriber. Only the first call in a process has an
/// effect.
pub fn init_tracing(json: bool, level: Level) {
    let directives = filter_directives(|key| std::env::var(key).ok(), level);
    let filter = EnvFilter::try_new(&directives)
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let text = (!json).then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));
    let structured = json.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(structured)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_wins_over_crate_variable() {
        let lookup = |key: &str| match key {
            "RUST_LOG" => Some("claimcheck_core=trace".to_string()),
            "CLAIMCHECK_LOG" => Some("warn".to_string()),
            _ => None,
        };
        assert_eq!(filter_directives(lookup, Level::INFO), "claimcheck_core=trace");
    }

    #[test]
    fn test_blank_variables_fall_back_to_level() {
        let lookup = |key: &str| match key {
            "CLAIMCHECK_LOG" => Some("  ".to_string()),
            _ => None,
        };
        assert_eq!(filter_directives(lookup, Level::DEBUG), "debug");
        assert_eq!(
            filter_directives(|_| Some("warn".to_string()), Level::DEBUG),
            "warn"
        );
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
    }
}
