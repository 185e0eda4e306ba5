//! Logging setup
//!
//! Diagnostics go to stderr so piped stdout (TSV, JSON, ...) stays clean.
//! `RUST_LOG` overrides the level chosen from the command line.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter: warnings only, or debug with `--verbose`
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "jobroute=debug"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (e.g. in-process tests) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "jobroute=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
