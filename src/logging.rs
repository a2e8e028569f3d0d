//! Log output of the command-line binary.
//!
//! Events go to stderr so stdout stays free for dry-run output. `RUST_LOG` overrides the
//! default filter.

use tracing_subscriber::EnvFilter;

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info,dynamodb_bulk=debug"
    } else {
        "warn,dynamodb_bulk=info"
    }
}

/// Install the global subscriber. Only the first call has an effect.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::quiet(false, "warn,dynamodb_bulk=info")]
    #[case::verbose(true, "info,dynamodb_bulk=debug")]
    fn test_default_directive(#[case] verbose: bool, #[case] expected: &str) {
        assert_eq!(default_directive(verbose), expected);
        assert!(EnvFilter::try_new(expected).is_ok());
    }
}
