//! Logging initialization
//!
//! Diagnostics always go to stderr; stdout belongs to progress output and
//! NDJSON events.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "DEPLOY_AGENT_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Compact human-readable lines
    Human,
    /// One JSON object per line
    Json,
}

static INIT_ONCE: Once = Once::new();

/// Filter used when `DEPLOY_AGENT_LOG` is unset
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "deploy_agent=info",
        1 => "deploy_agent=debug",
        _ => "deploy_agent=trace",
    }
}

fn filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber; later calls are no-ops
pub fn init(profile: Profile, verbose: u8) {
    INIT_ONCE.call_once(|| {
        let result = match profile {
            Profile::Human => tracing_subscriber::fmt()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_env_filter(filter(verbose))
                .try_init(),
            Profile::Json => tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(filter(verbose))
                .try_init(),
        };
        if let Err(e) = result {
            eprintln!("warning: logging already initialized: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Human, 0);
        init(Profile::Json, 2);
    }

    #[test]
    fn test_verbosity_raises_level() {
        assert_eq!(default_directive(0), "deploy_agent=info");
        assert_eq!(default_directive(1), "deploy_agent=debug");
        assert_eq!(default_directive(5), "deploy_agent=trace");
    }
}
