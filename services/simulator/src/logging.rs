//! Tracing subscriber setup

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a configured level name onto a filter directive, defaulting to `info`
pub fn level_directive(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Command-line level wins over the configured one
pub fn resolve_level<'a>(flag: Option<&'a str>, configured: &'a str) -> &'static str {
    level_directive(flag.unwrap_or(configured))
}

/// Install the global subscriber; `RUST_LOG` wins over the configured level
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_directive(level)));

    // Logs go to stderr so stdout stays clean for reports and JSON
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("warn"), "warn");
        assert_eq!(level_directive("verbose"), "info");
    }

    #[test]
    fn test_flag_overrides_configured_level() {
        assert_eq!(resolve_level(Some("trace"), "warn"), "trace");
        assert_eq!(resolve_level(None, "warn"), "warn");
        assert_eq!(resolve_level(None, "loud"), "info");
    }
}
