use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV_VAR: &str = "QUIPEDIT_LOG";

/// Logging configuration for the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, e.g. "warn" or "quipedit=debug"
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl LogConfig {
    /// Default config, overridden by `QUIPEDIT_LOG` when set.
    pub fn from_env() -> Self {
        match std::env::var(LOG_ENV_VAR) {
            Ok(filter) if !filter.trim().is_empty() => Self { filter },
            _ => Self::default(),
        }
    }

    /// Apply `-v`/`-q` flags. Flags win over the environment.
    pub fn with_verbosity(mut self, verbose: u8, quiet: bool) -> Self {
        let level = match (quiet, verbose) {
            (true, _) => Some("error"),
            (false, 0) => None,
            (false, 1) => Some("info"),
            (false, _) => Some("debug"),
        };
        if let Some(level) = level {
            self.filter = level.to_string();
        }
        self
    }

    /// Install a stderr subscriber. Does nothing if one is already set.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(LogConfig::default().filter, "warn");
    }

    #[test]
    fn test_verbosity_flags() {
        let base = LogConfig::default();
        assert_eq!(base.clone().with_verbosity(0, false).filter, "warn");
        assert_eq!(base.clone().with_verbosity(1, false).filter, "info");
        assert_eq!(base.clone().with_verbosity(3, false).filter, "debug");
        assert_eq!(base.with_verbosity(2, true).filter, "error");
    }

    #[test]
    fn test_flags_override_custom_filter() {
        let config = LogConfig {
            filter: "quipedit=trace".to_string(),
        };
        assert_eq!(config.clone().with_verbosity(0, false).filter, "quipedit=trace");
        assert_eq!(config.with_verbosity(0, true).filter, "error");
    }

    #[test]
    fn test_serialization() {
        let config = LogConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: LogConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
