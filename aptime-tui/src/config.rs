//! Configuration loading for the Aptime console.
//!
//! All fields are required. No defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    pub api_base_url: String,
    /// Query parameter that carries the resource name, e.g. `endpoint`.
    pub resource_param: String,
    pub request_timeout_ms: u64,
    pub tick_rate_ms: u64,
    /// Role every management view requires.
    pub required_role: String,
    pub persistence_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
    pub theme: ThemeConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: f64,
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based), capped at `max_backoff_ms`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let mut delay = self.backoff_ms;
        for _ in 0..attempt {
            let next = (delay as f64 * self.multiplier) as u64;
            delay = next.min(self.max_backoff_ms);
        }
        Duration::from_millis(delay.min(self.max_backoff_ms))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or APTIME_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: TuiConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(invalid("api_base_url", "must start with http:// or https://"));
        }
        if self.resource_param.trim().is_empty() {
            return Err(invalid("resource_param", "must not be empty"));
        }
        if self.request_timeout_ms == 0 {
            return Err(invalid("request_timeout_ms", "must be > 0"));
        }
        if self.tick_rate_ms == 0 {
            return Err(invalid("tick_rate_ms", "must be > 0"));
        }
        if self.required_role.trim().is_empty() {
            return Err(invalid("required_role", "must not be empty"));
        }
        if self.persistence_path.as_os_str().is_empty() {
            return Err(invalid("persistence_path", "must not be empty"));
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(invalid("log_path", "must not be empty"));
        }
        if self.log_filter.trim().is_empty() {
            return Err(invalid("log_filter", "must not be empty"));
        }
        if self.theme.name.trim().is_empty() {
            return Err(invalid("theme.name", "must not be empty"));
        }
        if self.theme.name.to_ascii_lowercase() != "synthbrute" {
            return Err(invalid("theme.name", "only 'synthbrute' is supported"));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "must be > 0"));
        }
        if self.retry.backoff_ms == 0 {
            return Err(invalid("retry.backoff_ms", "must be > 0"));
        }
        if self.retry.max_backoff_ms < self.retry.backoff_ms {
            return Err(invalid("retry.max_backoff_ms", "must be >= backoff_ms"));
        }
        if self.retry.multiplier < 1.0 {
            return Err(invalid("retry.multiplier", "must be >= 1.0"));
        }
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("APTIME_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
api_base_url = "http://localhost/aptime/api.php"
resource_param = "endpoint"
request_timeout_ms = 5000
tick_rate_ms = 250
required_role = "admin"
persistence_path = "/tmp/aptime/state.json"
log_path = "/tmp/aptime/aptime.log"
log_filter = "aptime_tui=info"

[theme]
name = "synthbrute"

[retry]
max_attempts = 3
backoff_ms = 200
max_backoff_ms = 2000
multiplier = 2.0
"#;

    #[test]
    fn test_sample_config_parses_and_validates() {
        let config = TuiConfig::from_toml(SAMPLE).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.resource_param, "endpoint");
        assert_eq!(config.request_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let contents = format!("{}\nextra = 1\n", SAMPLE.replace("[theme]", "bogus = true\n[theme]"));
        assert!(matches!(TuiConfig::from_toml(&contents), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let contents = SAMPLE.replace("tick_rate_ms = 250\n", "");
        assert!(matches!(TuiConfig::from_toml(&contents), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_retry_delay_grows_and_caps() {
        let retry = RetryConfig {
            max_attempts: 5,
            backoff_ms: 200,
            max_backoff_ms: 1000,
            multiplier: 2.0,
        };
        assert_eq!(retry.delay_for(0), Duration::from_millis(200));
        assert_eq!(retry.delay_for(1), Duration::from_millis(400));
        assert_eq!(retry.delay_for(2), Duration::from_millis(800));
        assert_eq!(retry.delay_for(3), Duration::from_millis(1000));
        assert_eq!(retry.delay_for(10), Duration::from_millis(1000));
    }
}
