//! File-backed tracing setup. The terminal belongs to the UI, so logs go to
//! `log_path`.

use crate::config::TuiConfig;
use crate::error::TuiError;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `log_filter`.
pub const LOG_ENV: &str = "APTIME_LOG";

pub fn build_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init_logging(config: &TuiConfig) -> Result<(), TuiError> {
    if let Some(parent) = config.log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.log_filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| TuiError::Logging(e.to_string()))?;

    tracing::info!(
        log_path = %config.log_path.display(),
        api_base_url = %config.api_base_url,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_creates_nested_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("logs").join("aptime.log");
        let contents = format!(
            r#"
api_base_url = "http://localhost/api.php"
resource_param = "endpoint"
request_timeout_ms = 1000
tick_rate_ms = 250
required_role = "admin"
persistence_path = "{state}"
log_path = "{log}"
log_filter = "aptime_tui=debug"

[theme]
name = "synthbrute"

[retry]
max_attempts = 1
backoff_ms = 10
max_backoff_ms = 10
multiplier = 1.0
"#,
            state = dir.path().join("state.json").display(),
            log = log_path.display(),
        );
        let config = TuiConfig::from_toml(&contents).unwrap();

        init_logging(&config).unwrap();
        assert!(log_path.exists());
        assert!(init_logging(&config).is_err());
    }
}
