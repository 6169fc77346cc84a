//! Client configuration.
//!
//! Layered like this, later sources winning:
//! built-in defaults, `config/default.*`, `config/{RUN_MODE}.*`,
//! `LIBRARY_*` environment variables (`__` separates nesting, e.g.
//! `LIBRARY_API__BASE_URL`), and finally `API_URL`.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Whole-request timeout handed to the HTTP transport. Unset means none.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub api: ApiConfig,
}

impl ClientConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::build(&run_mode, None, env::var("API_URL").ok())
    }

    /// `env` replaces the process environment when given.
    pub(crate) fn build(
        run_mode: &str,
        env: Option<HashMap<String, String>>,
        api_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("api.base_url", "http://localhost:8000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("LIBRARY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("api.base_url", api_url)?
            .build()?;

        config.try_deserialize()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let config = ClientConfig::build("test", Some(HashMap::new()), None).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn prefixed_environment_overrides_defaults() {
        let env = HashMap::from([
            ("LIBRARY_API__BASE_URL".to_string(), "http://books.local".to_string()),
            ("LIBRARY_API__TIMEOUT_SECS".to_string(), "15".to_string()),
        ]);
        let config = ClientConfig::build("test", Some(env), None).unwrap();
        assert_eq!(config.api.base_url, "http://books.local");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn api_url_wins_over_everything() {
        let env = HashMap::from([(
            "LIBRARY_API__BASE_URL".to_string(),
            "http://books.local".to_string(),
        )]);
        let config =
            ClientConfig::build("test", Some(env), Some("http://api.example".to_string()))
                .unwrap();
        assert_eq!(config.api.base_url, "http://api.example");
    }

    #[test]
    fn load_reads_api_url_from_process_environment() {
        std::env::set_var("API_URL", "http://from-env.example");
        let config = ClientConfig::load().unwrap();
        std::env::remove_var("API_URL");
        assert_eq!(config.api.base_url, "http://from-env.example");
    }
}
