//! Mock server configuration: defaults, optional `config/mock` file,
//! `MOCK_*` environment variables, then `PORT` and `RUST_LOG` overrides.

use std::collections::HashMap;
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub server: ListenConfig,
    pub logging: LoggingConfig,
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(None, env::var("PORT").ok(), env::var("RUST_LOG").ok())
    }

    fn build(
        env: Option<HashMap<String, String>>,
        port: Option<String>,
        filter: Option<String>,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("logging.level", "mock_server=debug,tower_http=debug")?
            .add_source(File::with_name("config/mock").required(false))
            .add_source(
                Environment::with_prefix("MOCK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("server.port", port)?
            .set_override_option("logging.level", filter)?
            .build()?
            .try_deserialize()
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
