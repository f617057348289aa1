//! Layered application configuration.
//!
//! Sources, later ones winning: built-in defaults, the YAML file passed with
//! `--config`, `FOODGRAM__*` environment variables (`__` separates nesting
//! levels, e.g. `FOODGRAM__SERVER__BIND_ADDR`), then CLI overrides.

use std::path::Path;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use foodgram::FoodgramConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "FOODGRAM__";
pub const MOCK_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub foodgram: FoodgramConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sea-orm connection string, `sqlite://...` or `postgres://...`
    pub dsn: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite://foodgram.db?mode=rwc".to_owned(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` level when `RUST_LOG` is not set.
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Merge defaults, the optional YAML file and the environment.
    ///
    /// # Errors
    /// Fails when a source cannot be parsed or a value has the wrong type.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// `--port` replaces the port of `server.bind_addr`; `--mock` switches
    /// to a private in-memory SQLite database.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>, mock: bool) {
        if let Some(port) = port {
            let host = self
                .server
                .bind_addr
                .rsplit_once(':')
                .map_or(self.server.bind_addr.as_str(), |(host, _)| host);
            self.server.bind_addr = format!("{host}:{port}");
        }
        if mock {
            self.database.dsn = MOCK_DSN.to_owned();
            self.database.max_connections = 1;
        }
    }

    /// # Errors
    /// Fails when the configuration cannot be serialized.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration as YAML")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8087");
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert_eq!(cfg.foodgram, FoodgramConfig::default());
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  bind_addr: 0.0.0.0:9000\nlogging:\n  level: debug\n  format: json\nfoodgram:\n  default_page_size: 12"
        )
        .unwrap();

        let cfg = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.foodgram.default_page_size, 12);
        assert_eq!(cfg.foodgram.max_page_size, 100);
        assert_eq!(cfg.database, DatabaseConfig::default());
    }

    #[test]
    fn cli_overrides_port_and_database() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(Some(9999), true);
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:9999");
        assert_eq!(cfg.database.dsn, MOCK_DSN);
        assert_eq!(cfg.database.max_connections, 1);
    }

    #[test]
    fn yaml_output_names_every_section() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        for key in ["server", "bind_addr", "database", "logging", "foodgram"] {
            assert!(yaml.contains(key), "missing {key} in\n{yaml}");
        }
    }
}
