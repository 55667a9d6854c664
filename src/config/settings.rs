use std::{collections::HashSet, env, net::SocketAddr, path::Path, time::Duration};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{logging::LoggingConfig, pubsub::RECORDS_IN_RADIUS, upstream::SourceEndpoint, ConfigError};

/// Префикс переменных окружения: `RECORDCAST_BUS_CAPACITY`,
/// `RECORDCAST_UPSTREAM__BASE_URL`, `RECORDCAST_LOGGING__LEVEL`.
pub const ENV_PREFIX: &str = "RECORDCAST";
/// Явный путь к файлу конфигурации.
pub const CONFIG_PATH_ENV: &str = "RECORDCAST_CONFIG";
/// Файл, который ищется в рабочем каталоге, если путь не задан.
const DEFAULT_FILE: &str = "recordcast";
/// Порт платформы (переопределяет порт из `listen_address`).
const PORT_ENV: &str = "PORT";

/// Адрес upstream-сервиса.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamSettings {
    pub base_url: String,
}

/// Один источник записей: имя и путь относительно `upstream.base_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub listen_address: SocketAddr,
    pub topic: String,
    pub bus_capacity: usize,
    pub shutdown_grace_ms: u64,
    pub upstream: UpstreamSettings,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceSettings>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_sources() -> Vec<SourceSettings> {
    vec![
        SourceSettings {
            name: "homicide".to_string(),
            path: "/homicide-records/records-in-radius".to_string(),
        },
        SourceSettings {
            name: "theft".to_string(),
            path: "/theft-records/records-in-radius".to_string(),
        },
    ]
}

fn load_error(e: ::config::ConfigError) -> ConfigError {
    ConfigError::Load {
        reason: e.to_string(),
    }
}

impl Settings {
    /// Загружает настройки: значения по умолчанию, затем файл
    /// (`RECORDCAST_CONFIG` или `recordcast.toml`), затем окружение.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var_os(CONFIG_PATH_ENV);
        Self::load_from(path.as_deref().map(Path::new))
    }

    /// То же, что [`Settings::load`], но с явным путём к файлу. Явно
    /// указанный файл обязателен.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("listen_address", "127.0.0.1:4000")
            .and_then(|b| b.set_default("topic", RECORDS_IN_RADIUS))
            .and_then(|b| b.set_default("bus_capacity", 256))
            .and_then(|b| b.set_default("shutdown_grace_ms", 5000))
            .and_then(|b| b.set_default("upstream.base_url", "http://localhost:8080"))
            .map_err(load_error)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_FILE).required(false)),
        };

        let mut settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(load_error)?;

        if let Ok(port) = env::var(PORT_ENV) {
            settings.apply_port(&port)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn apply_port(
        &mut self,
        port: &str,
    ) -> Result<(), ConfigError> {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: PORT_ENV.to_string(),
            reason: format!("'{port}' is not a valid port"),
        })?;
        self.listen_address.set_port(port);
        Ok(())
    }

    /// Проверяет значения, которые иначе уронили бы процесс позже.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "bus_capacity".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.topic.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "topic".to_string(),
                reason: "must not be blank".to_string(),
            });
        }
        self.logging.validate()?;
        self.source_endpoints().map(|_| ())
    }

    /// Эндпоинты источников, разрешённые относительно `upstream.base_url`.
    pub fn source_endpoints(&self) -> Result<Vec<SourceEndpoint>, ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }

        let mut seen = HashSet::new();
        self.sources
            .iter()
            .map(|source| {
                if !seen.insert(source.name.as_str()) {
                    return Err(ConfigError::DuplicateSource {
                        name: source.name.clone(),
                    });
                }
                SourceEndpoint::resolve(&source.name, &self.upstream.base_url, &source.path)
            })
            .collect()
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}
