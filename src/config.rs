use crate::detector::DetectionOptions;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub detection: DetectionOptions,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub device_path: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Команда оболочки, запускаемая при каждом вводе Konami Code
    pub command: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            filter: "koco=info".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: "auto".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let config: Config = Self::figment(config_path)
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    /// Значения по умолчанию, затем TOML, затем переменные `KOCO_*`
    /// (`KOCO_DETECTION__MAX_INTERVAL_MS=500`)
    pub fn figment<P: AsRef<Path>>(config_path: P) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path.as_ref()))
            .merge(Env::prefixed("KOCO_").split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.input.device_path.is_empty() {
            anyhow::bail!("input.device_path не может быть пустым (используйте \"auto\")");
        }

        if let Some(command) = &self.notify.command {
            if command.trim().is_empty() {
                anyhow::bail!("notify.command задан, но пуст");
            }
        }

        Ok(())
    }
}
