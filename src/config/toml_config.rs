use crate::config::Settings;
use crate::domain::MalformedLinePolicy;
use crate::utils::error::{RentalError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub storage: Option<StorageConfig>,
    pub load: Option<LoadConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
    pub vehicle_file: Option<String>,
    pub customer_file: Option<String>,
    pub record_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadConfig {
    pub on_malformed: Option<MalformedLinePolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

impl TomlConfig {
    /// Reads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RentalError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Like `from_file`, but a missing file yields an empty config.
    pub fn from_optional_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                path.as_ref().display()
            );
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RentalError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Overlays every value present in this file onto `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(storage) = &self.storage {
            if let Some(dir) = &storage.data_dir {
                settings.data_dir = dir.clone();
            }
            if let Some(file) = &storage.vehicle_file {
                settings.vehicle_file = file.clone();
            }
            if let Some(file) = &storage.customer_file {
                settings.customer_file = file.clone();
            }
            if let Some(file) = &storage.record_file {
                settings.record_file = file.clone();
            }
        }

        if let Some(policy) = self.load.as_ref().and_then(|l| l.on_malformed) {
            settings.on_malformed = policy;
        }

        if let Some(logging) = &self.logging {
            if let Some(level) = &logging.level {
                settings.log_level = level.to_lowercase();
            }
            if let Some(format) = &logging.format {
                settings.log_format = format.to_lowercase();
            }
        }
    }

    pub fn into_settings(self) -> Settings {
        let mut settings = Settings::default();
        self.apply_to(&mut settings);
        settings
    }
}
