#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::domain::{ConfigProvider, MalformedLinePolicy};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VEHICLE_FILE: &str = "vehicles.txt";
pub const DEFAULT_CUSTOMER_FILE: &str = "customers.txt";
pub const DEFAULT_RECORD_FILE: &str = "records.txt";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

/// Fully resolved settings: defaults, then the TOML file, then CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    pub vehicle_file: String,
    pub customer_file: String,
    pub record_file: String,
    pub on_malformed: MalformedLinePolicy,
    pub log_level: String,
    pub log_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            vehicle_file: DEFAULT_VEHICLE_FILE.to_string(),
            customer_file: DEFAULT_CUSTOMER_FILE.to_string(),
            record_file: DEFAULT_RECORD_FILE.to_string(),
            on_malformed: MalformedLinePolicy::SkipLine,
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
        }
    }
}

impl Settings {
    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.data_dir)?;
        validation::validate_file_name("storage.vehicle_file", &self.vehicle_file)?;
        validation::validate_file_name("storage.customer_file", &self.customer_file)?;
        validation::validate_file_name("storage.record_file", &self.record_file)?;
        validation::validate_distinct(
            "storage",
            &[
                self.vehicle_file.as_str(),
                self.customer_file.as_str(),
                self.record_file.as_str(),
            ],
        )?;
        validation::validate_one_of("logging.level", &self.log_level, &LOG_LEVELS)?;
        validation::validate_one_of("logging.format", &self.log_format, &LOG_FORMATS)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn vehicle_file(&self) -> &str {
        &self.vehicle_file
    }

    fn customer_file(&self) -> &str {
        &self.customer_file
    }

    fn record_file(&self) -> &str {
        &self.record_file
    }

    fn malformed_policy(&self) -> MalformedLinePolicy {
        self.on_malformed
    }
}
