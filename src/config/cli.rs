use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::domain::{MalformedLinePolicy, VehicleStatus};
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Car,
    Minibus,
    Pickup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Available,
    Held,
    Rented,
    UnderMaintenance,
    OutOfService,
}

impl From<StatusArg> for VehicleStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Available => VehicleStatus::Available,
            StatusArg::Held => VehicleStatus::Held,
            StatusArg::Rented => VehicleStatus::Rented,
            StatusArg::UnderMaintenance => VehicleStatus::UnderMaintenance,
            StatusArg::OutOfService => VehicleStatus::OutOfService,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    SkipLine,
    AbortFile,
}

impl From<PolicyArg> for MalformedLinePolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::SkipLine => MalformedLinePolicy::SkipLine,
            PolicyArg::AbortFile => MalformedLinePolicy::AbortFile,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "fleet-rental")]
#[command(version)]
#[command(about = "Track vehicles, customers and rentals in flat text files")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// Path to TOML configuration file (optional)
    #[arg(long, global = true, default_value = "rental.toml")]
    pub config: String,

    /// Directory holding vehicles.txt, customers.txt and records.txt
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// What to do with unparseable lines while loading
    #[arg(long, global = true, value_enum)]
    pub on_malformed: Option<PolicyArg>,

    /// Output format for listings
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Register a vehicle
    AddVehicle {
        #[arg(long, value_enum)]
        kind: KindArg,

        #[arg(long)]
        plate: String,

        #[arg(long)]
        make: String,

        #[arg(long)]
        model: String,

        #[arg(long)]
        year: i32,

        /// Seat count (car)
        #[arg(long, required_if_eq("kind", "car"))]
        seats: Option<i32>,

        /// Wheelchair accessible (minibus)
        #[arg(long)]
        accessible: bool,

        /// Cargo capacity (pickup)
        #[arg(long, required_if_eq("kind", "pickup"))]
        cargo: Option<f64>,

        /// Has a trailer hitch (pickup)
        #[arg(long)]
        trailer: bool,
    },

    /// Register a customer
    AddCustomer {
        #[arg(long)]
        id: i32,

        #[arg(long)]
        name: String,
    },

    /// Rent an available vehicle to a customer
    Rent {
        #[arg(long)]
        plate: String,

        #[arg(long)]
        customer: i32,

        #[arg(long)]
        amount: f64,

        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Return a rented vehicle
    Return {
        #[arg(long)]
        plate: String,

        #[arg(long)]
        customer: i32,

        #[arg(long, default_value_t = 0.0)]
        fees: f64,

        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List vehicles, optionally by status
    Vehicles {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// List customers
    Customers,

    /// Show the rental history
    History,
}

impl CliConfig {
    /// Defaults, overlaid with the TOML file, overlaid with flags.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = TomlConfig::from_optional_file(&self.config)?.into_settings();

        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(policy) = self.on_malformed {
            settings.on_malformed = policy.into();
        }
        if self.log_json {
            settings.log_format = "json".to_string();
        }
        Ok(settings)
    }
}
