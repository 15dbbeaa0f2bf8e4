pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::LocalStorage;
pub use config::Settings;
pub use core::{LoadSummary, RecordView, RentalHistory, RentalStore};
pub use domain::{Customer, RecordType, RentalRecord, Vehicle, VehicleKind, VehicleStatus};
pub use utils::error::{RentalError, Result};
