use anyhow::Context;
use clap::Parser;
use fleet_rental::app::commands;
use fleet_rental::utils::error::ErrorSeverity;
use fleet_rental::utils::{logger, validation::Validate};
use fleet_rental::{CliConfig, LocalStorage, RentalStore};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = cli
        .settings()
        .with_context(|| format!("Failed to load config file '{}'", cli.config))?;

    if settings.json_logs() {
        logger::init_json_logger(cli.verbose, Some(settings.log_level.as_str()));
    } else {
        logger::init_cli_logger(cli.verbose, Some(settings.log_level.as_str()));
    }

    if cli.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(settings.data_dir.clone());
    let mut store = RentalStore::new(storage, settings);
    let summary = store.load_data();
    tracing::debug!("Load summary: {:?}", summary);

    match commands::execute(&cli.command, cli.format, &mut store) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            tracing::error!(
                "Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
