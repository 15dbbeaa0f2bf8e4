#![cfg(feature = "cli")]

use clap::Parser;
use fleet_rental::app::commands;
use fleet_rental::{CliConfig, LocalStorage, RentalError, RentalStore};
use tempfile::TempDir;

/// Runs one CLI invocation the way the binary does: resolve settings, load, execute.
fn invoke(data_dir: &str, args: &[&str]) -> fleet_rental::Result<String> {
    let mut argv = vec!["fleet-rental", "--config", "missing-rental.toml", "--data-dir", data_dir];
    argv.extend_from_slice(args);
    let cli = CliConfig::parse_from(argv);

    let settings = cli.settings()?;
    let mut store = RentalStore::new(LocalStorage::new(settings.data_dir.clone()), settings);
    store.load_data();
    commands::execute(&cli.command, cli.format, &mut store)
}

#[test]
fn test_state_survives_between_invocations() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_str().unwrap();

    invoke(
        data_dir,
        &[
            "add-vehicle", "--kind", "car", "--plate", "ab1234", "--make", "toyota",
            "--model", "corolla", "--year", "2020", "--seats", "5",
        ],
    )
    .unwrap();
    invoke(data_dir, &["add-customer", "--id", "1", "--name", "Alice"]).unwrap();

    let out = invoke(
        data_dir,
        &["rent", "--plate", "AB1234", "--customer", "1", "--amount", "100", "--date", "2024-06-01"],
    )
    .unwrap();
    assert_eq!(out, "Vehicle AB1234 rented on 2024-06-01.");

    let err = invoke(
        data_dir,
        &["rent", "--plate", "AB1234", "--customer", "1", "--amount", "100", "--date", "2024-06-02"],
    )
    .unwrap_err();
    assert!(matches!(err, RentalError::TransitionRejected { ref status, .. } if status == "Rented"));

    let rented = invoke(data_dir, &["vehicles", "--status", "rented"]).unwrap();
    assert!(rented.contains("AB1234"));

    let out = invoke(
        data_dir,
        &["return", "--plate", "ab1234", "--customer", "1", "--fees", "10", "--date", "2024-06-03"],
    )
    .unwrap();
    assert_eq!(out, "Vehicle AB1234 returned on 2024-06-03.");

    let records = std::fs::read_to_string(temp_dir.path().join("records.txt")).unwrap();
    assert_eq!(
        records,
        "RENT,AB1234,1,2024-06-01,100\nRETURN,AB1234,1,2024-06-03,10\n"
    );

    let available = invoke(data_dir, &["vehicles", "--status", "available"]).unwrap();
    assert!(available.contains("AB1234"));

    let history = invoke(data_dir, &["history"]).unwrap();
    assert!(history.contains("| RENT      | AB1234       | Alice"));

    let customers = invoke(data_dir, &["--format", "json", "customers"]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&customers).unwrap();
    assert_eq!(parsed[0]["id"], 1);
    assert_eq!(parsed[0]["name"], "Alice");
}

#[test]
fn test_return_of_available_vehicle_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_str().unwrap();

    invoke(
        data_dir,
        &[
            "add-vehicle", "--kind", "minibus", "--plate", "MB01", "--make", "ford",
            "--model", "transit", "--year", "2019", "--accessible",
        ],
    )
    .unwrap();
    invoke(data_dir, &["add-customer", "--id", "2", "--name", "Bob"]).unwrap();

    let err = invoke(data_dir, &["return", "--plate", "MB01", "--customer", "2"]).unwrap_err();
    assert!(matches!(err, RentalError::TransitionRejected { ref status, .. } if status == "Available"));
    assert!(!temp_dir.path().join("records.txt").exists());

    let listing = invoke(data_dir, &["vehicles", "--status", "available"]).unwrap();
    assert!(listing.contains("| Minibus         | MB01"));
}

#[test]
fn test_free_text_with_commas_and_line_breaks_survives_reload() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().to_str().unwrap();

    invoke(
        data_dir,
        &[
            "add-vehicle", "--kind", "car", "--plate", "LR01", "--make", "land,rover",
            "--model", "defender", "--year", "2021", "--seats", "5",
        ],
    )
    .unwrap();
    invoke(data_dir, &["add-customer", "--id", "1", "--name", "Eve\n2,Mallory"]).unwrap();

    let vehicles = invoke(data_dir, &["--format", "json", "vehicles"]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&vehicles).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["make"], "Land,rover");

    let customers = invoke(data_dir, &["--format", "json", "customers"]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&customers).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["name"], "Eve\n2,Mallory");
}
