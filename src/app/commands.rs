use crate::app::report;
use crate::config::cli::{Command, KindArg, OutputFormat};
use crate::core::RentalStore;
use crate::domain::{ConfigProvider, Customer, LineStorage, Vehicle, VehicleStatus};
use crate::utils::error::{RentalError, Result};
use chrono::NaiveDate;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Runs one subcommand against an already loaded store and returns the text to print.
pub fn execute<S: LineStorage, C: ConfigProvider>(
    command: &Command,
    format: OutputFormat,
    store: &mut RentalStore<S, C>,
) -> Result<String> {
    match command {
        Command::AddVehicle {
            kind,
            plate,
            make,
            model,
            year,
            seats,
            accessible,
            cargo,
            trailer,
        } => {
            let vehicle = match kind {
                KindArg::Car => {
                    let seats = seats.ok_or_else(|| missing("car", "seats"))?;
                    Vehicle::car(make, model, *year, seats)
                }
                KindArg::Minibus => Vehicle::minibus(make, model, *year, *accessible),
                KindArg::Pickup => {
                    let cargo = cargo.ok_or_else(|| missing("pickup", "cargo"))?;
                    Vehicle::pickup_truck(make, model, *year, cargo, *trailer)
                }
            }
            .with_plate(plate)?;

            let added = store
                .add_vehicle(vehicle)
                .ok_or_else(|| RentalError::InvalidPlate {
                    plate: plate.clone(),
                })?;
            let stored = store.vehicle(added).map(|v| v.to_string()).unwrap_or_default();
            Ok(format!("Vehicle added: {}", stored))
        }

        Command::AddCustomer { id, name } => {
            let added = store.add_customer(Customer::new(*id, name.trim()));
            let stored = store.customer(added).map(|c| c.to_string()).unwrap_or_default();
            Ok(format!("Customer added: {}", stored))
        }

        Command::Rent {
            plate,
            customer,
            amount,
            date,
        } => {
            let (vehicle, customer) = resolve(store, plate, *customer)?;
            let date = date.unwrap_or_else(today);
            if store.rent_vehicle(vehicle, customer, date, *amount) {
                Ok(format!("Vehicle {} rented on {}.", plate.to_uppercase(), date))
            } else {
                Err(rejected(store, "rent", plate, vehicle))
            }
        }

        Command::Return {
            plate,
            customer,
            fees,
            date,
        } => {
            let (vehicle, customer) = resolve(store, plate, *customer)?;
            let date = date.unwrap_or_else(today);
            if store.return_vehicle(vehicle, customer, date, *fees) {
                Ok(format!("Vehicle {} returned on {}.", plate.to_uppercase(), date))
            } else {
                Err(rejected(store, "return", plate, vehicle))
            }
        }

        Command::Vehicles { status } => {
            let status: Option<VehicleStatus> = status.map(Into::into);
            let vehicles = store.vehicles_with_status(status);
            match format {
                OutputFormat::Table => Ok(report::vehicle_table(vehicles, status)),
                OutputFormat::Json => report::vehicles_json(vehicles),
            }
        }

        Command::Customers => match format {
            OutputFormat::Table => Ok(report::customer_list(store.customers())),
            OutputFormat::Json => report::customers_json(store.customers()),
        },

        Command::History => match format {
            OutputFormat::Table => Ok(report::history_table(store.history())),
            OutputFormat::Json => report::history_json(store.history()),
        },
    }
}

fn missing(kind: &str, argument: &str) -> RentalError {
    RentalError::MissingArgument {
        kind: kind.to_string(),
        argument: argument.to_string(),
    }
}

fn resolve<S: LineStorage, C: ConfigProvider>(
    store: &RentalStore<S, C>,
    plate: &str,
    customer_id: i32,
) -> Result<(crate::domain::VehicleRef, crate::domain::CustomerRef)> {
    let vehicle = store
        .find_vehicle_by_plate(plate)
        .ok_or_else(|| RentalError::VehicleNotFound {
            plate: plate.to_string(),
        })?;
    let customer = store
        .find_customer_by_id(customer_id)
        .ok_or(RentalError::CustomerNotFound { id: customer_id })?;
    Ok((vehicle, customer))
}

fn rejected<S: LineStorage, C: ConfigProvider>(
    store: &RentalStore<S, C>,
    action: &str,
    plate: &str,
    vehicle: crate::domain::VehicleRef,
) -> RentalError {
    RentalError::TransitionRejected {
        action: action.to_string(),
        plate: plate.to_uppercase(),
        status: store
            .vehicle(vehicle)
            .map(|v| v.status().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use crate::config::cli::StatusArg;
    use crate::config::Settings;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> RentalStore<LocalStorage, Settings> {
        RentalStore::new(LocalStorage::new(dir.path()), Settings::default())
    }

    fn add_car(store: &mut RentalStore<LocalStorage, Settings>) -> Result<String> {
        execute(
            &Command::AddVehicle {
                kind: KindArg::Car,
                plate: "ab1234".to_string(),
                make: "toyota".to_string(),
                model: "corolla".to_string(),
                year: 2020,
                seats: Some(5),
                accessible: false,
                cargo: None,
                trailer: false,
            },
            OutputFormat::Table,
            store,
        )
    }

    fn rent(plate: &str, customer: i32) -> Command {
        Command::Rent {
            plate: plate.to_string(),
            customer,
            amount: 100.0,
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
        }
    }

    #[test]
    fn test_add_and_rent_flow() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let added = add_car(&mut store).unwrap();
        assert_eq!(added, "Vehicle added: | AB1234 | Toyota | Corolla | 2020 | Available |");

        execute(
            &Command::AddCustomer {
                id: 1,
                name: " Alice ".to_string(),
            },
            OutputFormat::Table,
            &mut store,
        )
        .unwrap();

        let out = execute(&rent("ab1234", 1), OutputFormat::Table, &mut store).unwrap();
        assert_eq!(out, "Vehicle AB1234 rented on 2024-06-01.");

        let err = execute(&rent("AB1234", 1), OutputFormat::Table, &mut store).unwrap_err();
        assert!(matches!(
            err,
            RentalError::TransitionRejected { ref status, .. } if status == "Rented"
        ));

        let listing = execute(
            &Command::Vehicles {
                status: Some(StatusArg::Rented),
            },
            OutputFormat::Table,
            &mut store,
        )
        .unwrap();
        assert!(listing.contains("=== Rented Vehicles ==="));
        assert!(listing.contains("AB1234"));
    }

    #[test]
    fn test_missing_seat_count() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let err = execute(
            &Command::AddVehicle {
                kind: KindArg::Car,
                plate: "AB1234".to_string(),
                make: "toyota".to_string(),
                model: "corolla".to_string(),
                year: 2020,
                seats: None,
                accessible: false,
                cargo: None,
                trailer: false,
            },
            OutputFormat::Table,
            &mut store,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RentalError::MissingArgument { ref argument, .. } if argument == "seats"
        ));
        assert!(store.vehicles().is_empty());
    }

    #[test]
    fn test_invalid_plate_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let err = execute(
            &Command::AddVehicle {
                kind: KindArg::Minibus,
                plate: "AB-12".to_string(),
                make: "ford".to_string(),
                model: "transit".to_string(),
                year: 2019,
                seats: None,
                accessible: true,
                cargo: None,
                trailer: false,
            },
            OutputFormat::Table,
            &mut store,
        )
        .unwrap_err();
        assert!(matches!(err, RentalError::InvalidPlate { .. }));
        assert!(!dir.path().join("vehicles.txt").exists());
    }

    #[test]
    fn test_unknown_references() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let err = execute(&rent("ZZ0000", 1), OutputFormat::Table, &mut store).unwrap_err();
        assert!(matches!(err, RentalError::VehicleNotFound { .. }));

        add_car(&mut store).unwrap();
        let err = execute(&rent("AB1234", 42), OutputFormat::Table, &mut store).unwrap_err();
        assert!(matches!(err, RentalError::CustomerNotFound { id: 42 }));
    }

    #[test]
    fn test_history_json() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        add_car(&mut store).unwrap();
        store.add_customer(Customer::new(1, "Alice"));
        execute(&rent("AB1234", 1), OutputFormat::Table, &mut store).unwrap();

        let json = execute(&Command::History, OutputFormat::Json, &mut store).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["plate"], "AB1234");
        assert_eq!(parsed[0]["amount"], 100.0);
    }
}
