//! Table and JSON renderings of the store's read accessors.

use crate::core::RecordView;
use crate::domain::{Customer, RecordType, Vehicle, VehicleStatus};
use crate::utils::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

const VEHICLE_RULE: &str =
    "|--------------------------------------------------------------------------------------------|";
const HISTORY_RULE: &str =
    "|-------------------------------------------------------------------------------|";

#[derive(Debug, Serialize)]
pub struct HistoryRow<'a> {
    #[serde(rename = "type")]
    pub kind: &'a RecordType,
    pub plate: &'a str,
    pub customer_id: i32,
    pub customer: &'a str,
    pub date: NaiveDate,
    pub amount: f64,
}

impl<'a> From<RecordView<'a>> for HistoryRow<'a> {
    fn from(view: RecordView<'a>) -> Self {
        Self {
            kind: view.record.kind(),
            plate: view.vehicle.license_plate().unwrap_or_default(),
            customer_id: view.customer.id(),
            customer: view.customer.name(),
            date: view.record.date(),
            amount: view.record.amount(),
        }
    }
}

pub fn vehicle_table<'a>(
    vehicles: impl IntoIterator<Item = &'a Vehicle>,
    status: Option<VehicleStatus>,
) -> String {
    let mut out = String::new();
    match status {
        None => out.push_str("\n=== All Vehicles ===\n"),
        Some(status) => {
            let _ = writeln!(out, "\n=== {} Vehicles ===", status);
        }
    }
    let _ = writeln!(
        out,
        "|{:<16} | {:<12} | {:<12} | {:<12} | {:<6} | {:<18} |",
        " Type", "Plate", "Make", "Model", "Year", "Status"
    );
    out.push_str(VEHICLE_RULE);
    out.push('\n');

    let mut found = false;
    for vehicle in vehicles {
        found = true;
        let _ = writeln!(
            out,
            "| {:<15} | {:<12} | {:<12} | {:<12} | {:<6} | {:<18} |",
            vehicle.kind().label(),
            vehicle.license_plate().unwrap_or_default(),
            vehicle.make().unwrap_or_default(),
            vehicle.model().unwrap_or_default(),
            vehicle.year(),
            vehicle.status().to_string()
        );
    }

    if !found {
        match status {
            None => out.push_str("  No Vehicles found.\n"),
            Some(status) => {
                let _ = writeln!(out, "  No vehicles with Status: {}", status);
            }
        }
    }
    out
}

pub fn customer_list<'a>(customers: impl IntoIterator<Item = &'a Customer>) -> String {
    let mut out = String::new();
    for customer in customers {
        let _ = writeln!(out, "  {}", customer);
    }
    if out.is_empty() {
        out.push_str("  No customers found.\n");
    }
    out
}

pub fn history_table<'a>(views: impl IntoIterator<Item = RecordView<'a>>) -> String {
    let mut rows = views.into_iter().map(HistoryRow::from).peekable();
    if rows.peek().is_none() {
        return "  No rental history found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "|{:<10} | {:<12} | {:<20} | {:<12} | {:<12} |",
        " Type", "Plate", "Customer", "Date", "Amount"
    );
    out.push_str(HISTORY_RULE);
    out.push('\n');
    for row in rows {
        let _ = writeln!(
            out,
            "| {:<9} | {:<12} | {:<20} | {:<12} | ${:<11.2} |",
            row.kind.as_str(),
            row.plate,
            row.customer,
            row.date.to_string(),
            row.amount
        );
    }
    out
}

pub fn vehicles_json<'a>(vehicles: impl IntoIterator<Item = &'a Vehicle>) -> Result<String> {
    let vehicles: Vec<&Vehicle> = vehicles.into_iter().collect();
    Ok(serde_json::to_string_pretty(&vehicles)?)
}

pub fn customers_json<'a>(customers: impl IntoIterator<Item = &'a Customer>) -> Result<String> {
    let customers: Vec<&Customer> = customers.into_iter().collect();
    Ok(serde_json::to_string_pretty(&customers)?)
}

pub fn history_json<'a>(views: impl IntoIterator<Item = RecordView<'a>>) -> Result<String> {
    let rows: Vec<HistoryRow<'a>> = views.into_iter().map(HistoryRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerRef, RentalRecord, VehicleRef};

    fn fleet() -> Vec<Vehicle> {
        let car = Vehicle::car("toyota", "corolla", 2020, 5)
            .with_plate("AB1234")
            .unwrap();
        let mut truck = Vehicle::pickup_truck("ram", "1500", 2022, 1.5, true)
            .with_plate("PK9")
            .unwrap();
        truck.set_status(VehicleStatus::Rented);
        vec![car, truck]
    }

    #[test]
    fn test_vehicle_table_lists_rows() {
        let vehicles = fleet();
        let table = vehicle_table(&vehicles, None);
        assert!(table.contains("=== All Vehicles ==="));
        assert!(table.contains(
            "| Car             | AB1234       | Toyota       | Corolla      | 2020   | Available          |"
        ));
        assert!(table.contains("| Pickup Truck    | PK9"));
    }

    #[test]
    fn test_vehicle_table_empty_messages() {
        assert!(vehicle_table(&[], None).contains("No Vehicles found."));
        assert!(vehicle_table(&[], Some(VehicleStatus::Held))
            .contains("No vehicles with Status: Held"));
    }

    #[test]
    fn test_history_table() {
        let vehicles = fleet();
        let alice = Customer::new(1, "Alice");
        let record = RentalRecord::new(
            VehicleRef(0),
            CustomerRef(0),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            100.0,
            RecordType::Rent,
        );
        let view = RecordView {
            record: &record,
            vehicle: &vehicles[0],
            customer: &alice,
        };

        let table = history_table([view]);
        assert!(table.contains(
            "| RENT      | AB1234       | Alice                | 2024-06-01   | $100.00      |"
        ));
        assert_eq!(history_table(std::iter::empty()), "  No rental history found.\n");

        let json = history_json([view]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["type"], "RENT");
        assert_eq!(parsed[0]["date"], "2024-06-01");
        assert_eq!(parsed[0]["customer_id"], 1);
    }

    #[test]
    fn test_vehicles_json_tags_kind() {
        let vehicles = fleet();
        let json = vehicles_json(&vehicles).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["plate"], "AB1234");
        assert_eq!(parsed[0]["kind"]["type"], "car");
        assert_eq!(parsed[1]["kind"]["type"], "pickup_truck");
        assert_eq!(parsed[1]["status"], "Rented");
    }

    #[test]
    fn test_customer_list() {
        let customers = vec![Customer::new(1, "Alice"), Customer::new(2, "Bob")];
        let list = customer_list(&customers);
        assert_eq!(
            list,
            "  Customer ID: 1 | Name: Alice\n  Customer ID: 2 | Name: Bob\n"
        );
        assert_eq!(customer_list(&[]), "  No customers found.\n");
    }
}
