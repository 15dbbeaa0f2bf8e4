//! Line format for the three data files.
//!
//! ```text
//! vehicles:  TYPE,PLATE,MAKE,MODEL,YEAR,EXTRA,STATUS
//! customers: ID,NAME
//! records:   TYPE,PLATE,CUSTOMER_ID,DATE,AMOUNT
//! ```
//!
//! EXTRA is the seat count for `CAR`, the accessibility flag for `MINIBUS`
//! and `cargo;hasTrailer` for `PICKUP`. An unset MAKE or MODEL is written as
//! `null`.
//!
//! Free-text fields (MAKE, MODEL, NAME) escape `%`, `,`, CR and LF as
//! `%25`, `%2C`, `%0D` and `%0A`. Any other `%` sequence reads back verbatim.

use crate::domain::{Customer, RecordType, Vehicle, VehicleKind, VehicleStatus};
use chrono::NaiveDate;
use std::borrow::Cow;
use std::fmt;

pub const VEHICLE_FIELDS: usize = 7;
pub const CUSTOMER_FIELDS: usize = 2;
pub const RECORD_FIELDS: usize = 5;

const NULL: &str = "null";

/// Why a line could not be turned into an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum LineFault {
    /// Fewer fields than the format requires. Always skipped.
    TooFewFields { expected: usize, found: usize },
    /// A vehicle TYPE this build does not know. Always skipped.
    UnknownType(String),
    /// A field failed to parse. Handling depends on the malformed-line policy.
    Invalid(String),
}

impl fmt::Display for LineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineFault::TooFewFields { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            LineFault::UnknownType(tag) => write!(f, "unknown vehicle type '{}'", tag),
            LineFault::Invalid(reason) => f.write_str(reason),
        }
    }
}

/// A record line before its plate and customer id are resolved against the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub kind: RecordType,
    pub plate: String,
    pub customer_id: i32,
    pub date: NaiveDate,
    pub amount: f64,
}

const ESCAPES: [(char, &str); 4] = [('%', "%25"), (',', "%2C"), ('\r', "%0D"), ('\n', "%0A")];

fn escape_text(raw: &str) -> Cow<'_, str> {
    if !raw.contains(|c: char| ESCAPES.iter().any(|(plain, _)| *plain == c)) {
        return Cow::Borrowed(raw);
    }
    let mut escaped = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match ESCAPES.iter().find(|(plain, _)| *plain == c) {
            Some((_, code)) => escaped.push_str(code),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn unescape_text(field: &str) -> Cow<'_, str> {
    if !field.contains('%') {
        return Cow::Borrowed(field);
    }
    let mut plain = String::with_capacity(field.len());
    let mut rest = field;
    while let Some(pos) = rest.find('%') {
        plain.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = ESCAPES
            .iter()
            .find(|(_, code)| rest.get(..3).is_some_and(|head| head.eq_ignore_ascii_case(code)));
        match decoded {
            Some((c, _)) => {
                plain.push(*c);
                rest = &rest[3..];
            }
            None => {
                plain.push('%');
                rest = &rest[1..];
            }
        }
    }
    plain.push_str(rest);
    Cow::Owned(plain)
}

fn encode_optional_text(value: Option<&str>) -> Cow<'_, str> {
    value.map_or(Cow::Borrowed(NULL), escape_text)
}

/// `null` marks an unset make or model; it never collides with a real
/// value because those are stored capitalized.
fn decode_optional_text(field: &str) -> Cow<'_, str> {
    if field == NULL {
        Cow::Borrowed("")
    } else {
        unescape_text(field)
    }
}

pub fn encode_vehicle(vehicle: &Vehicle) -> String {
    let extra = match vehicle.kind() {
        VehicleKind::Car { seats } => seats.to_string(),
        VehicleKind::Minibus { accessible } => accessible.to_string(),
        VehicleKind::PickupTruck {
            cargo_capacity,
            has_trailer,
        } => format!("{};{}", cargo_capacity, has_trailer),
    };

    format!(
        "{},{},{},{},{},{},{}",
        vehicle.kind().type_tag(),
        vehicle.license_plate().unwrap_or(NULL),
        encode_optional_text(vehicle.make()),
        encode_optional_text(vehicle.model()),
        vehicle.year(),
        extra,
        vehicle.status()
    )
}

pub fn encode_customer(customer: &Customer) -> String {
    format!("{},{}", customer.id(), escape_text(customer.name()))
}

pub fn encode_record(
    kind: &RecordType,
    plate: &str,
    customer_id: i32,
    date: NaiveDate,
    amount: f64,
) -> String {
    format!(
        "{},{},{},{},{}",
        kind,
        plate,
        customer_id,
        date.format("%Y-%m-%d"),
        amount
    )
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, LineFault> {
    raw.parse::<T>()
        .map_err(|_| LineFault::Invalid(format!("bad {} '{}'", name, raw)))
}

fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, LineFault> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < expected {
        return Err(LineFault::TooFewFields {
            expected,
            found: parts.len(),
        });
    }
    Ok(parts)
}

pub fn decode_vehicle(line: &str) -> Result<Vehicle, LineFault> {
    let parts = split_fields(line, VEHICLE_FIELDS)?;
    let (tag, plate, make, model, extra, status) =
        (parts[0], parts[1], parts[2], parts[3], parts[5], parts[6]);
    let year: i32 = parse_field("year", parts[4])?;

    let kind = match tag {
        "CAR" => VehicleKind::Car {
            seats: parse_field("seat count", extra)?,
        },
        "MINIBUS" => VehicleKind::Minibus {
            accessible: parse_flag(extra),
        },
        "PICKUP" => {
            let (cargo, trailer) = extra
                .split_once(';')
                .ok_or_else(|| LineFault::Invalid(format!("bad pickup extra '{}'", extra)))?;
            VehicleKind::PickupTruck {
                cargo_capacity: parse_field("cargo capacity", cargo)?,
                has_trailer: parse_flag(trailer),
            }
        }
        other => return Err(LineFault::UnknownType(other.to_string())),
    };

    let status: VehicleStatus = status.parse().map_err(LineFault::Invalid)?;

    let mut vehicle = Vehicle::new(
        &decode_optional_text(make),
        &decode_optional_text(model),
        year,
        kind,
    );
    vehicle
        .set_license_plate(plate)
        .map_err(|e| LineFault::Invalid(e.to_string()))?;
    vehicle.set_status(status);
    Ok(vehicle)
}

pub fn decode_customer(line: &str) -> Result<Customer, LineFault> {
    // Split once so unescaped commas in names written by other tools survive.
    let (id, name) = line.split_once(',').ok_or(LineFault::TooFewFields {
        expected: CUSTOMER_FIELDS,
        found: 1,
    })?;
    let id: i32 = parse_field("customer id", id)?;
    Ok(Customer::new(id, unescape_text(name)))
}

pub fn decode_record(line: &str) -> Result<RawRecord, LineFault> {
    let parts = split_fields(line, RECORD_FIELDS)?;
    let kind = match parts[0].parse::<RecordType>() {
        Ok(kind) => kind,
        Err(never) => match never {},
    };
    let customer_id: i32 = parse_field("customer id", parts[2])?;
    let date = NaiveDate::parse_from_str(parts[3], "%Y-%m-%d")
        .map_err(|_| LineFault::Invalid(format!("bad date '{}'", parts[3])))?;
    let amount: f64 = parse_field("amount", parts[4])?;

    Ok(RawRecord {
        kind,
        plate: parts[1].to_string(),
        customer_id,
        date,
        amount,
    })
}
