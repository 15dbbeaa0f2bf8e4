use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Index of a vehicle inside the store that registered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleRef(pub(crate) usize);

/// Index of a customer inside the store that registered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomerRef(pub(crate) usize);

/// Free-form transaction tag. The store only ever writes `RENT` and `RETURN`;
/// anything else read back from disk is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordType {
    Rent,
    Return,
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Rent => "RENT",
            RecordType::Return => "RETURN",
            RecordType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "RENT" => RecordType::Rent,
            "RETURN" => RecordType::Return,
            other => RecordType::Other(other.to_string()),
        })
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RentalRecord {
    vehicle: VehicleRef,
    customer: CustomerRef,
    date: NaiveDate,
    amount: f64,
    kind: RecordType,
}

impl RentalRecord {
    pub fn new(
        vehicle: VehicleRef,
        customer: CustomerRef,
        date: NaiveDate,
        amount: f64,
        kind: RecordType,
    ) -> Self {
        Self {
            vehicle,
            customer,
            date,
            amount,
            kind,
        }
    }

    pub fn vehicle(&self) -> VehicleRef {
        self.vehicle
    }

    pub fn customer(&self) -> CustomerRef {
        self.customer
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn kind(&self) -> &RecordType {
        &self.kind
    }
}
