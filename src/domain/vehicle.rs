use crate::utils::error::{RentalError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn plate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9]{2,8}$").expect("plate pattern is valid"))
}

/// True iff the trimmed plate is 2 to 8 ASCII letters or digits.
pub fn is_valid_plate(plate: &str) -> bool {
    plate_pattern().is_match(plate.trim())
}

/// Trims, lowercases, then uppercases the first character.
/// Empty input maps to `None`.
pub fn capitalize(s: &str) -> Option<String> {
    let lowered = s.trim().to_lowercase();
    let mut chars = lowered.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    Available,
    Held,
    Rented,
    UnderMaintenance,
    OutOfService,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 5] = [
        VehicleStatus::Available,
        VehicleStatus::Held,
        VehicleStatus::Rented,
        VehicleStatus::UnderMaintenance,
        VehicleStatus::OutOfService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::Held => "Held",
            VehicleStatus::Rented => "Rented",
            VehicleStatus::UnderMaintenance => "UnderMaintenance",
            VehicleStatus::OutOfService => "OutOfService",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        VehicleStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown vehicle status '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VehicleKind {
    Car { seats: i32 },
    Minibus { accessible: bool },
    PickupTruck { cargo_capacity: f64, has_trailer: bool },
}

impl VehicleKind {
    /// Tag written as the first field of a vehicle line.
    pub fn type_tag(&self) -> &'static str {
        match self {
            VehicleKind::Car { .. } => "CAR",
            VehicleKind::Minibus { .. } => "MINIBUS",
            VehicleKind::PickupTruck { .. } => "PICKUP",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleKind::Car { .. } => "Car",
            VehicleKind::Minibus { .. } => "Minibus",
            VehicleKind::PickupTruck { .. } => "Pickup Truck",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    plate: Option<String>,
    make: Option<String>,
    model: Option<String>,
    year: i32,
    status: VehicleStatus,
    kind: VehicleKind,
}

impl Vehicle {
    pub fn new(make: &str, model: &str, year: i32, kind: VehicleKind) -> Self {
        Self {
            plate: None,
            make: capitalize(make),
            model: capitalize(model),
            year,
            status: VehicleStatus::Available,
            kind,
        }
    }

    pub fn car(make: &str, model: &str, year: i32, seats: i32) -> Self {
        Self::new(make, model, year, VehicleKind::Car { seats })
    }

    pub fn minibus(make: &str, model: &str, year: i32, accessible: bool) -> Self {
        Self::new(make, model, year, VehicleKind::Minibus { accessible })
    }

    pub fn pickup_truck(
        make: &str,
        model: &str,
        year: i32,
        cargo_capacity: f64,
        has_trailer: bool,
    ) -> Self {
        Self::new(
            make,
            model,
            year,
            VehicleKind::PickupTruck {
                cargo_capacity,
                has_trailer,
            },
        )
    }

    /// Builder-style plate assignment for call sites that construct and
    /// register a vehicle in one expression.
    pub fn with_plate(mut self, plate: &str) -> Result<Self> {
        self.set_license_plate(plate)?;
        Ok(self)
    }

    pub fn set_license_plate(&mut self, plate: &str) -> Result<()> {
        if !is_valid_plate(plate) {
            return Err(RentalError::InvalidPlate {
                plate: plate.to_string(),
            });
        }
        self.plate = Some(plate.trim().to_uppercase());
        Ok(())
    }

    pub fn license_plate(&self) -> Option<&str> {
        self.plate.as_deref()
    }

    pub fn make(&self) -> Option<&str> {
        self.make.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn kind(&self) -> &VehicleKind {
        &self.kind
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    /// Unconditional; rent/return legality is checked by the store.
    pub fn set_status(&mut self, status: VehicleStatus) {
        self.status = status;
    }

    pub(crate) fn plate_matches(&self, plate: &str) -> bool {
        self.plate
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(plate))
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {} | {} | {} | {} | {} |",
            self.plate.as_deref().unwrap_or("null"),
            self.make.as_deref().unwrap_or("null"),
            self.model.as_deref().unwrap_or("null"),
            self.year,
            self.status
        )
    }
}
