use crate::core::codec::{self, LineFault};
use crate::core::history::RentalHistory;
use crate::domain::{
    ConfigProvider, Customer, CustomerRef, LineStorage, MalformedLinePolicy, RecordType,
    RentalRecord, Vehicle, VehicleRef, VehicleStatus,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Outcome of loading one data file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileLoadStats {
    pub loaded: usize,
    pub skipped: usize,
    /// The file did not exist.
    pub missing: bool,
    /// Reading stopped before the end of the file.
    pub aborted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub vehicles: FileLoadStats,
    pub customers: FileLoadStats,
    pub records: FileLoadStats,
}

/// A ledger entry together with the vehicle and customer it refers to.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    pub record: &'a RentalRecord,
    pub vehicle: &'a Vehicle,
    pub customer: &'a Customer,
}

#[derive(Debug, Clone, Copy)]
enum Transition {
    Rent,
    Return,
}

impl Transition {
    fn from(self) -> VehicleStatus {
        match self {
            Transition::Rent => VehicleStatus::Available,
            Transition::Return => VehicleStatus::Rented,
        }
    }

    fn to(self) -> VehicleStatus {
        match self {
            Transition::Rent => VehicleStatus::Rented,
            Transition::Return => VehicleStatus::Available,
        }
    }

    fn record_type(self) -> RecordType {
        match self {
            Transition::Rent => RecordType::Rent,
            Transition::Return => RecordType::Return,
        }
    }

    fn of_record(kind: &RecordType) -> Option<Self> {
        match kind {
            RecordType::Rent => Some(Transition::Rent),
            RecordType::Return => Some(Transition::Return),
            RecordType::Other(_) => None,
        }
    }
}

/// Owns vehicles, customers and the rental ledger, and mirrors every
/// mutation to three append-only line files.
///
/// Lookups are linear scans. Plates and customer ids are not checked for
/// uniqueness; the first match wins.
pub struct RentalStore<S: LineStorage, C: ConfigProvider> {
    storage: S,
    config: C,
    vehicles: Vec<Vehicle>,
    customers: Vec<Customer>,
    history: RentalHistory,
}

impl<S: LineStorage, C: ConfigProvider> RentalStore<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            vehicles: Vec::new(),
            customers: Vec::new(),
            history: RentalHistory::new(),
        }
    }

    /// Registers a vehicle and appends it to the vehicle file.
    ///
    /// A vehicle without a plate cannot be looked up or persisted
    /// meaningfully, so it is rejected without touching any state.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Option<VehicleRef> {
        if vehicle.license_plate().is_none() {
            tracing::warn!("Refusing to add a vehicle without a license plate");
            return None;
        }

        let line = codec::encode_vehicle(&vehicle);
        self.vehicles.push(vehicle);
        self.persist(self.config.vehicle_file(), &line, "vehicle");
        Some(VehicleRef(self.vehicles.len() - 1))
    }

    pub fn add_customer(&mut self, customer: Customer) -> CustomerRef {
        let line = codec::encode_customer(&customer);
        self.customers.push(customer);
        self.persist(self.config.customer_file(), &line, "customer");
        CustomerRef(self.customers.len() - 1)
    }

    /// Available -> Rented. Returns false and changes nothing otherwise.
    pub fn rent_vehicle(
        &mut self,
        vehicle: VehicleRef,
        customer: CustomerRef,
        date: NaiveDate,
        amount: f64,
    ) -> bool {
        self.apply(Transition::Rent, vehicle, customer, date, amount)
    }

    /// Rented -> Available. Returns false and changes nothing otherwise.
    pub fn return_vehicle(
        &mut self,
        vehicle: VehicleRef,
        customer: CustomerRef,
        date: NaiveDate,
        extra_fees: f64,
    ) -> bool {
        self.apply(Transition::Return, vehicle, customer, date, extra_fees)
    }

    fn apply(
        &mut self,
        transition: Transition,
        vehicle_ref: VehicleRef,
        customer_ref: CustomerRef,
        date: NaiveDate,
        amount: f64,
    ) -> bool {
        let Some(customer) = self.customers.get(customer_ref.0) else {
            tracing::warn!("Unknown customer handle {:?}", customer_ref);
            return false;
        };
        let Some(vehicle) = self.vehicles.get_mut(vehicle_ref.0) else {
            tracing::warn!("Unknown vehicle handle {:?}", vehicle_ref);
            return false;
        };

        if vehicle.status() != transition.from() {
            match transition {
                Transition::Rent => tracing::info!(
                    "Vehicle {} is not available for renting ({})",
                    vehicle.license_plate().unwrap_or_default(),
                    vehicle.status()
                ),
                Transition::Return => tracing::info!(
                    "Vehicle {} is not rented ({})",
                    vehicle.license_plate().unwrap_or_default(),
                    vehicle.status()
                ),
            }
            return false;
        }

        vehicle.set_status(transition.to());
        let kind = transition.record_type();
        let line = codec::encode_record(
            &kind,
            vehicle.license_plate().unwrap_or_default(),
            customer.id(),
            date,
            amount,
        );
        match transition {
            Transition::Rent => tracing::info!(
                "Vehicle {} rented to {}",
                vehicle.license_plate().unwrap_or_default(),
                customer.name()
            ),
            Transition::Return => tracing::info!(
                "Vehicle {} returned by {}",
                vehicle.license_plate().unwrap_or_default(),
                customer.name()
            ),
        }

        self.history.add_record(RentalRecord::new(
            vehicle_ref,
            customer_ref,
            date,
            amount,
            kind,
        ));
        self.persist(self.config.record_file(), &line, "record");
        true
    }

    /// Write failures are logged and leave the in-memory mutation in place.
    fn persist(&self, file: &str, line: &str, what: &str) {
        if let Err(e) = self.storage.append_line(file, line) {
            tracing::error!("Error saving {} to {}: {}", what, file, e);
        }
    }

    pub fn find_vehicle_by_plate(&self, plate: &str) -> Option<VehicleRef> {
        let plate = plate.trim();
        self.vehicles
            .iter()
            .position(|v| v.plate_matches(plate))
            .map(VehicleRef)
    }

    pub fn find_customer_by_id(&self, id: i32) -> Option<CustomerRef> {
        self.customers
            .iter()
            .position(|c| c.id() == id)
            .map(CustomerRef)
    }

    pub fn vehicle(&self, vehicle: VehicleRef) -> Option<&Vehicle> {
        self.vehicles.get(vehicle.0)
    }

    pub fn customer(&self, customer: CustomerRef) -> Option<&Customer> {
        self.customers.get(customer.0)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Vehicles in registration order, optionally restricted to one status.
    pub fn vehicles_with_status(
        &self,
        status: Option<VehicleStatus>,
    ) -> impl Iterator<Item = &Vehicle> + '_ {
        self.vehicles
            .iter()
            .filter(move |v| status.map_or(true, |s| v.status() == s))
    }

    pub fn rental_history(&self) -> &RentalHistory {
        &self.history
    }

    /// Every ledger entry in transaction order. Each call starts over.
    pub fn history(&self) -> impl Iterator<Item = RecordView<'_>> + '_ {
        self.history.iter().filter_map(move |record| {
            Some(RecordView {
                record,
                vehicle: self.vehicles.get(record.vehicle().0)?,
                customer: self.customers.get(record.customer().0)?,
            })
        })
    }

    /// Replaces the in-memory state with the contents of the three files.
    ///
    /// Vehicles and customers are loaded before records because records are
    /// resolved against them. A missing file loads as empty.
    ///
    /// The vehicle file holds each vehicle's status at registration, so the
    /// ledger is replayed in order afterwards: RENT moves Available to Rented
    /// and RETURN moves Rented to Available. Any other status is left as
    /// loaded.
    pub fn load_data(&mut self) -> LoadSummary {
        self.vehicles.clear();
        self.customers.clear();
        self.history = RentalHistory::new();

        let (vehicles, vehicle_stats) =
            self.read_entries(self.config.vehicle_file(), codec::decode_vehicle);
        self.vehicles = vehicles;

        let (customers, customer_stats) =
            self.read_entries(self.config.customer_file(), codec::decode_customer);
        self.customers = customers;

        let (raw_records, mut record_stats) =
            self.read_entries(self.config.record_file(), codec::decode_record);
        for raw in raw_records {
            let vehicle = self.find_vehicle_by_plate(&raw.plate);
            let customer = self.find_customer_by_id(raw.customer_id);
            match (vehicle, customer) {
                (Some(vehicle), Some(customer)) => {
                    self.replay(vehicle, &raw.kind);
                    self.history.add_record(RentalRecord::new(
                        vehicle,
                        customer,
                        raw.date,
                        raw.amount,
                        raw.kind,
                    ));
                }
                _ => {
                    tracing::debug!(
                        "Dropping {} record for {} / customer {}: unresolved reference",
                        raw.kind,
                        raw.plate,
                        raw.customer_id
                    );
                    record_stats.loaded -= 1;
                    record_stats.skipped += 1;
                }
            }
        }

        let summary = LoadSummary {
            vehicles: vehicle_stats,
            customers: customer_stats,
            records: record_stats,
        };
        tracing::info!(
            "Loaded {} vehicles, {} customers, {} records",
            summary.vehicles.loaded,
            summary.customers.loaded,
            summary.records.loaded
        );
        summary
    }

    fn replay(&mut self, vehicle_ref: VehicleRef, kind: &RecordType) {
        let Some(transition) = Transition::of_record(kind) else {
            return;
        };
        if let Some(vehicle) = self.vehicles.get_mut(vehicle_ref.0) {
            if vehicle.status() == transition.from() {
                vehicle.set_status(transition.to());
            } else {
                tracing::debug!(
                    "{} record for {} does not apply to a {} vehicle",
                    kind,
                    vehicle.license_plate().unwrap_or_default(),
                    vehicle.status()
                );
            }
        }
    }

    fn read_entries<T>(
        &self,
        file: &str,
        decode: impl Fn(&str) -> Result<T, LineFault>,
    ) -> (Vec<T>, FileLoadStats) {
        let mut stats = FileLoadStats::default();
        let mut entries = Vec::new();

        let lines = match self.storage.read_lines(file) {
            Ok(Some(lines)) => lines,
            Ok(None) => {
                tracing::debug!("{} does not exist, nothing to load", file);
                stats.missing = true;
                return (entries, stats);
            }
            Err(e) => {
                tracing::error!("Error loading {}: {}", file, e);
                stats.aborted = true;
                return (entries, stats);
            }
        };

        let policy = self.config.malformed_policy();
        for (index, line) in lines.iter().enumerate() {
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            match decode(line) {
                Ok(entry) => {
                    entries.push(entry);
                    stats.loaded += 1;
                }
                Err(fault @ LineFault::Invalid(_)) if policy == MalformedLinePolicy::AbortFile => {
                    tracing::warn!(
                        "{}:{}: {}; ignoring the rest of the file",
                        file,
                        line_no,
                        fault
                    );
                    stats.skipped += 1;
                    stats.aborted = true;
                    break;
                }
                Err(fault) => {
                    tracing::warn!("{}:{}: {}; line skipped", file, line_no, fault);
                    stats.skipped += 1;
                }
            }
        }

        (entries, stats)
    }
}
