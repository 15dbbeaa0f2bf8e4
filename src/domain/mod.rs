// Domain layer: entity model and ports (interfaces). Depends only on std, serde, chrono and regex.

pub mod customer;
pub mod ports;
pub mod record;
pub mod vehicle;

pub use customer::Customer;
pub use ports::{ConfigProvider, LineStorage, MalformedLinePolicy};
pub use record::{CustomerRef, RecordType, RentalRecord, VehicleRef};
pub use vehicle::{capitalize, is_valid_plate, Vehicle, VehicleKind, VehicleStatus};
