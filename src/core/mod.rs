pub mod codec;
pub mod history;
pub mod store;

pub use crate::domain::ports::{ConfigProvider, LineStorage, MalformedLinePolicy};
pub use crate::utils::error::Result;
pub use history::RentalHistory;
pub use store::{FileLoadStats, LoadSummary, RecordView, RentalStore};
