use crate::domain::RentalRecord;

/// Append-only ledger of rent/return transactions in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct RentalHistory {
    records: Vec<RentalRecord>,
}

impl RentalHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: RentalRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RentalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RentalHistory {
    type Item = &'a RentalRecord;
    type IntoIter = std::slice::Iter<'a, RentalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
