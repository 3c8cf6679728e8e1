//! Page-owned record list, patched locally after successful mutations.

use crate::entity::IdField;
use crate::record::{Record, RecordId};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore {
    id_field: IdField,
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new(id_field: IdField) -> Self {
        Self {
            id_field,
            records: Vec::new(),
        }
    }

    pub fn id_field(&self) -> IdField {
        self.id_field
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| id.matches(record))
    }

    /// Append a created record.
    ///
    /// The server's copy is preferred when it carries an id; otherwise the
    /// submitted form is stored under `provisional_id`.
    pub fn apply_created(
        &mut self,
        submitted: Record,
        returned: Option<Record>,
        provisional_id: i64,
    ) -> RecordId {
        let id_field = self.id_field;
        let (record, id) = match returned.and_then(|r| r.id(id_field).map(|id| (r, id))) {
            Some(pair) => pair,
            None => {
                let record = submitted.with(id_field.name(), provisional_id);
                (record, RecordId::from_integer(id_field, provisional_id))
            }
        };
        self.records.push(record);
        id
    }

    /// Replace the record with `id` by `updated`. Returns false when absent.
    pub fn apply_updated(&mut self, id: &RecordId, updated: Record) -> bool {
        match self.records.iter_mut().find(|record| id.matches(record)) {
            Some(slot) => {
                let mut updated = updated;
                if updated.id(self.id_field).is_none() {
                    updated.set(self.id_field.name(), id.to_json());
                }
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Drop every record with `id`. Returns how many were removed.
    pub fn remove(&mut self, id: &RecordId) -> usize {
        let before = self.records.len();
        self.records.retain(|record| !id.matches(record));
        before - self.records.len()
    }
}
