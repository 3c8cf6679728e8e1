//! Display enrichment: join foreign keys against loaded reference lists.

use crate::entity::{EntityKind, EntitySchema, LABEL_FIELD};
use crate::record::{Record, RecordId};
use std::collections::BTreeMap;

/// Reference lists loaded for a page, keyed by entity kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    lists: BTreeMap<EntityKind, Vec<Record>>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: EntityKind, records: Vec<Record>) {
        self.lists.insert(kind, records);
    }

    pub fn with(mut self, kind: EntityKind, records: Vec<Record>) -> Self {
        self.insert(kind, records);
        self
    }

    /// The loaded list, or `None` when it never arrived.
    pub fn get(&self, kind: EntityKind) -> Option<&[Record]> {
        self.lists.get(&kind).map(Vec::as_slice)
    }

    pub fn is_loaded(&self, kind: EntityKind) -> bool {
        self.lists.contains_key(&kind)
    }

    /// Record of `kind` whose id field equals `key`.
    pub fn lookup(&self, kind: EntityKind, key: &str) -> Option<&Record> {
        let id = RecordId::new(kind.id_field(), key)?;
        self.get(kind)?.iter().find(|record| id.matches(record))
    }

    /// Display name of the referenced record.
    pub fn label(&self, kind: EntityKind, key: &str) -> Option<String> {
        self.lookup(kind, key)
            .map(|record| record.text(LABEL_FIELD))
            .filter(|label| !label.trim().is_empty())
    }

    /// `(id, label)` choices for a selector, in list order.
    pub fn options(&self, kind: EntityKind) -> Vec<(String, String)> {
        let id_field = kind.id_field();
        self.get(kind)
            .unwrap_or_default()
            .iter()
            .filter_map(|record| {
                let id = record.id(id_field)?;
                Some((id.value().to_string(), record.text(LABEL_FIELD)))
            })
            .collect()
    }
}

/// Copy of `records` with every join's display field filled in.
///
/// Misses, including lists that failed to load, render the join's unknown label.
pub fn enrich(records: &[Record], schema: &EntitySchema, refs: &ReferenceSet) -> Vec<Record> {
    records
        .iter()
        .map(|record| enrich_one(record, schema, refs))
        .collect()
}

pub fn enrich_one(record: &Record, schema: &EntitySchema, refs: &ReferenceSet) -> Record {
    let mut enriched = record.clone();
    for join in schema.joins {
        let key = record.get(join.foreign_key).normalized();
        let label = refs
            .label(join.reference, &key)
            .unwrap_or_else(|| join.unknown_label.to_string());
        enriched.set(join.display_field, label);
    }
    enriched
}
