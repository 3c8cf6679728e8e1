//! Searchable paginated table view.
//!
//! [`TableView`] holds only UI state (search term, current page). It is a pure
//! view over whatever record slice it is handed: it never stores, fetches or
//! mutates records. Row actions are dispatched to a [`RowActions`] handler
//! owned by the page, and deletes go out only with an identity resolved from
//! the configured id field.

use crate::entity::{Column, IdField};
use crate::error::TableError;
use crate::pagination;
use crate::record::{FieldValue, Record, RecordId};
use std::ops::RangeInclusive;

/// Anything the table can render and search.
pub trait TableRow {
    /// Value of `name`, or [`FieldValue::Empty`] when absent.
    fn field(&self, name: &str) -> FieldValue;
}

impl TableRow for Record {
    fn field(&self, name: &str) -> FieldValue {
        self.get(name)
    }
}

/// Page-side handlers for row actions.
pub trait RowActions<R: ?Sized> {
    fn on_edit(&mut self, row: &R);
    fn on_delete(&mut self, id: RecordId);
}

/// Field order the browser console used to guess a row key.
///
/// Only suitable for display keys. Identity for mutations always comes from
/// the entity's own id field.
pub const LEGACY_KEY_PROBE: [&str; 6] = ["sid", "timeid", "cid", "fid", "pid", "rid"];

/// First non-empty value among [`LEGACY_KEY_PROBE`].
pub fn probe_legacy_key<R: TableRow + ?Sized>(row: &R) -> Option<String> {
    LEGACY_KEY_PROBE
        .iter()
        .map(|name| row.field(name))
        .find(|value| !value.is_empty())
        .map(|value| value.normalized())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    columns: Vec<Column>,
    search_fields: Vec<&'static str>,
    id_field: IdField,
    items_per_page: usize,
    search_term: String,
    current_page: usize,
}

impl TableView {
    /// Fresh view state: empty search, page 1. Search fields default to the columns.
    pub fn new(
        columns: impl Into<Vec<Column>>,
        id_field: IdField,
        items_per_page: usize,
    ) -> Result<Self, TableError> {
        let columns = columns.into();
        if columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        if items_per_page == 0 {
            return Err(TableError::ZeroPageSize);
        }
        let search_fields = columns.iter().map(|c| c.field).collect();
        Ok(Self {
            columns,
            search_fields,
            id_field,
            items_per_page,
            search_term: String::new(),
            current_page: 1,
        })
    }

    /// Search a different field set than the rendered columns. An empty set keeps the columns.
    pub fn with_search_fields(mut self, fields: &[&'static str]) -> Self {
        if !fields.is_empty() {
            self.search_fields = fields.to_vec();
        }
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn id_field(&self) -> IdField {
        self.id_field
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Replace the search term. A changed term moves back to page 1.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search_term {
            return false;
        }
        self.search_term = term;
        self.current_page = 1;
        true
    }

    /// Rows where any search field contains the term, case-insensitively.
    pub fn filter<'a, R: TableRow>(&self, records: &'a [R]) -> Vec<&'a R> {
        let needle = self.search_term.to_lowercase();
        if needle.is_empty() {
            return records.iter().collect();
        }
        records
            .iter()
            .filter(|row| {
                self.search_fields
                    .iter()
                    .any(|field| row.field(field).contains_folded(&needle))
            })
            .collect()
    }

    pub fn filtered_len<R: TableRow>(&self, records: &[R]) -> usize {
        self.filter(records).len()
    }

    pub fn total_pages<R: TableRow>(&self, records: &[R]) -> usize {
        pagination::total_pages(self.filtered_len(records), self.items_per_page)
    }

    /// Rows visible on the current page.
    pub fn page_slice<'a, R: TableRow>(&self, records: &'a [R]) -> Vec<&'a R> {
        let filtered = self.filter(records);
        let range = pagination::page_range(filtered.len(), self.current_page, self.items_per_page);
        filtered[range].to_vec()
    }

    /// Zero-based position of the first visible row, for serial numbering.
    pub fn first_item_index(&self) -> usize {
        pagination::first_item_index(self.current_page, self.items_per_page)
    }

    /// Page numbers to offer as controls. Empty when there are no pages.
    pub fn page_numbers<R: TableRow>(&self, records: &[R]) -> RangeInclusive<usize> {
        1..=self.total_pages(records)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next<R: TableRow>(&self, records: &[R]) -> bool {
        self.current_page < self.total_pages(records)
    }

    /// Jump to page `page`, clamped into the available range.
    pub fn paginate<R: TableRow>(&mut self, page: usize, records: &[R]) -> usize {
        self.current_page = pagination::clamp_page(page, self.total_pages(records));
        self.current_page
    }

    pub fn next_page<R: TableRow>(&mut self, records: &[R]) -> usize {
        self.paginate(self.current_page.saturating_add(1), records)
    }

    pub fn previous_page(&mut self) -> usize {
        self.current_page = self.current_page.saturating_sub(1).max(1);
        self.current_page
    }

    /// Pull the current page back into range after the record list shrank.
    pub fn clamp<R: TableRow>(&mut self, records: &[R]) -> usize {
        self.paginate(self.current_page, records)
    }

    /// Identity of `row` under the configured id field.
    pub fn resolve_identity<R: TableRow + ?Sized>(&self, row: &R) -> Result<RecordId, TableError> {
        RecordId::from_value(self.id_field, &row.field(self.id_field.name())).ok_or(
            TableError::Unidentifiable {
                id_field: self.id_field.name(),
            },
        )
    }

    /// Stable display key: the identity when present, else the column values plus position.
    pub fn row_key<R: TableRow + ?Sized>(&self, row: &R, index: usize) -> String {
        match self.resolve_identity(row) {
            Ok(id) => id.value().to_string(),
            Err(_) => {
                let mut parts: Vec<String> =
                    self.columns.iter().map(|c| row.field(c.field).to_string()).collect();
                parts.push(index.to_string());
                parts.join("-")
            }
        }
    }

    pub fn request_edit<R, H>(&self, row: &R, handler: &mut H)
    where
        R: TableRow + ?Sized,
        H: RowActions<R> + ?Sized,
    {
        handler.on_edit(row);
    }

    /// Dispatch a delete. Unidentifiable rows never reach the handler.
    pub fn request_delete<R, H>(&self, row: &R, handler: &mut H) -> Result<RecordId, TableError>
    where
        R: TableRow + ?Sized,
        H: RowActions<R> + ?Sized,
    {
        let id = self.resolve_identity(row)?;
        handler.on_delete(id.clone());
        Ok(id)
    }
}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_rows() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(
            (prop::option::of("[A-Za-z ]{0,12}"), prop::option::of("[a-z0-9]{0,6}"), 0i64..1000),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(name, alias, id)| {
                    let mut record = Record::new().with("cid", id);
                    if let Some(name) = name {
                        record.set("name", name);
                    }
                    if let Some(alias) = alias {
                        record.set("alias", alias);
                    }
                    record
                })
                .collect()
        })
    }

    fn table(per_page: usize) -> TableView {
        TableView::new(
            vec![Column::new("name", "Name"), Column::new("alias", "Short Name")],
            IdField::new("cid"),
            per_page,
        )
        .unwrap()
    }

    fn matches(row: &Record, term: &str) -> bool {
        let needle = term.to_lowercase();
        ["name", "alias"]
            .iter()
            .any(|f| row.get(f).contains_folded(&needle))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// An empty term keeps every row in order.
        #[test]
        fn prop_empty_search_is_identity(rows in arb_rows()) {
            let view = table(6);
            let filtered: Vec<Record> = view.filter(&rows).into_iter().cloned().collect();
            prop_assert_eq!(filtered, rows);
        }

        /// The filter is sound and complete for the case-insensitive substring predicate.
        #[test]
        fn prop_filter_sound_and_complete(rows in arb_rows(), term in "[A-Za-z]{0,3}") {
            let mut view = table(6);
            view.set_search_term(term.clone());
            let filtered = view.filter(&rows);
            for row in &filtered {
                prop_assert!(matches(row, &term));
            }
            let expected = rows.iter().filter(|r| matches(r, &term)).count();
            prop_assert_eq!(filtered.len(), expected);
        }

        /// Page count follows the filtered length; slices never exceed a page.
        #[test]
        fn prop_pages_follow_filtered_len(
            rows in arb_rows(),
            term in "[a-z]{0,2}",
            per_page in 1usize..10,
            page in 1usize..12,
        ) {
            let mut view = table(per_page);
            view.set_search_term(term);
            let filtered = view.filtered_len(&rows);
            prop_assert_eq!(view.total_pages(&rows), filtered.div_ceil(per_page));

            let landed = view.paginate(page, &rows);
            prop_assert!(landed >= 1);
            prop_assert!(landed <= view.total_pages(&rows).max(1));
            let slice = view.page_slice(&rows);
            let skipped = (landed - 1) * per_page;
            let expected = if skipped >= filtered { 0 } else { per_page.min(filtered - skipped) };
            prop_assert_eq!(slice.len(), expected);
        }

        /// Deletes always carry the configured field's value.
        #[test]
        fn prop_delete_identity_from_id_field(id in 1i64..100_000, other in 1i64..100_000) {
            let row = Record::new().with("cid", id).with("sid", other);
            let view = table(6);
            let resolved = view.resolve_identity(&row).unwrap();
            prop_assert_eq!(resolved.value(), id.to_string());
        }
    }
}
