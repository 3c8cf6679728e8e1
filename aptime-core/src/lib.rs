//! APTIME Core - records, entity catalogue and table view logic
//!
//! Everything in this crate is free of terminal and network concerns. The
//! console crate renders what lives here and the remote collaborator feeds it.

pub mod auth;
pub mod enrich;
pub mod entity;
pub mod error;
pub mod pagination;
pub mod record;
pub mod remote;
pub mod store;
pub mod table;
pub mod timetable;
pub mod validation;

pub use auth::{hash_password, AuthContext, Identity, LoginForm, PasswordChange};
pub use enrich::{enrich, enrich_one, ReferenceSet};
pub use entity::{
    Column, DuplicateRule, EntityKind, EntitySchema, FieldRule, FormField, IdField, Join, Rule,
    LABEL_FIELD,
};
pub use error::{AuthError, CredentialErrors, FormErrors, GridError, RemoteError, TableError};
pub use record::{FieldValue, Record, RecordId};
pub use remote::{Envelope, RemoteData, RemoteResult};
pub use store::RecordStore;
pub use table::{probe_legacy_key, RowActions, TableRow, TableView, LEGACY_KEY_PROBE};
pub use timetable::{
    format_clock, generate_time_slots, parse_time, SlotAssignment, TimeSlot, TimetableGrid,
    TimetableSummary, NO_FACULTY, TEACHING_DAYS,
};
pub use validation::validate_form;
