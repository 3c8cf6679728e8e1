//! Error types for APTIME operations

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Table construction and row dispatch errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Table needs at least one column")]
    NoColumns,

    #[error("Items per page must be greater than zero")]
    ZeroPageSize,

    #[error("Cannot identify record: field '{id_field}' is missing or empty")]
    Unidentifiable { id_field: &'static str },
}

/// Per-field validation messages collected from an entry form.
#[derive(Debug, Clone, Default, Error, PartialEq, Eq)]
#[error("{}", render_form_errors(.0))]
pub struct FormErrors(BTreeMap<&'static str, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a message unless the field already has one.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Record a message, replacing any earlier one for the field.
    pub fn replace(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

fn render_form_errors(errors: &BTreeMap<&'static str, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Login and password-change validation messages, in display order.
#[derive(Debug, Clone, Default, Error, PartialEq, Eq)]
pub struct CredentialErrors(pub Vec<String>);

impl fmt::Display for CredentialErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl CredentialErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// Failures of the remote data collaborator.
///
/// Transport-level problems and application-level rejections are kept apart
/// so the console can word its notifications differently.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("No response from server: {0}")]
    Transport(String),

    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("{message}")]
    Rejected { message: String },
}

impl RemoteError {
    /// True for failures where the request may never have been processed.
    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteError::Transport(_) | RemoteError::Status { .. })
    }
}

/// Authorization failures raised by the session context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Role '{actual}' is not allowed here (requires '{required}')")]
    RoleMismatch { required: String, actual: String },

    #[error("Login response did not contain a user identity")]
    MissingIdentity,
}

/// Timetable grid errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Cell out of range: day {day}, slot {slot}")]
    OutOfRange { day: usize, slot: usize },

    #[error("Invalid timetable summary: {reason}")]
    InvalidSummary { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_errors_add_keeps_first_message() {
        let mut errors = FormErrors::new();
        errors.add("name", "Name is required");
        errors.add("name", "second");
        assert_eq!(errors.get("name"), Some("Name is required"));
    }

    #[test]
    fn test_form_errors_replace_overrides() {
        let mut errors = FormErrors::new();
        errors.add("name", "Name is required");
        errors.replace("name", "Department already exists");
        assert_eq!(errors.get("name"), Some("Department already exists"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_form_errors_display_lists_fields() {
        let mut errors = FormErrors::new();
        errors.add("alias", "Alias is required");
        errors.add("name", "Name is required");
        assert_eq!(errors.to_string(), "alias: Alias is required; name: Name is required");
    }

    #[test]
    fn test_remote_error_transport_classification() {
        assert!(RemoteError::Transport("timeout".into()).is_transport());
        assert!(RemoteError::Status { status: 502, body: String::new() }.is_transport());
        assert!(!RemoteError::Rejected { message: "nope".into() }.is_transport());
    }
}
