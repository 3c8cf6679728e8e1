//! Remote data contract consumed by the console.
//!
//! Every response is wrapped in an [`Envelope`]. Transport failures surface
//! as `Err(RemoteError)` from the trait methods; application-level failures
//! arrive as `success: false` and become [`RemoteError::Rejected`] once the
//! caller unwraps the envelope.

use crate::error::RemoteError;
use crate::record::{Record, RecordId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// `{ success, data?, message? }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn ok(data: impl Into<Value>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            message: None,
        }
    }

    pub fn ok_with_message(data: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
    }

    /// The payload of a successful envelope; `Null` when absent.
    pub fn into_data(self) -> RemoteResult<Value> {
        if self.success {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            let message = self.message_or("Request failed").to_string();
            Err(RemoteError::Rejected { message })
        }
    }

    /// List payload as records. A single object counts as a one-row list.
    pub fn into_records(self) -> RemoteResult<Vec<Record>> {
        match self.into_data()? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(Record::from(map)),
                    other => Err(RemoteError::Malformed(format!(
                        "expected an object row, got {}",
                        other
                    ))),
                })
                .collect(),
            Value::Object(map) => Ok(vec![Record::from(map)]),
            other => Err(RemoteError::Malformed(format!(
                "expected a list of rows, got {}",
                other
            ))),
        }
    }

    /// Object payload as a record, if there is one.
    pub fn into_record(self) -> RemoteResult<Option<Record>> {
        match self.into_data()? {
            Value::Object(map) => Ok(Some(Record::from(map))),
            Value::Array(items) => Ok(items.into_iter().find_map(|item| match item {
                Value::Object(map) => Some(Record::from(map)),
                _ => None,
            })),
            _ => Ok(None),
        }
    }
}

/// Async access to the remote resources.
///
/// Implementations return `Err` only for transport-level failures; the
/// envelope decides application success.
#[async_trait]
pub trait RemoteData: Send + Sync {
    async fn fetch(&self, resource: &str) -> RemoteResult<Envelope>;

    async fn create(&self, resource: &str, payload: &Record) -> RemoteResult<Envelope>;

    /// `payload` is sent with the id field set to `id`.
    async fn update(&self, resource: &str, id: &RecordId, payload: &Record) -> RemoteResult<Envelope>;

    async fn delete(&self, resource: &str, id: &RecordId) -> RemoteResult<Envelope>;

    /// Non-CRUD action such as `login` or `getimetable`.
    async fn call(&self, action: &str, payload: &Record) -> RemoteResult<Envelope>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_decodes_minimal_shape() {
        let envelope: Envelope = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(envelope.success);
        assert!(envelope.into_records().unwrap().is_empty());
    }

    #[test]
    fn test_rejected_envelope_becomes_error() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": false, "message": "Duplicate entry"})).unwrap();
        assert_eq!(
            envelope.into_data(),
            Err(RemoteError::Rejected { message: "Duplicate entry".into() })
        );

        let silent = Envelope { success: false, data: None, message: Some("  ".into()) };
        assert_eq!(
            silent.into_data(),
            Err(RemoteError::Rejected { message: "Request failed".into() })
        );
    }

    #[test]
    fn test_into_records_accepts_list_or_object() {
        let list = Envelope::ok(json!([{"sid": 1}, {"sid": 2}]));
        assert_eq!(list.into_records().unwrap().len(), 2);

        let single = Envelope::ok(json!({"sid": 1}));
        assert_eq!(single.into_records().unwrap().len(), 1);

        let scalar = Envelope::ok(json!(5));
        assert!(matches!(scalar.into_records(), Err(RemoteError::Malformed(_))));

        let mixed = Envelope::ok(json!([{"sid": 1}, "oops"]));
        assert!(matches!(mixed.into_records(), Err(RemoteError::Malformed(_))));
    }

    #[test]
    fn test_into_record_takes_first_object() {
        let envelope = Envelope::ok(json!([{"dept_name": "CS"}]));
        let record = envelope.into_record().unwrap().unwrap();
        assert_eq!(record.text("dept_name"), "CS");
        assert_eq!(Envelope::ok(json!("created")).into_record().unwrap(), None);
    }
}
