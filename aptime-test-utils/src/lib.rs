//! Aptime Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - An in-memory remote (`MockRemote`) implementing `RemoteData`
//! - Proptest generators for records and form input
//! - Fixtures with a small, consistent college dataset
//! - Assertions for remote and form errors

pub use aptime_core::{
    EntityKind, Envelope, FieldValue, FormErrors, IdField, Identity, Record, RecordId,
    RemoteData, RemoteError, RemoteResult,
};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

// ============================================================================
// MOCK REMOTE
// ============================================================================

/// HTTP-free stand-in for the remote collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Fetch,
    Create,
    Update,
    Delete,
    Call,
}

/// One request seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub resource: String,
    pub payload: Option<Record>,
}

/// In-memory remote keyed by resource name.
///
/// Unknown resources behave as empty lists. Transport failures and
/// application rejections can be scripted per resource or action.
#[derive(Debug, Clone, Default)]
pub struct MockRemote {
    tables: Arc<RwLock<HashMap<String, Vec<Record>>>>,
    actions: Arc<RwLock<HashMap<String, Envelope>>>,
    failures: Arc<RwLock<HashMap<String, RemoteError>>>,
    rejections: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    next_id: Arc<RwLock<i64>>,
}

impl MockRemote {
    /// Create an empty mock remote.
    pub fn new() -> Self {
        let remote = Self::default();
        *remote.next_id.write().unwrap() = 1000;
        remote
    }

    pub fn with_records(self, resource: &str, records: Vec<Record>) -> Self {
        self.tables.write().unwrap().insert(resource.to_string(), records);
        self
    }

    /// Scripted reply for a `call` action.
    pub fn with_action(self, action: &str, envelope: Envelope) -> Self {
        self.actions.write().unwrap().insert(action.to_string(), envelope);
        self
    }

    /// Every request on `resource` fails at the transport level.
    pub fn failing(self, resource: &str, error: RemoteError) -> Self {
        self.failures.write().unwrap().insert(resource.to_string(), error);
        self
    }

    /// Every request on `resource` answers `success: false` with `message`.
    pub fn rejecting(self, resource: &str, message: &str) -> Self {
        self.rejections
            .write()
            .unwrap()
            .insert(resource.to_string(), message.to_string());
        self
    }

    /// Current rows of a resource.
    pub fn records(&self, resource: &str) -> Vec<Record> {
        self.tables
            .read()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self, method: Method) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    fn record_call(&self, method: Method, resource: &str, payload: Option<&Record>) {
        self.calls.write().unwrap().push(RecordedCall {
            method,
            resource: resource.to_string(),
            payload: payload.cloned(),
        });
    }

    /// Scripted outcome that short-circuits the request, if any.
    fn scripted(&self, resource: &str) -> Option<RemoteResult<Envelope>> {
        if let Some(error) = self.failures.read().unwrap().get(resource) {
            return Some(Err(error.clone()));
        }
        self.rejections
            .read()
            .unwrap()
            .get(resource)
            .map(|message| Ok(Envelope::rejected(message.clone())))
    }

    fn id_field(resource: &str) -> IdField {
        EntityKind::all()
            .iter()
            .find(|kind| kind.resource() == resource)
            .map(|kind| kind.id_field())
            .unwrap_or(IdField::new("id"))
    }
}

#[async_trait]
impl RemoteData for MockRemote {
    async fn fetch(&self, resource: &str) -> RemoteResult<Envelope> {
        self.record_call(Method::Fetch, resource, None);
        if let Some(outcome) = self.scripted(resource) {
            return outcome;
        }
        let rows: Vec<Value> = self.records(resource).into_iter().map(Record::into_value).collect();
        Ok(Envelope::ok(Value::Array(rows)))
    }

    async fn create(&self, resource: &str, payload: &Record) -> RemoteResult<Envelope> {
        self.record_call(Method::Create, resource, Some(payload));
        if let Some(outcome) = self.scripted(resource) {
            return outcome;
        }
        let id = {
            let mut next = self.next_id.write().unwrap();
            *next += 1;
            *next
        };
        let created = payload.clone().with(Self::id_field(resource).name(), id);
        self.tables
            .write()
            .unwrap()
            .entry(resource.to_string())
            .or_default()
            .push(created.clone());
        Ok(Envelope::ok_with_message(Some(created.into_value()), "Created"))
    }

    async fn update(&self, resource: &str, id: &RecordId, payload: &Record) -> RemoteResult<Envelope> {
        self.record_call(Method::Update, resource, Some(payload));
        if let Some(outcome) = self.scripted(resource) {
            return outcome;
        }
        let mut tables = self.tables.write().unwrap();
        let rows = tables.entry(resource.to_string()).or_default();
        match rows.iter_mut().find(|row| id.matches(row)) {
            Some(row) => {
                *row = payload.clone().with(id.field().name(), id.to_json());
                Ok(Envelope::ok_with_message(Some(row.clone().into_value()), "Updated"))
            }
            None => Ok(Envelope::rejected("Record not found")),
        }
    }

    async fn delete(&self, resource: &str, id: &RecordId) -> RemoteResult<Envelope> {
        let body = Record::new().with(id.field().name(), id.to_json());
        self.record_call(Method::Delete, resource, Some(&body));
        if let Some(outcome) = self.scripted(resource) {
            return outcome;
        }
        let mut tables = self.tables.write().unwrap();
        let rows = tables.entry(resource.to_string()).or_default();
        let before = rows.len();
        rows.retain(|row| !id.matches(row));
        if rows.len() < before {
            Ok(Envelope::ok_with_message(None, "Deleted"))
        } else {
            Ok(Envelope::rejected("Record not found"))
        }
    }

    async fn call(&self, action: &str, payload: &Record) -> RemoteResult<Envelope> {
        self.record_call(Method::Call, action, Some(payload));
        if let Some(outcome) = self.scripted(action) {
            return outcome;
        }
        Ok(self
            .actions
            .read()
            .unwrap()
            .get(action)
            .cloned()
            .unwrap_or_else(|| Envelope::rejected(format!("Unknown action: {}", action))))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for records and form input.

    use super::*;
    use proptest::prelude::*;

    /// A primitive JSON value as the endpoint sends them.
    pub fn arb_json_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            "[A-Za-z0-9 ]{0,16}".prop_map(Value::from),
            (-1000i64..1000).prop_map(Value::from),
            (-1000.0f64..1000.0).prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            Just(Value::Null),
        ]
    }

    /// A record with a unique-enough numeric id plus a few random fields.
    pub fn arb_record(id_field: IdField) -> impl Strategy<Value = Record> {
        (
            1i64..1_000_000,
            prop::collection::btree_map("[a-z_]{1,8}", arb_json_scalar(), 0..5),
        )
            .prop_map(move |(id, fields)| {
                let mut record: Record = fields.into_iter().collect();
                record.set(id_field.name(), id);
                record
            })
    }

    /// Up to `max` records with distinct ids.
    pub fn arb_records(id_field: IdField, max: usize) -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(arb_record(id_field), 0..=max).prop_map(move |records| {
            let mut seen = std::collections::HashSet::new();
            records
                .into_iter()
                .filter(|record| seen.insert(record.get(id_field.name()).normalized()))
                .collect()
        })
    }

    /// Named rows that always carry a `name`, for search tests.
    pub fn arb_named_records(id_field: IdField, max: usize) -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec("[A-Za-z][A-Za-z ]{0,15}", 0..=max).prop_map(move |names| {
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| Record::new().with(id_field.name(), i as i64 + 1).with("name", name))
                .collect()
        })
    }

    pub fn arb_search_term() -> impl Strategy<Value = String> {
        "[A-Za-z ]{0,4}"
    }

    pub fn arb_valid_username() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_]{1,16}"
    }

    pub fn arb_valid_password() -> impl Strategy<Value = String> {
        "[A-Za-z0-9!@#]{6,24}"
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! A small consistent dataset: one shift, two departments, two sections,
    //! programs, years, semesters, courses, faculty and classrooms.

    use super::*;

    pub fn admin_identity() -> Identity {
        Identity {
            uid: "1".to_string(),
            name: "Administrator".to_string(),
            role: "admin".to_string(),
        }
    }

    pub fn login_success() -> Envelope {
        Envelope::ok(serde_json::json!({"uid": 1, "name": "Administrator", "role": "admin"}))
    }

    pub fn shifts() -> Vec<Record> {
        vec![Record::new()
            .with("timeid", 1)
            .with("name", "Morning")
            .with("start", "09:00")
            .with("end", "13:00")
            .with("gap", 60)]
    }

    pub fn departments() -> Vec<Record> {
        vec![
            Record::new().with("did", 1).with("name", "Computer Science").with("alias", "CS").with("timeid", 1),
            Record::new().with("did", 2).with("name", "Physics").with("alias", "PHY").with("timeid", 1),
        ]
    }

    pub fn sections() -> Vec<Record> {
        vec![
            Record::new().with("sid", 1).with("name", "A"),
            Record::new().with("sid", 2).with("name", "B"),
        ]
    }

    pub fn programs() -> Vec<Record> {
        vec![Record::new().with("pid", 1).with("name", "BSc Computer Science").with("alias", "BSCS").with("sid", 1)]
    }

    pub fn years() -> Vec<Record> {
        vec![Record::new().with("yid", 1).with("name", "First").with("pid", 1)]
    }

    pub fn semesters() -> Vec<Record> {
        vec![Record::new().with("semid", 1).with("name", "Semester 1").with("pid", 1).with("yid", 1)]
    }

    pub fn courses() -> Vec<Record> {
        vec![
            Record::new()
                .with("cid", 7)
                .with("name", "Algebra")
                .with("alias", "ALG")
                .with("course_code", "MA101")
                .with("category", "Core")
                .with("max_lecture", 4)
                .with("duration", "1 Semester")
                .with("did", 1)
                .with("pid", 1)
                .with("yid", 1)
                .with("semid", 1)
                .with("elective", "No"),
            Record::new()
                .with("cid", 8)
                .with("name", "Biology")
                .with("alias", "BIO")
                .with("course_code", "BI101")
                .with("category", "Core")
                .with("max_lecture", 3)
                .with("duration", "1 Semester")
                .with("did", 2)
                .with("pid", 1)
                .with("yid", 1)
                .with("semid", 1)
                .with("elective", "Yes"),
        ]
    }

    pub fn faculty() -> Vec<Record> {
        vec![Record::new()
            .with("fid", 3)
            .with("name", "Dr. Rao")
            .with("entrytime", "09:00")
            .with("exittime", "17:00")
            .with("max_allowed_lecture", 12)]
    }

    pub fn classrooms() -> Vec<Record> {
        vec![
            Record::new().with("rid", 1).with("name", "Room 101").with("type", "Lecture").with("capacity", 60),
            Record::new().with("rid", 2).with("name", "Lab A").with("type", "Lab").with("capacity", 30),
        ]
    }

    pub fn timetables() -> Vec<Record> {
        vec![Record::new()
            .with("tid", 5)
            .with("did", 1)
            .with("pid", 1)
            .with("yid", 1)
            .with("sid", 1)
            .with("gap", 60)
            .with("start_time", "09:00:00")
            .with("end_time", "12:00:00")]
    }

    /// `getimetable` reply for timetable 5.
    pub fn timetable_summary() -> Envelope {
        Envelope::ok(serde_json::json!([{
            "tid": 5,
            "dept_name": "Computer Science",
            "program_name": "BSc Computer Science",
            "year_name": "First",
            "section_name": "A",
            "gap": "60",
            "start_time": "09:00:00",
            "end_time": "12:00:00",
            "pid": 1,
            "yid": 1,
            "sid": 1
        }]))
    }

    /// `getfacultybytimetable` reply.
    pub fn faculty_offerings() -> Envelope {
        Envelope::ok(serde_json::json!([
            {"caid": 1, "cid": 7, "course_name": "Algebra", "faculty_name": "Dr. Rao", "max_allowed_lecture": 12},
            {"caid": 2, "cid": 8, "course_name": "Biology", "faculty_name": "", "max_allowed_lecture": 10}
        ]))
    }

    /// Mock remote seeded with every fixture list and the auth and grid actions.
    pub fn seeded_remote() -> MockRemote {
        MockRemote::new()
            .with_records(EntityKind::Shift.resource(), shifts())
            .with_records(EntityKind::Department.resource(), departments())
            .with_records(EntityKind::Section.resource(), sections())
            .with_records(EntityKind::Program.resource(), programs())
            .with_records(EntityKind::Year.resource(), years())
            .with_records(EntityKind::Semester.resource(), semesters())
            .with_records(EntityKind::Course.resource(), courses())
            .with_records(EntityKind::Faculty.resource(), faculty())
            .with_records(EntityKind::Classroom.resource(), classrooms())
            .with_records(EntityKind::Timetable.resource(), timetables())
            .with_action("login", login_success())
            .with_action("changepassword", Envelope::ok_with_message(None, "Password updated"))
            .with_action("getimetable", timetable_summary())
            .with_action("getfacultybytimetable", faculty_offerings())
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for remote and form outcomes.

    use super::*;

    /// Assert that a result is an application-level rejection with `message`.
    #[track_caller]
    pub fn assert_rejected<T: std::fmt::Debug>(result: &RemoteResult<T>, message: &str) {
        match result {
            Err(RemoteError::Rejected { message: actual }) => assert_eq!(actual, message),
            other => panic!("Expected Rejected({}), got: {:?}", message, other),
        }
    }

    /// Assert that a result failed at the transport level.
    #[track_caller]
    pub fn assert_transport<T: std::fmt::Debug>(result: &RemoteResult<T>) {
        match result {
            Err(error) if error.is_transport() => {}
            other => panic!("Expected transport error, got: {:?}", other),
        }
    }

    /// Assert that form validation flagged `field` with `message`.
    #[track_caller]
    pub fn assert_form_error(result: &Result<(), FormErrors>, field: &str, message: &str) {
        match result {
            Err(errors) => assert_eq!(
                errors.get(field),
                Some(message),
                "Wrong message for {} in {:?}",
                field,
                errors
            ),
            Ok(()) => panic!("Expected error on {}, form was valid", field),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
