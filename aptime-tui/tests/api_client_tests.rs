//! ApiClient against an in-process HTTP endpoint.

use aptime_core::{EntityKind, Record, RecordId, RemoteData, RemoteError};
use aptime_test_utils::assertions::assert_rejected;
use aptime_tui::api_client::ApiClient;
use aptime_tui::config::{RetryConfig, ThemeConfig, TuiConfig};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::routing::any;
use axum::Router;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
struct Seen {
    method: String,
    endpoint: String,
    body: Value,
}

#[derive(Clone, Default)]
struct Endpoint {
    seen: Arc<Mutex<Vec<Seen>>>,
    flaky_hits: Arc<AtomicUsize>,
}

impl Endpoint {
    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

async fn handle(
    State(endpoint): State<Endpoint>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> (StatusCode, String) {
    let resource = query.get("endpoint").cloned().unwrap_or_default();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    endpoint.seen.lock().unwrap().push(Seen {
        method: method.as_str().to_string(),
        endpoint: resource.clone(),
        body: body.clone(),
    });

    let reply = match (method.as_str(), resource.as_str()) {
        ("GET", "dept") => json!({
            "success": true,
            "data": [{"did": 1, "name": "Computer Science", "alias": "CS", "timeid": 1}]
        }),
        ("POST", "dept") => {
            let mut created = body;
            created["did"] = json!(10);
            json!({"success": true, "data": created, "message": "Department added"})
        }
        ("PUT", "dept") | ("DELETE", "dept") => json!({"success": true, "message": "ok"}),
        (_, "duplicate") => {
            return (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "message": "Department already exists"}).to_string(),
            )
        }
        (_, "broken") => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Fatal error".to_string());
        }
        (_, "flaky") => {
            endpoint.flaky_hits.fetch_add(1, Ordering::SeqCst);
            return (StatusCode::SERVICE_UNAVAILABLE, "try later".to_string());
        }
        (_, "login") => json!({"success": false, "message": "Invalid credentials"}),
        _ => return (StatusCode::NOT_FOUND, String::new()),
    };
    (StatusCode::OK, reply.to_string())
}

async fn start_endpoint() -> (Endpoint, String) {
    let endpoint = Endpoint::default();
    let app = Router::new()
        .route("/api.php", any(handle))
        .with_state(endpoint.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (endpoint, format!("http://{}/api.php", addr))
}

fn client(base_url: String) -> ApiClient {
    let config = TuiConfig {
        api_base_url: base_url,
        resource_param: "endpoint".to_string(),
        request_timeout_ms: 2_000,
        tick_rate_ms: 250,
        required_role: "admin".to_string(),
        persistence_path: "tmp/aptime-state.json".into(),
        log_path: "tmp/aptime.log".into(),
        log_filter: "aptime_tui=debug".to_string(),
        theme: ThemeConfig {
            name: "synthbrute".to_string(),
        },
        retry: RetryConfig {
            max_attempts: 3,
            backoff_ms: 10,
            max_backoff_ms: 20,
            multiplier: 2.0,
        },
    };
    ApiClient::new(&config).unwrap()
}

fn department_id(value: &str) -> RecordId {
    RecordId::new(EntityKind::Department.id_field(), value).unwrap()
}

#[tokio::test]
async fn fetch_names_resource_in_query() {
    let (endpoint, base) = start_endpoint().await;
    let api = client(base);

    let rows = api.fetch("dept").await.unwrap().into_records().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text("name"), "Computer Science");

    let seen = endpoint.seen();
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].endpoint, "dept");
}

#[tokio::test]
async fn mutations_send_expected_bodies() {
    let (endpoint, base) = start_endpoint().await;
    let api = client(base);
    let payload = Record::new().with("name", "Physics").with("alias", "PHY").with("timeid", 1);

    let created = api.create("dept", &payload).await.unwrap();
    assert_eq!(created.message.as_deref(), Some("Department added"));
    assert_eq!(created.into_record().unwrap().unwrap().text("did"), "10");

    api.update("dept", &department_id("4"), &payload).await.unwrap();
    api.delete("dept", &department_id("4")).await.unwrap();

    let seen = endpoint.seen();
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].body, json!({"name": "Physics", "alias": "PHY", "timeid": 1}));
    assert_eq!(seen[1].method, "PUT");
    assert_eq!(seen[1].body["did"], json!(4));
    assert_eq!(seen[1].body["name"], json!("Physics"));
    assert_eq!(seen[2].method, "DELETE");
    assert_eq!(seen[2].body, json!({"did": 4}));
}

#[tokio::test]
async fn envelope_failure_becomes_rejection() {
    let (_endpoint, base) = start_endpoint().await;
    let api = client(base);

    let envelope = api.create("duplicate", &Record::new()).await.unwrap();
    assert!(!envelope.success);
    assert_rejected(&envelope.into_data(), "Department already exists");

    let login = api.call("login", &Record::new().with("username", "x")).await.unwrap();
    assert_rejected(&login.into_data(), "Invalid credentials");
}

#[tokio::test]
async fn server_error_without_envelope_is_status() {
    let (_endpoint, base) = start_endpoint().await;
    let api = client(base);

    match api.create("broken", &Record::new()).await {
        Err(RemoteError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Fatal error");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn reads_are_retried_but_writes_are_not() {
    let (endpoint, base) = start_endpoint().await;
    let api = client(base);

    let result = api.fetch("flaky").await;
    assert!(matches!(result, Err(RemoteError::Status { status: 503, .. })));
    assert_eq!(endpoint.flaky_hits.load(Ordering::SeqCst), 3);

    endpoint.flaky_hits.store(0, Ordering::SeqCst);
    let result = api.create("flaky", &Record::new()).await;
    assert!(result.is_err());
    assert_eq!(endpoint.flaky_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client(format!("http://{}/api.php", addr));

    let result = api.create("dept", &Record::new()).await;
    assert!(matches!(result, Err(RemoteError::Transport(_))));
}
