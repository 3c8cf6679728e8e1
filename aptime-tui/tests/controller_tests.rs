use aptime_core::{
    EntityKind, Envelope, LoginForm, PasswordChange, Record, RecordId, RemoteError,
};
use aptime_test_utils::assertions::{assert_rejected, assert_transport};
use aptime_test_utils::fixtures;
use aptime_test_utils::{Method, MockRemote};
use aptime_tui::controller::{self, ActionError, Mutation};

fn department_id(value: &str) -> RecordId {
    RecordId::new(EntityKind::Department.id_field(), value).unwrap()
}

#[tokio::test]
async fn load_page_fetches_primary_and_references() {
    let remote = fixtures::seeded_remote();
    let load = controller::load_page(&remote, EntityKind::Department).await;

    assert_eq!(load.kind, EntityKind::Department);
    assert_eq!(load.primary.as_ref().unwrap().len(), 2);
    assert_eq!(load.references.len(), 1);
    let (kind, shifts) = &load.references[0];
    assert_eq!(*kind, EntityKind::Shift);
    assert_eq!(shifts.as_ref().unwrap().len(), 1);
    assert_eq!(remote.call_count(Method::Fetch), 2);
}

#[tokio::test]
async fn load_page_reports_each_list_independently() {
    let remote = fixtures::seeded_remote().failing(
        EntityKind::Shift.resource(),
        RemoteError::Transport("connection refused".into()),
    );
    let load = controller::load_page(&remote, EntityKind::Department).await;

    assert!(load.primary.is_ok());
    assert_transport(&load.references[0].1);

    let remote = fixtures::seeded_remote().failing(
        EntityKind::Department.resource(),
        RemoteError::Transport("connection refused".into()),
    );
    let load = controller::load_page(&remote, EntityKind::Department).await;
    assert_transport(&load.primary);
    assert!(load.references[0].1.is_ok());
}

#[tokio::test]
async fn submit_create_keeps_payload_and_server_row() {
    let remote = fixtures::seeded_remote();
    let payload = Record::new()
        .with("name", "Chemistry")
        .with("alias", "CHM")
        .with("timeid", 1);

    let outcome = controller::submit_form(&remote, EntityKind::Department, payload.clone(), None)
        .await
        .unwrap();

    assert_eq!(outcome.message.as_deref(), Some("Created"));
    match outcome.mutation {
        Mutation::Created { submitted, returned } => {
            assert_eq!(submitted, payload);
            assert_eq!(returned.unwrap().text("did"), "1001");
        }
        other => panic!("expected create, got {:?}", other),
    }
    assert_eq!(remote.records("dept").len(), 3);
}

#[tokio::test]
async fn submit_update_targets_record_id() {
    let remote = fixtures::seeded_remote();
    let payload = Record::new()
        .with("name", "Applied Physics")
        .with("alias", "APHY")
        .with("timeid", 1);

    let outcome = controller::submit_form(
        &remote,
        EntityKind::Department,
        payload,
        Some(department_id("2")),
    )
    .await
    .unwrap();

    match outcome.mutation {
        Mutation::Updated { id, record } => {
            assert_eq!(id, department_id("2"));
            assert_eq!(record.text("name"), "Applied Physics");
            assert_eq!(record.text("did"), "2");
        }
        other => panic!("expected update, got {:?}", other),
    }
    assert_eq!(remote.records("dept")[1].text("alias"), "APHY");
    assert_eq!(remote.call_count(Method::Update), 1);
}

#[tokio::test]
async fn delete_record_removes_row() {
    let remote = fixtures::seeded_remote();
    let outcome = controller::delete_record(&remote, EntityKind::Department, department_id("1"))
        .await
        .unwrap();

    assert_eq!(outcome.mutation, Mutation::Deleted { id: department_id("1") });
    assert_eq!(remote.records("dept").len(), 1);

    let delete_call = remote
        .calls()
        .into_iter()
        .find(|call| call.method == Method::Delete)
        .unwrap();
    assert_eq!(delete_call.payload.unwrap().text("did"), "1");
}

#[tokio::test]
async fn rejected_mutation_keeps_server_message() {
    let remote = fixtures::seeded_remote().rejecting("dept", "Department already exists");
    let result = controller::submit_form(
        &remote,
        EntityKind::Department,
        Record::new().with("name", "Physics"),
        None,
    )
    .await;

    assert_rejected(&result, "Department already exists");
    let message = controller::describe_error("Failed to save Department", result.as_ref().unwrap_err());
    assert_eq!(message, "Department already exists");
}

#[tokio::test]
async fn login_returns_identity() {
    let remote = fixtures::seeded_remote();
    let form = LoginForm {
        username: "admin".into(),
        password: "secret1".into(),
    };

    let identity = controller::login(&remote, &form).await.unwrap();
    assert_eq!(identity, fixtures::admin_identity());

    let sent = remote.calls().pop().unwrap().payload.unwrap();
    assert_eq!(sent.text("username"), "admin");
    assert_eq!(sent.text("password"), "e52d98c459819a11775936d8dfbb7929");
}

#[tokio::test]
async fn login_without_identity_is_an_auth_error() {
    let remote = MockRemote::new().with_action("login", Envelope::ok_with_message(None, "ok"));
    let form = LoginForm {
        username: "admin".into(),
        password: "secret1".into(),
    };

    let result = controller::login(&remote, &form).await;
    assert!(matches!(result, Err(ActionError::Auth(_))));
}

#[tokio::test]
async fn login_rejection_surfaces_message() {
    let remote = MockRemote::new().with_action("login", Envelope::rejected("Invalid credentials"));
    let form = LoginForm {
        username: "admin".into(),
        password: "wrongpass".into(),
    };

    match controller::login(&remote, &form).await {
        Err(ActionError::Remote(RemoteError::Rejected { message })) => {
            assert_eq!(message, "Invalid credentials")
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn change_password_returns_server_message() {
    let remote = fixtures::seeded_remote();
    let change = PasswordChange {
        current: "secret1".into(),
        new: "secret22".into(),
        confirm: "secret22".into(),
    };

    let message = controller::change_password(&remote, &change, &fixtures::admin_identity())
        .await
        .unwrap();
    assert_eq!(message, "Password updated");

    let sent = remote.calls().pop().unwrap().payload.unwrap();
    assert_eq!(sent.text("uid"), "1");
}

#[tokio::test]
async fn grid_load_joins_summary_offerings_and_rooms() {
    let remote = fixtures::seeded_remote();
    let tid = RecordId::new(EntityKind::Timetable.id_field(), "5").unwrap();

    let load = controller::load_timetable_grid(&remote, tid.clone()).await.unwrap();
    assert_eq!(load.tid, tid);
    assert_eq!(load.summary.dept_name, "Computer Science");
    assert_eq!(load.summary.slots().len(), 3);
    assert_eq!(load.offerings.unwrap().len(), 2);
    assert_eq!(load.rooms.unwrap().len(), 2);

    let query = remote
        .calls()
        .into_iter()
        .find(|call| call.resource == "getfacultybytimetable")
        .and_then(|call| call.payload)
        .unwrap();
    assert_eq!(query.text("pid"), "1");
    assert_eq!(query.text("sid"), "1");
}

#[tokio::test]
async fn grid_load_without_summary_row_fails() {
    let remote = fixtures::seeded_remote().with_action("getimetable", Envelope::ok(serde_json::json!([])));
    let tid = RecordId::new(EntityKind::Timetable.id_field(), "9").unwrap();

    let result = controller::load_timetable_grid(&remote, tid).await;
    assert!(matches!(result, Err(ActionError::Grid(_))));
}
