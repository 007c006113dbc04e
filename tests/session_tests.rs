//! Session lifecycle across the gateway: log in, persist the identity, reload it in a
//! fresh store, and drive the command layer with it.

mod mock_backend;

use futures::future::join_all;
use serde_json::json;

use mock_backend::{MockBackend, Reply};
use prpo_client::cli;
use prpo_client::session::SESSION_KEY;
use prpo_client::{fan_out, FileStorage, Identity, LocalStorage, MemoryStorage, SessionProvider, SessionStore};

fn login_reply() -> Reply {
    Reply::json(
        200,
        json!({
            "token": "jwt-42", "type": "Bearer", "id": 42,
            "username": "alice", "email": "alice@example.com", "role": "USER"
        }),
    )
}

fn argv(s: &str) -> Vec<String> { s.split_whitespace().map(String::from).collect() }

#[tokio::test]
async fn login_result_survives_a_store_reopen() {
    let srv = MockBackend::start(vec![("POST /api/auth/login", login_reply())]).await;
    let tmp = tempfile::tempdir().unwrap();

    let resp = srv.client().login("alice", "s3cret").await.unwrap();
    assert_eq!(resp.token_type, "Bearer");
    let identity = Identity::from(resp);
    SessionStore::new(FileStorage::new(tmp.path())).save(&identity).unwrap();

    let reopened = SessionStore::new(FileStorage::new(tmp.path()));
    assert_eq!(reopened.load(), Some(identity));

    let req = srv.only_request();
    assert_eq!(req.json(), json!({"username": "alice", "password": "s3cret"}));
}

#[tokio::test]
async fn corrupt_file_reads_as_logged_out() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(tmp.path());
    storage.set_item(SESSION_KEY, "{\"id\": 42, \"username\": ").unwrap();
    let store = SessionStore::new(storage);
    assert_eq!(store.load(), None);
    store.clear().unwrap();
    store.clear().unwrap();
    assert_eq!(store.load(), None);
}

#[tokio::test]
async fn register_identity_has_no_token() {
    let srv = MockBackend::start(vec![(
        "POST /api/auth/register",
        Reply::json(201, json!({"id": 9, "username": "bob", "email": "bob@example.com", "role": "USER"})),
    )])
    .await;
    let resp = srv.client().register("bob", "bob@example.com", "pw").await.unwrap();
    let identity = Identity::from(resp);
    assert_eq!(identity.id, 9);
    assert!(identity.token.is_none());
    assert_eq!(
        srv.only_request().json(),
        json!({"username": "bob", "email": "bob@example.com", "password": "pw"})
    );
}

#[tokio::test]
async fn cli_login_then_user_scoped_commands() {
    let srv = MockBackend::start(vec![
        ("POST /api/auth/login", login_reply()),
        (
            "GET /api/bookings/my",
            Reply::json(200, json!([{
                "id": 1, "facilityId": 5, "userId": 42,
                "startTime": "2024-01-01T10:00:00", "endTime": "2024-01-01T11:00:00", "status": "CONFIRMED"
            }])),
        ),
        ("GET /api/facilities", Reply::json(200, json!([]))),
    ])
    .await;
    let client = srv.client();
    let session = SessionStore::new(MemoryStorage::new());

    let out = cli::run(&argv("login alice s3cret"), &client, &session, false).await.unwrap();
    assert_eq!(out, "logged in as alice (id 42)");
    assert_eq!(session.load().map(|i| i.id), Some(42));

    let table = cli::run(&argv("bookings"), &client, &session, false).await.unwrap();
    assert!(table.contains("CONFIRMED"));
    assert!(table.ends_with("rows: 1"));

    let dashboard = cli::run(&argv("dashboard"), &client, &session, true).await.unwrap();
    let v: serde_json::Value = serde_json::from_str(&dashboard).unwrap();
    assert_eq!(v["user"], "alice");
    assert_eq!(v["bookings"][0]["userId"], 42);

    let log = srv.requests();
    let bookings = log.iter().filter(|r| r.path == "/api/bookings/my").collect::<Vec<_>>();
    assert_eq!(bookings.len(), 2);
    for r in bookings {
        assert_eq!(r.header("x-user-id").as_deref(), Some("42"));
        assert_eq!(r.header("authorization").as_deref(), Some("Bearer jwt-42"));
    }
}

#[tokio::test]
async fn cli_surfaces_service_text() {
    let srv = MockBackend::start(vec![(
        "POST /api/payments/mock/sess_abc/complete",
        Reply::text(404, "session not found"),
    )])
    .await;
    let session = SessionStore::new(MemoryStorage::new());
    let err = cli::run(&argv("pay sess_abc"), &srv.client(), &session, false).await.unwrap_err();
    assert_eq!(err.to_string(), "session not found");
}

#[tokio::test]
async fn fan_out_over_many_users() {
    let srv = MockBackend::start(vec![
        ("GET /api/calendar/events/user/1", Reply::json(200, json!([])).delayed(60)),
        ("GET /api/calendar/events/user/2", Reply::json(200, json!([]))),
        ("GET /api/calendar/events/user/3", Reply::json(200, json!([])).delayed(20)),
    ])
    .await;
    let c = srv.client();

    let grouped = fan_out((1..=3).map(|u| c.fetch_calendar_events_by_user(u))).await.unwrap();
    assert_eq!(grouped.len(), 3);

    // unguarded form: every result arrives even though they finish out of order
    let each = join_all((1..=3).map(|u| c.fetch_calendar_events_by_user(u))).await;
    assert!(each.iter().all(|r| r.is_ok()));
    assert_eq!(srv.requests().len(), 6);
}
