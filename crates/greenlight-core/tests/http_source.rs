//! HttpProjectSource and Poller against a local axum backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;

use greenlight_core::{
    ApiError, HttpProjectSource, PollConfig, Poller, ProjectError, ProjectId, ProjectSource,
};

const LIST_BODY: &str = r#"{
    "0": {"name": "unit", "id": 0, "up_to_date": true, "returncode": 0, "mtime": 1690000000000},
    "1": {"name": "lint", "id": 1, "up_to_date": false}
}"#;

/// Bodies served by the fake backend, swappable while a test runs.
#[derive(Clone)]
struct Backend {
    list: Arc<Mutex<String>>,
    detail_delay: Duration,
}

impl Backend {
    fn new(list: &str) -> Self {
        Self {
            list: Arc::new(Mutex::new(list.to_string())),
            detail_delay: Duration::ZERO,
        }
    }

    fn set_list(&self, body: &str) {
        *self.list.lock().unwrap() = body.to_string();
    }
}

fn json(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn list_projects(State(backend): State<Backend>) -> Response {
    let body = backend.list.lock().unwrap().clone();
    json(body)
}

async fn show_project(State(backend): State<Backend>, Path(id): Path<String>) -> Response {
    if !backend.detail_delay.is_zero() {
        tokio::time::sleep(backend.detail_delay).await;
    }
    match id.as_str() {
        "0" => json(
            r#"{"name": "unit", "id": 0, "up_to_date": true, "returncode": 0,
                "mtime": 1690000000000, "out": "4 passed", "err": ""}"#
                .to_string(),
        ),
        "5" => json(r#"{"id": 5, "up_to_date": "soon"}"#.to_string()),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:id", get(show_project))
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(base_url: &str) -> HttpProjectSource {
    HttpProjectSource::new(base_url, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_fetch_projects_parses_keyed_map() {
    let base = spawn_backend(Backend::new(LIST_BODY)).await;
    let projects = client(&base).fetch_projects().await.unwrap();

    assert_eq!(projects.len(), 2);
    let unit = projects.get(&ProjectId::from(0)).unwrap();
    assert!(unit.is_success());
    let lint = projects.get(&ProjectId::from(1)).unwrap();
    assert!(lint.is_never_run());
}

#[tokio::test]
async fn test_fetch_project_includes_output() {
    let base = spawn_backend(Backend::new(LIST_BODY)).await;
    let project = client(&base)
        .fetch_project(&ProjectId::from(0))
        .await
        .unwrap();

    assert_eq!(project.project_id, ProjectId::from(0));
    assert_eq!(project.out.as_deref(), Some("4 passed"));
}

#[tokio::test]
async fn test_unknown_project_is_not_found() {
    let base = spawn_backend(Backend::new(LIST_BODY)).await;
    let err = client(&base)
        .fetch_project(&ProjectId::from(42))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ProjectNotFound { ref id } if id == "42"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let base = spawn_backend(Backend::new(LIST_BODY)).await;
    let err = client(&base)
        .fetch_project(&ProjectId::new("broken").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::HttpStatus { status: 500, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected() {
    let backend = Backend::new("<html>bad gateway</html>");
    let base = spawn_backend(backend.clone()).await;
    let source = client(&base);

    let err = source.fetch_projects().await.unwrap_err();
    assert!(err.is_malformed());

    backend.set_list(r#"[{"up_to_date": true}]"#);
    let err = source.fetch_projects().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::MalformedResponse {
            source: ProjectError::MissingId { position: 0 },
            ..
        }
    ));

    let err = source.fetch_project(&ProjectId::from(5)).await.unwrap_err();
    assert!(err.is_malformed());
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .fetch_projects()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = Backend {
        detail_delay: Duration::from_secs(5),
        ..Backend::new(LIST_BODY)
    };
    let base = spawn_backend(backend).await;
    let source = HttpProjectSource::new(&base, Duration::from_millis(100)).unwrap();

    let err = source.fetch_project(&ProjectId::from(0)).await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_poller_picks_up_backend_changes() {
    let backend = Backend::new(LIST_BODY);
    let base = spawn_backend(backend.clone()).await;
    let source = Arc::new(client(&base));

    let config = PollConfig {
        interval: Duration::from_millis(20),
        max_backoff: Duration::from_millis(200),
    };
    let poller = Poller::start_list(source, config, None).unwrap();
    let mut rx = poller.subscribe();

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().unwrap().len(), 2);

    // lint starts running
    backend.set_list(
        r#"{
        "0": {"name": "unit", "id": 0, "up_to_date": true, "returncode": 0, "mtime": 1690000000000},
        "1": {"name": "lint", "id": 1, "up_to_date": false, "mtime": 1690000005000, "start_time": 1690000005000}
    }"#,
    );

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .unwrap()
        .unwrap();
    let current = rx.borrow_and_update().clone().unwrap();
    assert!(current.get(&ProjectId::from(1)).unwrap().is_in_progress());

    let stats = poller.stop().await.unwrap();
    assert_eq!(stats.replacements, 2);
    assert!(stats.fetches >= 2);
}
