#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const PASSWORD: &str = "correct horse";
pub const TOKEN: &str = "tok-1";

/// Test harness running the `lifeos` binary in a scratch directory
pub struct CliTestHarness {
    temp_dir: TempDir,
    api_url: String,
}

impl CliTestHarness {
    /// Harness pointed at a port nothing listens on
    pub fn new() -> Self {
        Self::with_api("http://127.0.0.1:9")
    }

    pub fn with_api(api_url: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        Self {
            temp_dir,
            api_url: api_url.to_string(),
        }
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("lifeos").expect("Failed to find lifeos binary");
        cmd.current_dir(self.temp_dir.path())
            .env("LIFEOS_API_URL", &self.api_url)
            .env("LIFEOS_SESSION_FILE", self.session_path())
            .env("NO_PROXY", "127.0.0.1,localhost")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn session_path(&self) -> PathBuf {
        self.temp_dir.path().join("session.json")
    }

    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.temp_dir.path().join("config.toml"), contents)
            .expect("Failed to write config.toml");
    }

    /// Store a valid session without going through `login`
    pub fn sign_in(&self) {
        std::fs::write(self.session_path(), format!(r#"{{"access_token":"{TOKEN}"}}"#))
            .expect("Failed to write session file");
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

/// Minimal Life OS backend on a background thread
pub struct FakeServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeServer {
    pub fn spawn() -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(handle).with_state(requests.clone());
        let (tx, rx) = std::sync::mpsc::channel();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("Failed to build runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("Failed to bind fake backend");
                tx.send(listener.local_addr().expect("Failed to read local addr"))
                    .expect("Failed to report address");
                let _ = axum::serve(listener, app).await;
            });
        });

        let addr = rx.recv().expect("Fake backend did not start");
        Self {
            url: format!("http://{addr}"),
            requests,
        }
    }

    /// `METHOD /path?query` lines in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method_and_path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with(method_and_path))
            .count()
    }
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn task(id: &str, title: &str, status: &str, sort_order: i64) -> Value {
    json!({
        "id": id,
        "project_id": PROJECT_ID,
        "title": title,
        "status": status,
        "sort_order": sort_order,
        "created_at": "2025-01-06T09:00:00Z",
        "updated_at": "2025-01-06T09:00:00Z",
        "completed_at": null
    })
}

pub const PROJECT_ID: &str = "7d0c2a3e-1b1f-4c55-9d3e-000000000001";
pub const REPORT_ID: &str = "5a1e0000-0000-4000-8000-000000000001";

fn board() -> Value {
    json!({
        "id": PROJECT_ID,
        "name": "Home",
        "slug": "home",
        "objective": null,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z",
        "tasks": {
            "backlog": [
                task(REPORT_ID, "Write report", "backlog", 0),
                task("5a1e0000-0000-4000-8000-000000000002", "Book flights", "backlog", 1),
            ],
            "in_progress": [task("5a1e0000-0000-4000-8000-000000000003", "Fix bike", "in_progress", 0)],
            "completed": []
        },
        "notes": []
    })
}

pub const SERIES_ID: &str = "5e000000-0000-4000-8000-00000000000b";
pub const OTHER_SERIES_ID: &str = "5e000000-0000-4000-8000-00000000000a";
/// First occurrence of the Mon/Wed/Fri gym series, 2099-03-02
pub const SERIES_FIRST_ID: &str = "e0000000-0000-4000-8000-0000000000b1";
/// Last occurrence of the gym series, 2099-03-13
pub const SERIES_LAST_ID: &str = "e0000000-0000-4000-8000-0000000000b6";

fn occurrence(id: &str, title: &str, date: &str, series_id: &str, until: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "event_date": date,
        "start_time": "07:00:00",
        "end_time": "08:00:00",
        "is_recurring": true,
        "recurrence_pattern": "weekly",
        "recurrence_end_date": until,
        "series_id": series_id,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

/// Materialized recurring events, as the backend stores them
fn calendar() -> Vec<Value> {
    let gym = ["2099-03-02", "2099-03-04", "2099-03-06", "2099-03-09", "2099-03-11", "2099-03-13"]
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let id = format!("e0000000-0000-4000-8000-0000000000b{}", i + 1);
            occurrence(&id, "Gym", date, SERIES_ID, "2099-03-13")
        });
    let piano = ["2099-03-03", "2099-03-10"].iter().enumerate().map(|(i, date)| {
        let id = format!("e0000000-0000-4000-8000-0000000000a{}", i + 1);
        occurrence(&id, "Piano", date, OTHER_SERIES_ID, "2099-03-10")
    });
    gym.chain(piano).collect()
}

fn query_param<'a>(uri: &'a Uri, name: &str) -> Option<&'a str> {
    uri.query()?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

async fn handle(
    State(requests): State<Arc<Mutex<Vec<String>>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    requests.lock().unwrap().push(format!("{} {}", method, uri));

    let path = uri.path();
    let authed = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.split(';').any(|c| c.trim() == format!("access_token={TOKEN}")));

    match (method.as_str(), path) {
        ("POST", "/api/auth/login") => {
            if body["password"] != PASSWORD {
                return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
            }
            (
                AppendHeaders([
                    (header::SET_COOKIE, format!("access_token={TOKEN}; HttpOnly; Path=/")),
                    (header::SET_COOKIE, "refresh_token=r-1; HttpOnly; Path=/api/auth".to_string()),
                ]),
                Json(json!({
                    "user_id": "0b7e0000-0000-4000-8000-000000000009",
                    "username": body["username"],
                    "message": "Login successful"
                })),
            )
                .into_response()
        }
        ("POST", "/api/auth/refresh") => error(StatusCode::UNAUTHORIZED, "Invalid refresh token"),
        ("POST", "/api/auth/logout") => (
            AppendHeaders([(header::SET_COOKIE, "access_token=\"\"; Max-Age=0; Path=/".to_string())]),
            Json(json!({ "message": "Logged out" })),
        )
            .into_response(),
        _ if !authed => error(StatusCode::UNAUTHORIZED, "Not authenticated"),

        ("POST", "/api/v1/captures") => (
            StatusCode::CREATED,
            Json(json!({
                "id": "c0ffee00-0000-4000-8000-000000000001",
                "text": body["text"],
                "source": body["source"],
                "processed": false,
                "deleted": false,
                "created_at": "2025-01-06T09:00:00Z",
                "updated_at": "2025-01-06T09:00:00Z"
            })),
        )
            .into_response(),
        ("GET", "/api/v1/captures/count") => Json(json!({ "count": 3 })).into_response(),
        ("GET", "/api/v1/journal/status") => Json(json!({
            "morning_pages_streak": 4,
            "daily_reflection_streak": 2,
            "entries_this_week": 5,
            "weekly_review_completed": false
        }))
        .into_response(),
        ("GET", "/api/v1/projects/slug/home") => Json(board()).into_response(),
        ("GET", p) if p == format!("/api/v1/projects/{PROJECT_ID}") => Json(board()).into_response(),
        ("PATCH", p) if p == format!("/api/v1/projects/tasks/{REPORT_ID}/move") => {
            let mut moved = task(
                REPORT_ID,
                "Write report",
                body["new_status"].as_str().unwrap_or("backlog"),
                body["sort_order"].as_i64().unwrap_or(0),
            );
            moved["completed_at"] = Value::Null;
            Json(moved).into_response()
        }
        ("GET", "/api/v1/calendar/events") => {
            let start = query_param(&uri, "start_date").unwrap_or("");
            let end = query_param(&uri, "end_date").unwrap_or("");
            // ISO dates compare correctly as strings
            let events: Vec<Value> = calendar()
                .into_iter()
                .filter(|e| {
                    let date = e["event_date"].as_str().unwrap_or("");
                    date >= start && date <= end
                })
                .collect();
            Json(json!({ "total": events.len(), "events": events })).into_response()
        }
        ("GET", p) if p.starts_with("/api/v1/calendar/events/") => {
            let id = &p["/api/v1/calendar/events/".len()..];
            match calendar().into_iter().find(|e| e["id"] == id) {
                Some(event) => Json(event).into_response(),
                None => error(StatusCode::NOT_FOUND, "Event not found"),
            }
        }
        _ => error(StatusCode::NOT_FOUND, "Not Found"),
    }
}
