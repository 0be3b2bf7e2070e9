#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::{Json, Router};
use lifeos_core::api::{ApiClient, HttpBackend, SessionStore};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const PASSWORD: &str = "correct horse";

/// One request as the fake backend saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

pub struct FakeState {
    pub requests: Mutex<Vec<Recorded>>,
    pub refresh_calls: AtomicUsize,
    pub refresh_fails: AtomicBool,
    pub fail_task_writes: AtomicBool,
    pub access_token: Mutex<String>,
    pub project_id: Uuid,
    pub board: Mutex<Value>,
    pub events: Mutex<Vec<Value>>,
}

/// In-process stand-in for the Life OS backend
pub struct FakeBackend {
    pub url: String,
    pub state: Arc<FakeState>,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let project_id = Uuid::new_v4();
        let state = Arc::new(FakeState {
            requests: Mutex::new(Vec::new()),
            refresh_calls: AtomicUsize::new(0),
            refresh_fails: AtomicBool::new(false),
            fail_task_writes: AtomicBool::new(false),
            access_token: Mutex::new("tok-0".to_string()),
            project_id,
            board: Mutex::new(sample_board(project_id)),
            events: Mutex::new(Vec::new()),
        });

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let app = Router::new().fallback(handle).with_state(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Client already holding a valid access cookie
    pub fn client(&self) -> ApiClient {
        let token = self.state.access_token.lock().unwrap().clone();
        self.client_with_token(&token)
    }

    pub fn client_with_token(&self, token: &str) -> ApiClient {
        let cookies = BTreeMap::from([("access_token".to_string(), token.to_string())]);
        ApiClient::with_session(&self.url, Arc::new(SessionStore::from_snapshot(cookies)))
            .expect("Failed to build client")
    }

    pub fn backend(&self) -> HttpBackend {
        HttpBackend::new(self.client())
    }

    /// Rotate the server-side token so every issued cookie is stale
    pub fn expire_session(&self) {
        *self.state.access_token.lock().unwrap() = "tok-rotated".to_string();
    }

    pub fn project_id(&self) -> Uuid {
        self.state.project_id
    }

    pub fn task_id(&self, title: &str) -> Uuid {
        let board = self.state.board.lock().unwrap();
        for lane in ["backlog", "in_progress", "completed"] {
            for task in board["tasks"][lane].as_array().unwrap() {
                if task["title"] == title {
                    return task["id"].as_str().unwrap().parse().unwrap();
                }
            }
        }
        panic!("no task titled {title}");
    }

    pub fn lane_titles(&self, lane: &str) -> Vec<String> {
        let board = self.state.board.lock().unwrap();
        board["tasks"][lane]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap().to_string())
            .collect()
    }

    pub fn add_event(&self, event: Value) {
        self.state.events.lock().unwrap().push(event);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Recorded requests with the given method whose path starts with `prefix`
    pub fn requests_to(&self, method: &str, prefix: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .collect()
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }
}

pub fn task_json(project_id: Uuid, title: &str, status: &str, sort_order: i64) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "project_id": project_id,
        "title": title,
        "description": null,
        "status": status,
        "sort_order": sort_order,
        "created_at": "2025-01-06T09:00:00Z",
        "updated_at": "2025-01-06T09:00:00Z",
        "completed_at": null
    })
}

pub fn event_json(id: Uuid, title: &str, date: &str, recurring: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "event_date": date,
        "start_time": "09:00:00",
        "end_time": "10:00:00",
        "is_recurring": recurring,
        "recurrence_pattern": if recurring { json!("weekly") } else { Value::Null },
        "recurrence_end_date": if recurring { json!("2025-03-31") } else { Value::Null },
        "series_id": if recurring { json!(Uuid::new_v4()) } else { Value::Null },
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-01T00:00:00"
    })
}

fn sample_board(project_id: Uuid) -> Value {
    json!({
        "id": project_id,
        "name": "Home",
        "slug": "home",
        "objective": "Keep the house running",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z",
        "tasks": {
            "backlog": [
                task_json(project_id, "Write report", "backlog", 0),
                task_json(project_id, "Book flights", "backlog", 1),
                task_json(project_id, "Renew passport", "backlog", 2),
            ],
            "in_progress": [task_json(project_id, "Fix bike", "in_progress", 0)],
            "completed": [task_json(project_id, "File taxes", "completed", 0)],
        },
        "notes": []
    })
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn access_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "access_token")
        .map(|(_, value)| value.to_string())
}

fn find_task(board: &mut Value, id: &str) -> Option<(String, Value)> {
    for lane in ["backlog", "in_progress", "completed"] {
        let tasks = board["tasks"][lane].as_array_mut()?;
        if let Some(index) = tasks.iter().position(|t| t["id"] == id) {
            return Some((lane.to_string(), tasks.remove(index)));
        }
    }
    None
}

fn sort_lane(board: &mut Value, lane: &str) {
    if let Some(tasks) = board["tasks"][lane].as_array_mut() {
        tasks.sort_by_key(|t| t["sort_order"].as_i64().unwrap_or_default());
    }
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body: body.clone(),
    });

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let method = method.as_str();

    if let ["api", "auth", action] = segments.as_slice() {
        return auth(&state, method, action, &body).await;
    }

    let valid = state.access_token.lock().unwrap().clone();
    if access_cookie(&headers).as_deref() != Some(valid.as_str()) {
        return error(StatusCode::UNAUTHORIZED, "Not authenticated");
    }

    match (method, segments.as_slice()) {
        ("GET", ["api", "v1", "calendar", "events"]) => {
            let events = state.events.lock().unwrap().clone();
            Json(json!({ "total": events.len(), "events": events })).into_response()
        }
        ("POST", ["api", "v1", "calendar", "events"]) => {
            let mut event = event_json(
                Uuid::new_v4(),
                body["title"].as_str().unwrap_or_default(),
                body["event_date"].as_str().unwrap_or("2025-01-06"),
                body["is_recurring"].as_bool().unwrap_or(false),
            );
            event["start_time"] = body["start_time"].clone();
            event["end_time"] = body["end_time"].clone();
            state.events.lock().unwrap().push(event.clone());
            (StatusCode::CREATED, Json(event)).into_response()
        }
        ("PATCH", ["api", "v1", "calendar", "events", id]) => {
            let id: Uuid = id.parse().unwrap_or_default();
            let event = event_json(
                id,
                body["title"].as_str().unwrap_or_default(),
                body["event_date"].as_str().unwrap_or("2025-01-06"),
                true,
            );
            Json(event).into_response()
        }
        ("DELETE", ["api", "v1", "calendar", "events", _]) => StatusCode::NO_CONTENT.into_response(),

        ("GET", ["api", "v1", "projects"]) => {
            let board = state.board.lock().unwrap().clone();
            Json(json!([board])).into_response()
        }
        ("GET", ["api", "v1", "projects", "slug", slug]) => {
            let board = state.board.lock().unwrap().clone();
            if board["slug"] == *slug {
                Json(board).into_response()
            } else {
                error(StatusCode::NOT_FOUND, "Project not found")
            }
        }
        ("PATCH", ["api", "v1", "projects", "tasks", id, "move"]) => {
            if state.fail_task_writes.load(Ordering::SeqCst) {
                return error(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
            }
            let mut board = state.board.lock().unwrap();
            let Some((_, mut task)) = find_task(&mut board, id) else {
                return error(StatusCode::NOT_FOUND, "Task not found");
            };
            let lane = body["new_status"].as_str().unwrap_or("backlog").to_string();
            task["status"] = json!(lane);
            task["sort_order"] = body["sort_order"].clone();
            task["completed_at"] = if lane == "completed" {
                json!("2025-01-07T10:00:00Z")
            } else {
                Value::Null
            };
            board["tasks"][&lane].as_array_mut().unwrap().push(task.clone());
            sort_lane(&mut board, &lane);
            Json(task).into_response()
        }
        ("DELETE", ["api", "v1", "projects", "tasks", id]) => {
            let mut board = state.board.lock().unwrap();
            match find_task(&mut board, id) {
                Some(_) => StatusCode::NO_CONTENT.into_response(),
                None => error(StatusCode::NOT_FOUND, "Task not found"),
            }
        }
        ("POST", ["api", "v1", "projects", _, "tasks", "reorder"]) => {
            if state.fail_task_writes.load(Ordering::SeqCst) {
                return error(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
            }
            let mut board = state.board.lock().unwrap();
            let lane = body["status"].as_str().unwrap_or("backlog").to_string();
            let order: Vec<String> = body["task_order"]
                .as_array()
                .map(|ids| ids.iter().filter_map(|id| id.as_str().map(str::to_string)).collect())
                .unwrap_or_default();
            for task in board["tasks"][&lane].as_array_mut().unwrap() {
                if let Some(index) = order.iter().position(|id| task["id"] == id.as_str()) {
                    task["sort_order"] = json!(index);
                }
            }
            sort_lane(&mut board, &lane);
            StatusCode::NO_CONTENT.into_response()
        }
        ("DELETE", ["api", "v1", "projects", _, "tasks", "completed"]) => {
            let mut board = state.board.lock().unwrap();
            let completed = board["tasks"]["completed"].as_array_mut().unwrap();
            let deleted = completed.len();
            completed.clear();
            Json(json!({ "deleted_count": deleted })).into_response()
        }
        ("POST", ["api", "v1", "projects", project_id, "tasks"]) => {
            let mut board = state.board.lock().unwrap();
            let lane = body["status"].as_str().unwrap_or("backlog").to_string();
            let tasks = board["tasks"][&lane].as_array_mut().unwrap();
            let project_id: Uuid = project_id.parse().unwrap_or_default();
            let task = task_json(
                project_id,
                body["title"].as_str().unwrap_or_default(),
                &lane,
                tasks.len() as i64,
            );
            tasks.push(task.clone());
            (StatusCode::CREATED, Json(task)).into_response()
        }
        ("GET", ["api", "v1", "projects", id]) => {
            let board = state.board.lock().unwrap().clone();
            if board["id"] == *id {
                Json(board).into_response()
            } else {
                error(StatusCode::NOT_FOUND, "Project not found")
            }
        }

        ("GET", ["api", "v1", "captures", "count"]) => Json(json!({ "count": 2 })).into_response(),
        ("GET", ["api", "v1", "journal", "status"]) => Json(json!({
            "morning_pages_streak": 4,
            "daily_reflection_streak": 2,
            "entries_this_week": 5,
            "weekly_review_completed": false
        }))
        .into_response(),
        ("GET", ["api", "v1", "workouts", "summary"]) => Json(json!({
            "active_program_name": "Push Pull Legs",
            "active_program_id": null,
            "next_day_label": "Push",
            "workouts_this_week": [],
            "has_active_session": false
        }))
        .into_response(),
        ("GET", ["api", "v1", "workouts", "sessions", "active"]) => {
            error(StatusCode::NOT_FOUND, "No active workout session")
        }
        _ => error(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn auth(state: &FakeState, method: &str, action: &str, body: &Value) -> Response {
    match (method, action) {
        ("POST", "login") => {
            if body["password"] != PASSWORD {
                return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
            }
            let token = state.access_token.lock().unwrap().clone();
            (
                AppendHeaders([
                    (header::SET_COOKIE, format!("access_token={token}; HttpOnly; Path=/")),
                    (header::SET_COOKIE, "refresh_token=r-1; HttpOnly; Path=/api/auth".to_string()),
                ]),
                Json(json!({
                    "user_id": Uuid::new_v4(),
                    "username": body["username"],
                    "message": "Login successful"
                })),
            )
                .into_response()
        }
        ("POST", "refresh") => {
            let call = state.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(Duration::from_millis(150)).await;
            if state.refresh_fails.load(Ordering::SeqCst) {
                return error(StatusCode::UNAUTHORIZED, "Invalid refresh token");
            }
            let token = format!("tok-{call}");
            *state.access_token.lock().unwrap() = token.clone();
            (
                AppendHeaders([(header::SET_COOKIE, format!("access_token={token}; HttpOnly; Path=/"))]),
                Json(json!({ "message": "Token refreshed" })),
            )
                .into_response()
        }
        ("POST", "logout") => (
            AppendHeaders([(header::SET_COOKIE, "access_token=\"\"; Max-Age=0; Path=/".to_string())]),
            Json(json!({ "message": "Logged out" })),
        )
            .into_response(),
        _ => error(StatusCode::NOT_FOUND, "Not Found"),
    }
}
