//! Shared fixtures for the in-file tests: loopback mock servers built
//! on axum, pre-wired clients, and sample wire objects.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::types::{Task, TaskList, TaskPriority, User};
use crate::client::TaskboardClient;
use crate::config::ClientConfig;
use crate::session::{SessionEvents, SessionManager, SessionTokens};
use crate::storage::MemoryTokenStore;

/// Serve a router on an ephemeral loopback port.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn config_for(addr: SocketAddr) -> ClientConfig {
    let mut config = ClientConfig::new(&format!("http://{}", addr)).unwrap();
    config.request_timeout = Duration::from_secs(5);
    config.refresh_timeout = Duration::from_secs(5);
    config
}

pub fn logged_out_client(addr: SocketAddr) -> TaskboardClient {
    TaskboardClient::with_store(&config_for(addr), Arc::new(MemoryTokenStore::new())).unwrap()
}

pub fn logged_in_client(addr: SocketAddr, access: &str, refresh: &str) -> TaskboardClient {
    let store = Arc::new(MemoryTokenStore::with_tokens(SessionTokens::new(
        access, refresh,
    )));
    TaskboardClient::with_store(&config_for(addr), store).unwrap()
}

/// Counting [`SessionEvents`] listener.
#[derive(Default)]
pub struct RecordedEvents {
    pub expired: AtomicUsize,
}

#[async_trait]
impl SessionEvents for RecordedEvents {
    async fn on_session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn logged_in_client_with_events(
    addr: SocketAddr,
    access: &str,
    refresh: &str,
) -> (TaskboardClient, Arc<RecordedEvents>) {
    let store = Arc::new(MemoryTokenStore::with_tokens(SessionTokens::new(
        access, refresh,
    )));
    let events = Arc::new(RecordedEvents::default());
    let session = Arc::new(SessionManager::new(store).with_events(events.clone()));
    let client = TaskboardClient::with_session(&config_for(addr), session).unwrap();
    (client, events)
}

/// Mock auth backend with a rotating access token.
///
/// `GET /api/auth/me/` accepts exactly one bearer token at a time;
/// `POST /api/auth/token/refresh/` rotates it to `next_access` when it
/// is handed the expected refresh token. Knobs cover the failure modes
/// the transport has to survive: a refresh endpoint that rejects the
/// session, a slow refresh, and a refresh that grants a token the API
/// then refuses (`grant_unusable_access`), which is how a second 401
/// on the retried request is provoked.
#[derive(Clone)]
pub struct AuthMock {
    valid_access: Arc<Mutex<String>>,
    valid_refresh: String,
    next_access: String,
    pub me_calls: Arc<AtomicUsize>,
    pub refresh_calls: Arc<AtomicUsize>,
    pub refresh_delay: Arc<Mutex<Duration>>,
    pub refresh_fails: Arc<AtomicBool>,
    pub grant_unusable_access: Arc<AtomicBool>,
}

impl AuthMock {
    pub fn new(valid_access: &str, valid_refresh: &str, next_access: &str) -> Self {
        Self {
            valid_access: Arc::new(Mutex::new(valid_access.to_string())),
            valid_refresh: valid_refresh.to_string(),
            next_access: next_access.to_string(),
            me_calls: Arc::new(AtomicUsize::new(0)),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
            refresh_delay: Arc::new(Mutex::new(Duration::ZERO)),
            refresh_fails: Arc::new(AtomicBool::new(false)),
            grant_unusable_access: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn router(&self) -> Router {
        let me = self.clone();
        let login = self.clone();
        let refresh = self.clone();
        Router::new()
            .route(
                "/api/auth/me/",
                get(move |headers: HeaderMap| {
                    let mock = me.clone();
                    async move {
                        mock.me_calls.fetch_add(1, Ordering::SeqCst);
                        let expected = format!("Bearer {}", mock.valid_access.lock().unwrap());
                        let presented = headers
                            .get(header::AUTHORIZATION)
                            .and_then(|value| value.to_str().ok());
                        if presented == Some(expected.as_str()) {
                            Json(serde_json::to_value(sample_user()).unwrap()).into_response()
                        } else {
                            (
                                StatusCode::UNAUTHORIZED,
                                Json(json!({"detail": "Given token not valid for any token type"})),
                            )
                                .into_response()
                        }
                    }
                }),
            )
            .route(
                "/api/auth/login/",
                post(move |Json(body): Json<Value>| {
                    let mock = login.clone();
                    async move {
                        let email = body.get("email").and_then(Value::as_str);
                        let password = body.get("password").and_then(Value::as_str);
                        if email == Some("ada@example.com") && password == Some("correct-horse") {
                            let access = mock.valid_access.lock().unwrap().clone();
                            Json(json!({
                                "message": "Login successful",
                                "user": serde_json::to_value(sample_user()).unwrap(),
                                "tokens": {"access": access, "refresh": mock.valid_refresh},
                            }))
                            .into_response()
                        } else {
                            (
                                StatusCode::BAD_REQUEST,
                                Json(json!({"non_field_errors": ["Invalid credentials"]})),
                            )
                                .into_response()
                        }
                    }
                }),
            )
            .route(
                "/api/auth/token/refresh/",
                post(move |Json(body): Json<Value>| {
                    let mock = refresh.clone();
                    async move {
                        mock.refresh_calls.fetch_add(1, Ordering::SeqCst);
                        let delay = *mock.refresh_delay.lock().unwrap();
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        let presented = body.get("refresh").and_then(Value::as_str);
                        if mock.refresh_fails.load(Ordering::SeqCst)
                            || presented != Some(mock.valid_refresh.as_str())
                        {
                            return (
                                StatusCode::UNAUTHORIZED,
                                Json(json!({"detail": "Token is invalid or expired"})),
                            )
                                .into_response();
                        }
                        if !mock.grant_unusable_access.load(Ordering::SeqCst) {
                            *mock.valid_access.lock().unwrap() = mock.next_access.clone();
                        }
                        Json(json!({"access": mock.next_access})).into_response()
                    }
                }),
            )
    }
}

// ==================== Sample wire objects ====================

pub fn sample_user() -> User {
    User {
        id: Uuid::new_v4(),
        email: "ada@example.com".to_string(),
        username: "ada".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        full_name: Some("Ada Lovelace".to_string()),
        avatar: None,
        bio: None,
        date_joined: Some(Utc::now()),
        last_login: None,
    }
}

pub fn sample_list(project: Uuid, name: &str, position: u32) -> TaskList {
    TaskList {
        id: Uuid::new_v4(),
        name: name.to_string(),
        project,
        project_name: String::new(),
        position,
        is_archived: false,
        tasks: Some(Vec::new()),
        tasks_count: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_task(list: Uuid, title: &str, position: u32) -> Task {
    Task {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        task_list: list,
        task_list_name: String::new(),
        project_name: String::new(),
        position,
        priority: TaskPriority::default(),
        due_date: None,
        is_completed: false,
        is_archived: false,
        is_overdue: false,
        completed_at: None,
        label_color: None,
        assignees: Vec::new(),
        assignees_count: 0,
        assignees_details: Vec::new(),
        creator: None,
        creator_email: None,
        comments: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Append a fresh task to a list's embedded tasks and count.
pub fn push_task(list: &mut TaskList, title: &str, position: u32) -> Uuid {
    let task = sample_task(list.id, title, position);
    let id = task.id;
    list.tasks.get_or_insert_with(Vec::new).push(task);
    list.tasks_count += 1;
    id
}
