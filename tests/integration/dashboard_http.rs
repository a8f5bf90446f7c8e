/// HTTP tests for the dashboard API, served in-process on an ephemeral port
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use habit_tracker::dashboard::{router, AppState, DashboardState};
use habit_tracker::motivation::{MotivationError, MotivationService, RetryPolicy, TextGenerator};
use habit_tracker::{format_date, read_json_or_default, today};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Generator that always answers with the habit list it was given
struct EchoGenerator {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, task_list: &str) -> Result<String, MotivationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Keep at it: {}", task_list))
    }
}

/// Generator that takes a while to answer
struct SlowGenerator {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, _task_list: &str) -> Result<String, MotivationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok("Worth the wait.".to_string())
    }
}

struct TestServer {
    base_url: String,
    dir: TempDir,
    calls: Arc<AtomicUsize>,
}

impl TestServer {
    fn data_path(&self) -> std::path::PathBuf {
        self.dir.path().join("dashboard.json")
    }
}

async fn spawn_server() -> TestServer {
    spawn_server_with(|calls| Box::new(EchoGenerator { calls }), None).await
}

/// Start a server with a custom generator and, optionally, a custom data path
async fn spawn_server_with(
    make_generator: impl FnOnce(Arc<AtomicUsize>) -> Box<dyn TextGenerator>,
    data_path: Option<std::path::PathBuf>,
) -> TestServer {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let calls = Arc::new(AtomicUsize::new(0));
    let motivation = MotivationService::new(
        make_generator(Arc::clone(&calls)),
        RetryPolicy { max_attempts: 3, base_delay: Duration::from_millis(1) },
    );
    let data_path = data_path.unwrap_or_else(|| dir.path().join("dashboard.json"));
    let state = AppState::new(data_path, DashboardState::new(today()), motivation);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind random port");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.expect("server failed");
    });

    TestServer {
        base_url: format!("http://{addr}"),
        dir,
        calls,
    }
}

#[tokio::test]
async fn test_dashboard_starts_with_starter_tasks() {
    let server = spawn_server().await;
    let body: Value = Client::new()
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["tasks"].as_array().unwrap().len(), 2);
    assert_eq!(body["config"]["total_days"], 7);
    assert_eq!(body["checklist"][0]["cells"].as_array().unwrap().len(), 1);
    assert_eq!(body["checklist"][0]["cells"][0]["is_today"], true);
}

#[tokio::test]
async fn test_add_check_and_export() {
    let server = spawn_server().await;
    let client = Client::new();
    let today = format_date(today());

    let resp = client
        .post(format!("{}/api/tasks", server.base_url))
        .json(&json!({"name": "  Read 10 pages  "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let task: Value = resp.json().await.unwrap();
    assert_eq!(task["name"], "Read 10 pages");

    for task_id in ["task-1", task["id"].as_str().unwrap()] {
        let resp = client
            .post(format!("{}/api/status", server.base_url))
            .json(&json!({"date": today, "task_id": task_id, "complete": true}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    let series: Value = client
        .get(format!("{}/api/series?view=week", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(series["period"], "Last 7 Days");
    assert_eq!(series["points"][0]["percentage"], 67);

    let resp = client
        .get(format!("{}/api/series.csv?view=all", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.contains("habit_tracker_completion_all.csv"));
    let csv = resp.text().await.unwrap();
    assert_eq!(csv, format!("Date,Completion (%)\n{},67\n", today));

    let saved: DashboardState = read_json_or_default(&server.data_path());
    assert_eq!(saved.tasks.len(), 3);
    assert_eq!(saved.daily_status.len(), 1);
}

#[tokio::test]
async fn test_validation_errors() {
    let server = spawn_server().await;
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/tasks", server.base_url))
        .json(&json!({"name": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.text().await.unwrap(), "Please enter a task name.");

    let resp = client
        .post(format!("{}/api/config", server.base_url))
        .json(&json!({"total_days": 400}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.text().await.unwrap(), "Total days must be between 1 and 365.");

    let resp = client
        .post(format!("{}/api/config", server.base_url))
        .json(&json!({"total_days": "lots"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.text().await.unwrap(), "Please enter a valid number for total days.");

    let tomorrow = format_date(today() + chrono::Duration::days(1));
    let resp = client
        .post(format!("{}/api/status", server.base_url))
        .json(&json!({"date": tomorrow, "task_id": "task-1", "complete": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.text().await.unwrap(), "Cannot check off future tasks.");

    let resp = client
        .delete(format!("{}/api/tasks/task-404", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // None of the rejected requests were persisted
    assert!(!server.data_path().exists());
}

#[tokio::test]
async fn test_config_accepts_numeric_string() {
    let server = spawn_server().await;
    let config: Value = Client::new()
        .post(format!("{}/api/config", server.base_url))
        .json(&json!({"total_days": "30"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(config["total_days"], 30);
    assert_eq!(config["start_date"], format_date(today()));
}

#[tokio::test]
async fn test_remove_task() {
    let server = spawn_server().await;
    let client = Client::new();

    let resp = client
        .delete(format!("{}/api/tasks/task-2", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let body: Value = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(body["tasks"][0]["id"], "task-1");
}

#[tokio::test]
async fn test_motivation_generated_once_per_day() {
    let server = spawn_server().await;
    let client = Client::new();

    for _ in 0..2 {
        let body: Value = client
            .get(format!("{}/api/motivation", server.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            body["text"],
            "Keep at it: Drink 8 Glasses of Water, 30 Minutes of Exercise"
        );
        assert_eq!(body["date"], format_date(today()));
    }
    assert_eq!(server.calls.load(Ordering::SeqCst), 1);

    let saved: DashboardState = read_json_or_default(&server.data_path());
    assert_eq!(saved.last_motivation_date, Some(today()));
}

#[tokio::test]
async fn test_concurrent_motivation_requests_generate_once() {
    let server = spawn_server_with(|calls| Box::new(SlowGenerator { calls }), None).await;
    let client = Client::new();
    let url = format!("{}/api/motivation", server.base_url);

    let (first, second) = tokio::join!(client.get(&url).send(), client.get(&url).send());
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let first: Value = first.json().await.unwrap();
    let second: Value = second.json().await.unwrap();
    assert_eq!(first["text"], "Worth the wait.");
    assert_eq!(second["text"], "Worth the wait.");
    assert_eq!(server.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_write_keeps_previous_state() {
    // A directory cannot be written as a file, so every save fails
    let blocked = TempDir::new().expect("Failed to create temp dir");
    let server = spawn_server_with(
        |calls| Box::new(EchoGenerator { calls }),
        Some(blocked.path().to_path_buf()),
    )
    .await;
    let client = Client::new();

    let resp = client
        .post(format!("{}/api/tasks", server.base_url))
        .json(&json!({"name": "Stretch"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = client
        .post(format!("{}/api/config", server.base_url))
        .json(&json!({"total_days": 30}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["tasks"].as_array().unwrap().len(), 2);
    assert_eq!(body["config"]["total_days"], 7);
}
