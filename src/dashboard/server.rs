/// JSON API for the dashboard
///
/// Handlers receive the shared `AppState`, lock the dashboard state, apply one
/// operation to a copy, persist the copy and only then swap it in. Rendering
/// is left to whatever front end consumes the API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::dashboard::{
    checklist, completion_series, csv_file_name, filter_view, to_csv, ChecklistRow,
    CompletionPoint, DashboardError, DashboardState, Task, TaskId, TrackerConfig,
};
use crate::domain::{self, GraphView};
use crate::motivation::MotivationService;
use crate::storage::persist_json;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<DashboardState>>,
    pub motivation: Arc<MotivationService>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: DashboardState, motivation: MotivationService) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            motivation: Arc::new(motivation),
        }
    }
}

/// Error returned by handlers: a status code plus a plain-text message
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        let status = match &err {
            DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
            DashboardError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::Storage(_) => {
                error!("dashboard storage failure: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub today: NaiveDate,
    pub config: TrackerConfig,
    pub tasks: Vec<Task>,
    pub checklist: Vec<ChecklistRow>,
    pub daily_motivation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub date: String,
    pub task_id: String,
    pub complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConfigRequest {
    /// Number or numeric string
    pub total_days: Value,
}

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    #[serde(default)]
    pub view: GraphView,
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub view: GraphView,
    pub period: &'static str,
    pub points: Vec<CompletionPoint>,
}

#[derive(Debug, Serialize)]
pub struct MotivationResponse {
    pub date: NaiveDate,
    pub text: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/tasks", post(add_task))
        .route("/api/tasks/:id", delete(remove_task))
        .route("/api/status", post(set_status))
        .route("/api/config", post(update_config))
        .route("/api/series", get(get_series))
        .route("/api/series.csv", get(export_series))
        .route("/api/motivation", get(get_motivation))
        .with_state(state)
}

/// Serve the dashboard API until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down dashboard");
        })
        .await
}

async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    let today = domain::today();
    let data = state.data.lock().await;
    Json(DashboardView {
        today,
        config: data.config,
        tasks: data.tasks.clone(),
        checklist: checklist(&data, today),
        daily_motivation: data.daily_motivation.clone(),
    })
}

async fn add_task(
    State(state): State<AppState>,
    Json(payload): Json<AddTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let task = next.add_task(&payload.name)?;
    commit(&state, &mut data, next).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn remove_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let id = TaskId(id);
    if !next.remove_task(&id) {
        return Err(DashboardError::TaskNotFound(id.to_string()).into());
    }
    commit(&state, &mut data, next).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_status(
    State(state): State<AppState>,
    Json(payload): Json<StatusRequest>,
) -> Result<StatusCode, AppError> {
    let date = domain::parse_date(&payload.date).map_err(|e| AppError::bad_request(e.to_string()))?;
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.set_task_status(date, &TaskId(payload.task_id), payload.complete, domain::today())?;
    commit(&state, &mut data, next).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_config(
    State(state): State<AppState>,
    Json(payload): Json<ConfigRequest>,
) -> Result<Json<TrackerConfig>, AppError> {
    let total_days = match &payload.total_days {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AppError::bad_request("Please enter a valid number for total days."))?;

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.update_config(total_days, domain::today())?;
    commit(&state, &mut data, next).await?;
    Ok(Json(data.config))
}

async fn get_series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> Json<SeriesResponse> {
    let data = state.data.lock().await;
    let series = completion_series(&data, domain::today());
    Json(SeriesResponse {
        view: query.view,
        period: query.view.period_label(),
        points: filter_view(&series, query.view),
    })
}

async fn export_series(
    State(state): State<AppState>,
    Query(query): Query<SeriesQuery>,
) -> impl IntoResponse {
    let data = state.data.lock().await;
    let series = completion_series(&data, domain::today());
    let csv = to_csv(&filter_view(&series, query.view));
    let disposition = format!("attachment; filename=\"{}\"", csv_file_name(query.view));

    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
}

async fn get_motivation(State(state): State<AppState>) -> Result<Json<MotivationResponse>, AppError> {
    let today = domain::today();

    let task_list = {
        let data = state.data.lock().await;
        if !data.needs_motivation(today) {
            if let Some(text) = data.daily_motivation.clone() {
                return Ok(Json(MotivationResponse { date: today, text }));
            }
        }
        data.task_list()
    };

    // The lock is not held across the outbound request
    let text = state.motivation.daily_motivation(today, &task_list).await;

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.apply_motivation(text.clone(), today);
    commit(&state, &mut data, next).await?;
    Ok(Json(MotivationResponse { date: today, text }))
}

/// Persist `next` and replace the live state with it
async fn commit(
    state: &AppState,
    data: &mut DashboardState,
    next: DashboardState,
) -> Result<(), DashboardError> {
    persist_json(&state.data_path, &next).await?;
    *data = next;
    Ok(())
}
