mod config;
mod state;
mod timer;
mod ws;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use config::ServerConfig;
use maze_core::GameConfig;
use maze_session::SessionSnapshot;
use serde::{Deserialize, Serialize};
use state::{AppState, KeyResponse, SharedState};
use std::time::Duration;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Request/Response types

#[derive(Debug, Default, Deserialize)]
struct NewMazeRequest {
    #[serde(default)]
    seed: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct KeyRequest {
    key: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize)]
struct NotFoundResponse {
    error: &'static str,
    available_endpoints: &'static [&'static str],
}

// Error type
enum AppError {
    Internal(String),
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", msg),
        };

        (
            status,
            Json(ErrorResponse {
                error,
                message: Some(message),
            }),
        )
            .into_response()
    }
}

// The game timer and every handler share one thread, so a tick can never
// interleave with a move.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting maze runner server");

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let state = match AppState::start(GameConfig::default(), config.seed) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let app = router(state.clone());

    tracing::info!("Binding to {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    state.shutdown();
    tracing::info!("Server stopped");
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/state", get(state_handler))
        .route("/api/new-maze", post(new_maze_handler))
        .route("/api/key", post(key_handler))
        .route("/api/maze.svg", get(svg_handler))
        .route("/ws", get(ws::ws_handler))
        .fallback(not_found_handler)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// GET /api/health
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        service: "maze-runner",
    })
}

/// GET /api/state
async fn state_handler(State(state): State<SharedState>) -> Json<SessionSnapshot> {
    Json(state.snapshot())
}

/// POST /api/new-maze
/// Start over on a fresh maze; an optional `{"seed": N}` body pins the maze
async fn new_maze_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<SessionSnapshot>, AppError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        NewMazeRequest::default()
    } else {
        serde_json::from_slice::<NewMazeRequest>(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid new-maze request: {}", e)))?
    };

    let snapshot = state.new_maze(request.seed);
    tracing::info!("New maze requested (seed {})", snapshot.seed);
    Ok(Json(snapshot))
}

/// POST /api/key
/// Feed one keyboard event into the game
async fn key_handler(State(state): State<SharedState>, body: Bytes) -> Result<Json<KeyResponse>, AppError> {
    let request: KeyRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid key request: {}", e)))?;
    Ok(Json(state.press_key(&request.key)))
}

/// GET /api/maze.svg
async fn svg_handler(State(state): State<SharedState>) -> Result<Response, AppError> {
    let svg = state.rendered_svg();
    if svg.is_empty() {
        return Err(AppError::Internal("Maze has not been rendered yet".to_string()));
    }

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not found",
            available_endpoints: &[
                "GET /api/health",
                "GET /api/state",
                "POST /api/new-maze",
                "POST /api/key",
                "GET /api/maze.svg",
                "GET /ws",
            ],
        }),
    )
}
