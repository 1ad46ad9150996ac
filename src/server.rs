//! JSON HTTP API over a prebuilt recommender.
//!
//! The recommender is built once before the server binds and is shared by
//! all handlers as an `Arc<Recommender>`; queries are read-only, so no
//! locking is needed.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (version and corpus size) |
//! | `GET`  | `/recommend?title=..&top_n=..` | Ranked recommendations |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Sorry, the movie \"x\" was not found in the database." } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use cinematch_core::error::RecommendError;
use cinematch_core::recommend::Recommender;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::recommend_cmd::RecommendResponse;

#[derive(Clone)]
struct AppState {
    recommender: Arc<Recommender>,
    default_top_n: usize,
}

/// Build the router. Split out from [`run_server`] so tests and custom
/// binaries can mount it on their own listener.
pub fn router(recommender: Arc<Recommender>, default_top_n: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/recommend", get(handle_recommend))
        .layer(cors)
        .with_state(AppState {
            recommender,
            default_top_n,
        })
}

/// Bind to `[server].bind` and serve until the process is terminated.
pub async fn run_server(config: &Config, recommender: Arc<Recommender>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(recommender, config.recommend.default_top_n);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(bind = %bind_addr, "server listening");
    println!("cinematch listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        let status = match err {
            RecommendError::NotFound { .. } => StatusCode::NOT_FOUND,
            RecommendError::InvalidTopN => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let code = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal"
        } else {
            err.code()
        };
        AppError {
            status,
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    items: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        items: state.recommender.len(),
    })
}

// ============ GET /recommend ============

#[derive(Deserialize)]
struct RecommendParams {
    title: Option<String>,
    // Parsed by hand so a malformed value gets the JSON error body.
    top_n: Option<String>,
}

async fn handle_recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Response, AppError> {
    let title = params
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| bad_request("title must not be empty"))?;
    let top_n = match params.top_n.as_deref() {
        None => state.default_top_n,
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| bad_request("top_n must be a positive integer"))?,
    };

    let results = state.recommender.recommend(&title, top_n).map_err(|e| {
        tracing::debug!(query = %title, error = %e, "recommend failed");
        AppError::from(e)
    })?;

    let body = RecommendResponse {
        query: &title,
        results,
    };
    Ok(Json(body).into_response())
}
