//! HTTP server exposing the address parser as JSON endpoints.
//!
//! | Route | Body | Response |
//! |-------|------|----------|
//! | `POST /parse` | `{text}` | `[{token, label}, ...]` without commas |
//! | `POST /tag` | `{text}` | `{label: text, ...}` |
//! | `POST /columns` | `{text, columns?}` | `{column: text \| null, ...}` |
//! | `GET /labels` | | known labels and their column names |
//! | `GET /health` | | `{model_loaded}` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use usaddr_core::labels::{default_columns, Component};
use usaddr_core::{AddressParser, Error as ParseError};

/// Server configuration, from flags or environment.
#[derive(Debug, Parser)]
#[command(name = "usaddr-web", version, about = "US address parsing over HTTP")]
struct Config {
    /// Path of the pretrained CRFsuite model.
    #[arg(long, env = "USADDR_MODEL", default_value = "usaddr.crfsuite")]
    model: PathBuf,
    /// Address to listen on.
    #[arg(long, env = "USADDR_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,
}

/// Shared application state
struct AppState {
    parser: AddressParser,
}

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Deserialize)]
struct ColumnsRequest {
    text: String,
    /// Defaults to one column per known label.
    #[serde(default)]
    columns: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct StreamEntry {
    token: String,
    label: String,
}

#[derive(Serialize)]
struct LabelInfo {
    label: &'static str,
    column: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    // A missing model is not fatal: requests answer 503 until it is fixed
    let parser = AddressParser::load(&config.model);
    info!(model = %config.model.display(), loaded = parser.has_model(), "address model");

    let state = Arc::new(AppState { parser });
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("usaddr server listening on http://{}", config.bind);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/parse", post(parse_handler))
        .route("/tag", post(tag_handler))
        .route("/columns", post(columns_handler))
        .route("/labels", get(labels_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Labeled tokens, commas removed
async fn parse_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<Vec<StreamEntry>>, ApiError> {
    let Json(req) = body?;
    info!("parse: {} chars", req.text.len());
    let labeled = run_blocking(state, move |parser| parser.parse(&req.text)).await?;

    Ok(Json(
        labeled
            .into_iter()
            .map(|lt| StreamEntry {
                token: lt.token.text,
                label: lt.label,
            })
            .collect(),
    ))
}

/// Label -> joined text
async fn tag_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = body?;
    info!("tag: {} chars", req.text.len());
    let grouped = run_blocking(state, move |parser| parser.tag(&req.text)).await?;
    Ok(Json(grouped.to_json()))
}

/// Column record over the requested (or default) columns
async fn columns_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ColumnsRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = body?;
    let columns = req.columns.unwrap_or_else(default_columns);
    info!("columns: {} chars, {} columns", req.text.len(), columns.len());
    let record =
        run_blocking(state, move |parser| parser.parse_columns(&req.text, &columns)).await?;
    Ok(Json(record.to_json()))
}

async fn labels_handler() -> impl IntoResponse {
    let labels: Vec<LabelInfo> = Component::all()
        .iter()
        .map(|c| LabelInfo {
            label: c.label(),
            column: c.column_name(),
        })
        .collect();
    Json(labels)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "model_loaded": state.parser.has_model() }))
}

/// Runs a parser call on the blocking pool (the pipeline is synchronous).
async fn run_blocking<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AddressParser) -> usaddr_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.parser))
        .await
        .map_err(ApiError::Join)?
        .map_err(ApiError::Parse)
}

#[derive(Debug)]
enum ApiError {
    Body(JsonRejection),
    Parse(ParseError),
    Join(tokio::task::JoinError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::Parse(err @ ParseError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Parse(err @ ParseError::ModelUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            ApiError::Parse(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Join(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        if status.is_server_error() {
            error!(%status, "{message}");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
