//! HTTP surface: router construction and request handlers.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use wingman_core::Principal;

use crate::auth::{extract_credentials, resolve_principal};
use crate::error::ApiError;
use crate::pipeline::Pipeline;
use crate::validate::AnalyzeRequestBody;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    /// Pool handle for the health probe; `None` in tests that run
    /// without a database.
    pub pool: Option<sqlx::PgPool>,
}

/// Parse the CORS origin whitelist.
///
/// # Environment Variable
/// `ALLOWED_ORIGINS` - Comma-separated list of allowed origins
///
/// Defaults to the production frontend plus localhost when unset or
/// empty.
pub fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "https://wingman-interview.app,http://localhost:3000".to_string());

    if origins_str.trim().is_empty() {
        return vec![
            HeaderValue::from_static("https://wingman-interview.app"),
            HeaderValue::from_static("http://localhost:3000"),
        ];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/analyze", post(analyze))
        .route("/api/v1/results/:session_id", get(get_results))
        .layer(TraceLayer::new_for_http())
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    header::HeaderName::from_static("x-api-key"),
                ])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600))
        })
        .with_state(state)
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health_check(State(state): State<AppState>) -> axum::response::Response {
    let database = match &state.pool {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => "connected",
            Err(_) => {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(serde_json::json!({
                        "status": "degraded",
                        "database": "unreachable",
                        "version": env!("CARGO_PKG_VERSION"),
                    })),
                )
                    .into_response();
            }
        },
        None => "not configured",
    };

    Json(serde_json::json!({
        "status": "healthy",
        "database": database,
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

/// Run the full analysis pipeline for one recording.
async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AnalyzeRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    let credentials = extract_credentials(&headers);
    let record = state.pipeline.run(&credentials, &body).await?;

    Ok(Json(serde_json::json!({
        "videoAnalysis": record.result_payload,
    })))
}

/// Fetch the most recent analysis for an interview session.
///
/// Requires the same credentials as `analyze`. Session principals see
/// only their own records; the shared key sees any.
async fn get_results(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let credentials = extract_credentials(&headers);
    let principal = resolve_principal(
        &credentials,
        state.pipeline.api_key_hash.as_deref(),
        &state.pipeline.sessions,
    )
    .await?;

    let record = state
        .pipeline
        .records
        .get_by_session(session_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("No analysis found for session {}", session_id))
        })?;

    if let Principal::Session { user_id } = principal {
        if record.user_id != user_id {
            return Err(ApiError::Forbidden(
                "Analysis belongs to another user".to_string(),
            ));
        }
    }

    Ok(Json(serde_json::json!({
        "videoAnalysis": record.result_payload,
    })))
}

// =============================================================================
// ROUTER TESTS
// =============================================================================
