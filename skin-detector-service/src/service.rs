use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use skin_flow::{PredictRequest, PredictionResult, conditions};
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::{config::ServiceConfig, predict::Predictor};

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Data URLs of phone photos easily exceed axum's 2 MB default
pub const MAX_REQUEST_BYTES: usize = 20 * 1024 * 1024;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            predictor: Predictor::new(config.predict_delay),
        }
    }
}

pub fn create_app(config: &ServiceConfig) -> Router {
    build_router(AppState::new(config))
}

pub fn build_router(app_state: AppState) -> Router {
    with_middleware(api_routes()).with_state(app_state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/classes", get(classes))
        .route("/api/predict", post(predict))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
}

fn with_middleware(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(correlation_id_middleware))
}

/// Runs every request inside a span tagged with a fresh correlation ID, and
/// echoes the ID back to the caller
async fn correlation_id_middleware(mut request: Request<axum::body::Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&correlation_id).ok();

    if let Some(header) = &header {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(header) = header {
        response.headers_mut().insert(CORRELATION_ID_HEADER, header);
    }
    response
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(details = %details, "Handler panicked");
    internal_error().into_response()
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "SkinAI Detector",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Simulated skin lesion analysis. For educational purposes only.",
        "endpoints": {
            "POST /api/predict": "Analyze an uploaded image (data URL)",
            "GET /classes": "List the diagnoses the detector can report",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn classes() -> Json<Value> {
    Json(json!({ "classes": conditions::labels() }))
}

/// The body is read as JSON whatever the content type says. Only a body that
/// does not parse (or is a bare `null`) is a server error.
async fn predict(State(state): State<AppState>, body: Bytes) -> ApiResult<PredictionResult> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Prediction error");
        internal_error()
    })?;

    let Some(request) = PredictRequest::from_body(&payload) else {
        error!("Prediction error: request body is null");
        return Err(internal_error());
    };

    if !request.has_image() {
        warn!("Prediction requested without an image");
        return Err(bad_request_error("No image provided"));
    }

    info!(
        payload_len = body.len(),
        delay_ms = state.predictor.delay().as_millis() as u64,
        "Starting simulated analysis"
    );

    Ok(Json(state.predictor.predict().await))
}
