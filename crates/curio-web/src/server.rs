//! HTTP surface: the single page plus a small JSON API.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use curio_agents::{Crew, TaskInputs};
use curio_core::{Error, PersonalizedContent};

use crate::render::{generation_error, render_page, Outcome, NO_INPUT_WARNING, NO_RESULT_ERROR};

#[derive(Clone)]
pub struct AppState {
    pub crew: Arc<Crew>,
    pub queries: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(crew: Crew, queries: Vec<String>) -> Self {
        Self {
            crew: Arc::new(crew),
            queries: Arc::new(queries),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/health", get(|| async { "OK" }))
        .route("/api/queries", get(list_queries))
        .route("/api/generate", post(api_generate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the process is stopped.
pub async fn serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", bind, e))?;
    info!(address = %listener.local_addr()?, "Serving personalized content generator");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub query: String,
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.queries, None, &Outcome::Idle))
}

async fn generate(State(state): State<AppState>, Form(form): Form<GenerateForm>) -> Html<String> {
    let query = form.query.trim();
    let outcome = if query.is_empty() {
        Outcome::no_input()
    } else {
        let result = state.crew.run(&TaskInputs::query(query)).await;
        if let Err(e) = &result {
            warn!(query = %query, error = %e, "Content generation failed");
        }
        Outcome::from_result(result)
    };

    let selected = (!query.is_empty()).then_some(query);
    Html(render_page(&state.queries, selected, &outcome))
}

async fn list_queries(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.queries.as_ref().clone())
}

/// JSON error body for the API routes.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

async fn api_generate(
    State(state): State<AppState>,
    Json(form): Json<GenerateForm>,
) -> Result<Json<PersonalizedContent>, ApiError> {
    let query = form.query.trim();
    if query.is_empty() {
        return Err(ApiError {
            status: StatusCode::BAD_REQUEST,
            message: NO_INPUT_WARNING.to_string(),
        });
    }

    state
        .crew
        .run(&TaskInputs::query(query))
        .await
        .map(Json)
        .map_err(|e| {
            warn!(query = %query, error = %e, "Content generation failed");
            let message = match e {
                Error::EmptyResult => NO_RESULT_ERROR.to_string(),
                other => generation_error(&other),
            };
            ApiError {
                status: StatusCode::BAD_GATEWAY,
                message,
            }
        })
}
