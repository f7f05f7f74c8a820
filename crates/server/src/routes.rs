use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::roster::{Activity, RosterStore};

use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Snapshot of every activity with its current participant list.
async fn list_activities(State(store): State<Arc<RosterStore>>) -> Json<HashMap<String, Activity>> {
    Json(store.list().await)
}

async fn signup(
    State(store): State<Arc<RosterStore>>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    store.signup(&activity_name, &query.email).await?;
    Ok(Json(serde_json::json!({
        "message": format!("Signed up {} for {}", query.email, activity_name)
    })))
}

async fn unregister(
    State(store): State<Arc<RosterStore>>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    store.unregister(&activity_name, &query.email).await?;
    Ok(Json(serde_json::json!({
        "message": format!("Unregistered {} from {}", query.email, activity_name)
    })))
}

/// Build the full application router: API, health probe, and static frontend
pub fn build_router(store: Arc<RosterStore>, cors: CorsLayer) -> Router {
    // Static frontend (signup page); "/" lands there like the original site
    let site = Router::new()
        .route("/", get(|| async { Redirect::to("/static/index.html") }))
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", get(health));

    // API routes
    let api = Router::new()
        .route("/activities", get(list_activities))
        .route("/activities/:activity_name/signup", post(signup))
        .route("/activities/:activity_name/participants", delete(unregister));

    // Compose
    site.merge(api)
        .with_state(store)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
