//! HTTP surface: routes, shared state and request authentication.

pub mod auth;
pub mod bills;
pub mod classes;
pub mod dashboard;
pub mod extract;
pub mod payments;
pub mod portal;
pub mod reports;
pub mod state;
pub mod students;
pub mod whatsapp;

#[cfg(test)]
mod tests;

pub use extract::{ApiJson, ApiQuery, AuthUser};
pub use state::AppState;

use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Build the application router with every route under `/api`.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/students", get(students::list).post(students::create))
        .route("/students/{id}", put(students::update).delete(students::delete))
        .route("/classes", get(classes::list).post(classes::create))
        .route("/classes/{id}", put(classes::update).delete(classes::delete))
        .route("/bills", get(bills::list))
        .route("/bills/generate", post(bills::generate))
        .route("/bills/{id}/confirm", put(bills::confirm))
        .route("/payments", get(payments::list).post(payments::create))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/reports/daily", get(reports::daily))
        .route("/reports/monthly", get(reports::monthly))
        .route("/reports/annual", get(reports::annual))
        .route("/reports/export-excel", get(reports::export_excel))
        .route("/reports/export-pdf", get(reports::export_pdf))
        .route("/whatsapp/send", post(whatsapp::send))
        .route("/student/profile/{id}", get(portal::profile))
        .route("/student/bills/{id}", get(portal::bills))
        .route("/student/payments/{id}", get(portal::payments));

    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "SPP System API" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(parsed))
}
