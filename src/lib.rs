// src/lib.rs

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc};

/// Monta o router completo da aplicação.
pub fn build_router(app_state: AppState) -> Router {
    // O dashboard roda no navegador, em outra origem
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let dashboard_routes = Router::new()
        .route("/report", get(handlers::dashboard::get_report))
        .route("/report/latest", get(handlers::dashboard::get_latest_report));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
