use axum::{extract::Request, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::activity::WatchReportEngine;
use crate::auth::{auth_middleware, AuthService};
use crate::config::FrontendConfig;

use super::handlers::{dashboard_page, get_watch_history, health_check, index_page, AppState};
use super::static_files::serve_static;

pub fn create_api_router(
    engine: WatchReportEngine,
    auth_service: Arc<AuthService>,
    frontend: FrontendConfig,
) -> Router {
    let state = Arc::new(AppState { engine });

    let report_routes = Router::new()
        .route("/api/watch-history", get(get_watch_history))
        .route_layer(middleware::from_fn(move |headers, req, next| {
            let auth = Arc::clone(&auth_service);
            auth_middleware(auth, headers, req, next)
        }))
        .with_state(state);

    let static_dir = frontend.static_dir;

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(index_page))
        .route("/dashboard", get(dashboard_page))
        .route("/demo", get(dashboard_page))
        .merge(report_routes)
        .fallback(move |req: Request| {
            let static_dir = static_dir.clone();
            async move { serve_static(req.uri().clone(), static_dir).await }
        })
        .layer(CorsLayer::permissive())
}
