// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Router assembly and shared request state.

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tt_core::Clock;
use tt_storage::JobStore;

use crate::routes;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn JobStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins.iter().filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// The full HTTP surface.
pub fn router(state: AppState, origins: &[String]) -> Router {
    Router::new()
        .route("/jobs", post(routes::jobs::create_job).get(routes::jobs::list_jobs))
        .route("/jobs/:job_id", get(routes::jobs::get_job))
        .route("/jobs/:job_id/input", post(routes::jobs::provide_input))
        .route("/jobs/:job_id/cancel", post(routes::jobs::cancel_job))
        .route("/jobs/:job_id/resume", post(routes::jobs::resume_job))
        .route("/settings", get(routes::settings::get_settings))
        .route("/settings/music-library-path", put(routes::settings::update_music_library_path))
        .layer(cors_layer(origins))
        .with_state(state)
}
