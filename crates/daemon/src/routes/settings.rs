// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application settings endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tt_storage::{resolve_library_root, set_library_root, SettingsError, SettingsSource};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub music_library_path: String,
    pub source: SettingsSource,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMusicLibraryRequest {
    pub path: String,
}

/// GET /settings
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<SettingsResponse>> {
    let (path, source) = resolve_library_root(state.store.as_ref())
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(SettingsResponse {
        music_library_path: path.to_string_lossy().into_owned(),
        source,
    }))
}

/// PUT /settings/music-library-path
pub async fn update_music_library_path(
    State(state): State<AppState>,
    Json(payload): Json<UpdateMusicLibraryRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    set_library_root(state.store.as_ref(), &payload.path).map_err(|e| match e {
        SettingsError::Store(inner) => ApiError::from(inner),
        validation => ApiError::bad_request(validation.to_string()),
    })?;

    get_settings(State(state)).await
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
