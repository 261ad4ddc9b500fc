use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::models::HubSnapshot;
use crate::sync::LoadState;

#[derive(Debug, Serialize)]
pub struct StatsResponse<'a> {
    pub state: LoadState,
    /// Null until the first load succeeds
    pub snapshot: Option<&'a HubSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub generation: u64,
    pub state: LoadState,
}

pub async fn get_stats(State(state): State<AppState>) -> Response {
    let load = state.dashboard.load_state().await;
    let snapshot = state.dashboard.snapshot().await;
    Json(StatsResponse {
        state: load,
        snapshot: snapshot.as_deref(),
    })
    .into_response()
}

/// Start a new load, superseding any running one.
pub async fn reload(State(state): State<AppState>) -> impl IntoResponse {
    let generation = state.dashboard.spawn_reload().await;
    let load = state.dashboard.load_state().await;
    (
        StatusCode::ACCEPTED,
        Json(ReloadResponse {
            generation,
            state: load,
        }),
    )
}

pub async fn status(State(state): State<AppState>) -> Json<LoadState> {
    Json(state.dashboard.load_state().await)
}
