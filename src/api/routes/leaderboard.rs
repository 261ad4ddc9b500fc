use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::Standings;

/// Standings of the configured leaderboard.
pub async fn get_leaderboard(State(state): State<AppState>) -> Result<Json<Standings>, ApiError> {
    let Some(leaderboard_id) = state.dashboard.settings().leaderboard_id.clone() else {
        return Err(ApiError::NotFound("No leaderboard configured".to_string()));
    };

    let response = state.source().leaderboard(&leaderboard_id).await?;
    Ok(Json(Standings::new(leaderboard_id, &response)))
}
