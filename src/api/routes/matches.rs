use axum::extract::{Path, State};
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{summarize_match, MatchSummary};
use crate::models::MatchId;

/// Scoreboard of a single match.
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<MatchSummary>, ApiError> {
    if match_id.trim().is_empty() {
        return Err(ApiError::BadRequest("match id must not be empty".to_string()));
    }

    let stats = state
        .source()
        .match_statistics(&MatchId::from(match_id))
        .await?;
    Ok(Json(summarize_match(&stats)))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::test_support::{get_json, mock_source, offline_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_get_match_summary() {
        let app = build_router(offline_state(mock_source()), "*");
        let (status, json) = get_json(app, "/api/matches/m1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["rounds"], 13);
        assert_eq!(json["map"], "Unknown");

        let teams = json["teams"].as_array().unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0]["win"], true);
        assert_eq!(teams[0]["players"][0]["nickname"], "p1");
        assert_eq!(teams[0]["players"][0]["kd_ratio"], 2.0);
    }

    #[tokio::test]
    async fn test_get_match_upstream_failure() {
        let source = mock_source().failing_statistics_for("m1");
        let app = build_router(offline_state(source), "*");
        let (status, json) = get_json(app, "/api/matches/m1").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "BAD_GATEWAY");
    }
}
