//! Credential-injecting pass-through to the FACEIT Data API.
//!
//! Errors here use a flat `{"error": "..."}` body, which browser clients of
//! the proxy already expect.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::api::state::AppState;
use crate::fetch::UpstreamRequest;

const DEFAULT_OFFSET: u32 = 0;
const DEFAULT_LIMIT: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ProxyParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "hubId")]
    pub hub_id: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "matchId")]
    pub match_id: Option<String>,
    #[serde(rename = "leaderboardId")]
    pub leaderboard_id: Option<String>,
}

/// Empty values count as missing.
fn required<'a>(value: &'a Option<String>, message: &'static str) -> Result<&'a str, &'static str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(message)
}

fn number_or(value: &Option<String>, default: u32, message: &'static str) -> Result<u32, &'static str> {
    match value.as_deref().filter(|v| !v.is_empty()) {
        Some(raw) => raw.trim().parse().map_err(|_| message),
        None => Ok(default),
    }
}

impl ProxyParams {
    /// Resolve the query into an upstream request, or the client error message.
    pub fn to_request(&self) -> Result<UpstreamRequest, &'static str> {
        match self.kind.as_deref() {
            Some("hubMatches") => {
                let hub_id = required(&self.hub_id, "Missing hubId")?;
                Ok(UpstreamRequest::HubMatches {
                    hub_id: hub_id.into(),
                    offset: number_or(&self.offset, DEFAULT_OFFSET, "Invalid offset")?,
                    limit: number_or(&self.limit, DEFAULT_LIMIT, "Invalid limit")?,
                })
            }
            Some("matchMeta") => Ok(UpstreamRequest::MatchMeta {
                match_id: required(&self.match_id, "Missing matchId")?.into(),
            }),
            Some("matchStats") => Ok(UpstreamRequest::MatchStats {
                match_id: required(&self.match_id, "Missing matchId")?.into(),
            }),
            Some("matchLeaderboard") => Ok(UpstreamRequest::Leaderboard {
                leaderboard_id: required(&self.leaderboard_id, "Missing leaderboardId")?.into(),
            }),
            _ => Err("Unknown type"),
        }
    }
}

fn proxy_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

pub async fn faceit_proxy(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Response {
    if !state.upstream.has_api_key() {
        return proxy_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "FACEIT_API_KEY not configured",
        );
    }

    let request = match params.to_request() {
        Ok(request) => request,
        Err(message) => return proxy_error(StatusCode::BAD_REQUEST, message),
    };

    match state.upstream.forward(&request).await {
        Ok(forwarded) => {
            let status = StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                forwarded.body,
            )
                .into_response()
        }
        Err(e) => {
            error!("FACEIT proxy error: {}", e);
            proxy_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch from FACEIT",
            )
        }
    }
}
