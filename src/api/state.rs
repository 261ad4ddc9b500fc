use std::sync::Arc;

use crate::fetch::{FaceitClient, HubDataSource};
use crate::sync::HubDashboard;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<HubDashboard>,
    /// Backs the proxy route, which always talks to the real API
    pub upstream: Arc<FaceitClient>,
}

impl AppState {
    pub fn new(dashboard: Arc<HubDashboard>, upstream: Arc<FaceitClient>) -> Self {
        Self {
            dashboard,
            upstream,
        }
    }

    pub fn source(&self) -> &dyn HubDataSource {
        self.dashboard.source().as_ref()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::fetch::mock::{statistics, MockSource};
    use crate::fetch::ClientConfig;
    use crate::models::MatchRoster;
    use crate::sync::LoadSettings;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    pub fn mock_source() -> MockSource {
        MockSource::new()
            .with_match(
                "m1",
                "FINISHED",
                MatchRoster::default(),
                statistics(
                    13,
                    &[
                        ("p1", true, &[("Kills", "10"), ("Deaths", "5"), ("ADR", "90")]),
                        ("p2", false, &[("Kills", "5"), ("Deaths", "10"), ("ADR", "60")]),
                    ],
                ),
            )
            .with_leaderboard(&[("p1", 20.0, 1), ("p2", 5.0, 2)])
    }

    pub fn test_state(source: MockSource, upstream: ClientConfig) -> AppState {
        let dashboard = HubDashboard::new(
            Arc::new(source),
            LoadSettings::new("hub").with_leaderboard("lb"),
        );
        let upstream = FaceitClient::new(upstream).unwrap();
        AppState::new(Arc::new(dashboard), Arc::new(upstream))
    }

    /// State whose proxy has no API key and an unreachable upstream.
    pub fn offline_state(source: MockSource) -> AppState {
        test_state(source, ClientConfig::new("http://127.0.0.1:9", None).unwrap())
    }

    pub async fn send(app: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        send(app, "GET", uri).await
    }
}
