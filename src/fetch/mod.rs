//! FACEIT Data API access.
//!
//! `HubDataSource` is the seam between the load pipeline and the network:
//! `FaceitClient` implements it over HTTP, tests use `mock::MockSource`.
//! The same client also backs the credential-injecting proxy route.

#[cfg(test)]
pub mod mock;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::{
    HubId, HubMatchesResponse, LeaderboardId, LeaderboardResponse, MatchId, MatchRoster,
    MatchStatistics,
};

/// Errors that can occur while talking to the upstream API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("FACEIT API key not configured")]
    MissingApiKey,
}

/// One upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamRequest {
    HubMatches {
        hub_id: HubId,
        offset: u32,
        limit: u32,
    },
    MatchMeta {
        match_id: MatchId,
    },
    MatchStats {
        match_id: MatchId,
    },
    Leaderboard {
        leaderboard_id: LeaderboardId,
    },
}

impl UpstreamRequest {
    /// Resolve against the API base URL. Path segments are percent-encoded.
    pub fn url(&self, base: &Url) -> Result<Url, FetchError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FetchError::InvalidUrl(base.to_string()))?;
            segments.pop_if_empty();
            match self {
                UpstreamRequest::HubMatches { hub_id, .. } => {
                    segments.extend(["hubs", hub_id.as_str(), "matches"]);
                }
                UpstreamRequest::MatchMeta { match_id } => {
                    segments.extend(["matches", match_id.as_str()]);
                }
                UpstreamRequest::MatchStats { match_id } => {
                    segments.extend(["matches", match_id.as_str(), "stats"]);
                }
                UpstreamRequest::Leaderboard { leaderboard_id } => {
                    segments.extend(["leaderboards", leaderboard_id.as_str()]);
                }
            }
        }

        if let UpstreamRequest::HubMatches { offset, limit, .. } = self {
            url.query_pairs_mut()
                .append_pair("type", "past")
                .append_pair("offset", &offset.to_string())
                .append_pair("limit", &limit.to_string());
        }

        Ok(url)
    }
}

/// Upstream response relayed untouched.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub body: String,
}

/// Source of raw hub data.
#[async_trait]
pub trait HubDataSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// One page of past hub matches, any status.
    async fn list_hub_matches(
        &self,
        hub_id: &HubId,
        offset: u32,
        limit: u32,
    ) -> Result<HubMatchesResponse, FetchError>;

    /// Match metadata with team rosters.
    async fn match_roster(&self, match_id: &MatchId) -> Result<MatchRoster, FetchError>;

    /// Match statistics snapshot.
    async fn match_statistics(&self, match_id: &MatchId) -> Result<MatchStatistics, FetchError>;

    /// Leaderboard standings.
    async fn leaderboard(
        &self,
        leaderboard_id: &LeaderboardId,
    ) -> Result<LeaderboardResponse, FetchError>;
}

/// Configuration for the FACEIT client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://open.faceit.com/data/v4`
    pub base_url: Url,

    /// Sent as a bearer token when present
    pub api_key: Option<String>,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(30),
            user_agent: format!("hub-stats/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the FACEIT Data API.
pub struct FaceitClient {
    client: Client,
    config: ClientConfig,
}

impl FaceitClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("hub-stats")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        let builder = self.client.get(url);
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, request: UpstreamRequest) -> Result<T, FetchError> {
        let url = request.url(&self.config.base_url)?;
        debug!("Fetching {}", url);

        let response = self.request(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a request with the API key and return status and body as is.
    ///
    /// Non-2xx statuses are not errors here; only transport failures are.
    pub async fn forward(&self, request: &UpstreamRequest) -> Result<ForwardedResponse, FetchError> {
        if self.config.api_key.is_none() {
            return Err(FetchError::MissingApiKey);
        }
        let url = request.url(&self.config.base_url)?;
        debug!("Forwarding to {}", url);

        let response = self.request(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ForwardedResponse { status, body })
    }
}

#[async_trait]
impl HubDataSource for FaceitClient {
    fn name(&self) -> &'static str {
        "faceit"
    }

    async fn list_hub_matches(
        &self,
        hub_id: &HubId,
        offset: u32,
        limit: u32,
    ) -> Result<HubMatchesResponse, FetchError> {
        self.get_json(UpstreamRequest::HubMatches {
            hub_id: hub_id.clone(),
            offset,
            limit,
        })
        .await
    }

    async fn match_roster(&self, match_id: &MatchId) -> Result<MatchRoster, FetchError> {
        self.get_json(UpstreamRequest::MatchMeta {
            match_id: match_id.clone(),
        })
        .await
    }

    async fn match_statistics(&self, match_id: &MatchId) -> Result<MatchStatistics, FetchError> {
        self.get_json(UpstreamRequest::MatchStats {
            match_id: match_id.clone(),
        })
        .await
    }

    async fn leaderboard(
        &self,
        leaderboard_id: &LeaderboardId,
    ) -> Result<LeaderboardResponse, FetchError> {
        self.get_json(UpstreamRequest::Leaderboard {
            leaderboard_id: leaderboard_id.clone(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://open.faceit.com/data/v4").unwrap()
    }

    #[test]
    fn test_hub_matches_url() {
        let url = UpstreamRequest::HubMatches {
            hub_id: "f1137391".into(),
            offset: 0,
            limit: 100,
        }
        .url(&base())
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://open.faceit.com/data/v4/hubs/f1137391/matches?type=past&offset=0&limit=100"
        );
    }

    #[test]
    fn test_match_urls() {
        let meta = UpstreamRequest::MatchMeta {
            match_id: "1-abc".into(),
        }
        .url(&base())
        .unwrap();
        let stats = UpstreamRequest::MatchStats {
            match_id: "1-abc".into(),
        }
        .url(&base())
        .unwrap();

        assert_eq!(meta.as_str(), "https://open.faceit.com/data/v4/matches/1-abc");
        assert_eq!(stats.as_str(), "https://open.faceit.com/data/v4/matches/1-abc/stats");
    }

    #[test]
    fn test_leaderboard_url_with_trailing_slash_base() {
        let base = Url::parse("https://open.faceit.com/data/v4/").unwrap();
        let url = UpstreamRequest::Leaderboard {
            leaderboard_id: "69319308".into(),
        }
        .url(&base)
        .unwrap();

        assert_eq!(url.as_str(), "https://open.faceit.com/data/v4/leaderboards/69319308");
    }

    #[test]
    fn test_ids_are_path_encoded() {
        let url = UpstreamRequest::MatchMeta {
            match_id: "../hubs/x".into(),
        }
        .url(&base())
        .unwrap();

        assert_eq!(url.path(), "/data/v4/matches/..%2Fhubs%2Fx");
    }

    #[test]
    fn test_client_config_rejects_bad_url() {
        assert!(matches!(
            ClientConfig::new("not a url", None),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::new("https://open.faceit.com/data/v4", Some("key".into()))
            .unwrap()
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.user_agent.starts_with("hub-stats/"));

        let client = FaceitClient::new(config).unwrap();
        assert!(client.has_api_key());
    }

    #[tokio::test]
    async fn test_forward_requires_api_key() {
        let config = ClientConfig::new("https://open.faceit.com/data/v4", None).unwrap();
        let client = FaceitClient::new(config).unwrap();
        let result = client
            .forward(&UpstreamRequest::MatchMeta {
                match_id: "m1".into(),
            })
            .await;

        assert!(matches!(result, Err(FetchError::MissingApiKey)));
    }
}
