//! Opaque identifiers issued by the upstream stats API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An identifier as issued by FACEIT (player, match, hub or leaderboard).
///
/// Upstream ids are compared byte-for-byte; no case folding or trimming.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpstreamId(String);

impl UpstreamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UpstreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for UpstreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UpstreamId({})", self.0)
    }
}

impl From<String> for UpstreamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UpstreamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type alias for player IDs
pub type PlayerId = UpstreamId;

/// Type alias for match IDs
pub type MatchId = UpstreamId;

/// Type alias for hub IDs
pub type HubId = UpstreamId;

/// Type alias for leaderboard IDs
pub type LeaderboardId = UpstreamId;
