//! Hub load pipeline.
//!
//! A load runs in four stages:
//! 1. List the hub's past matches and keep the finished ones
//! 2. Fetch roster and statistics per match, a bounded number at a time
//! 3. Fold the matches into per-player totals, in listing order
//! 4. Merge the leaderboard, then sort and rank the table
//!
//! `HubDashboard` owns the published snapshot. Every load takes a generation
//! from `LoadCoordinator`; only the latest generation may publish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::AbortHandle;
use tokio::time::interval;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::calculate::{merge_leaderboard, rank_players, PlayerTable};
use crate::config::AppConfig;
use crate::fetch::{FetchError, HubDataSource};
use crate::models::{
    HubId, HubSnapshot, LeaderboardId, LoadWarning, MatchId, MatchRoster, MatchStatistics,
};

/// Errors that abort a load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load hub matches")]
    MatchList(#[source] FetchError),

    #[error("failed to load match statistics")]
    MatchStatistics {
        match_id: MatchId,
        #[source]
        source: FetchError,
    },
}

/// What a load needs to know about the hub.
#[derive(Debug, Clone)]
pub struct LoadSettings {
    pub hub_id: HubId,
    pub leaderboard_id: Option<LeaderboardId>,
    pub max_matches: u32,
    pub max_concurrent_matches: usize,
}

impl LoadSettings {
    pub fn new(hub_id: impl Into<HubId>) -> Self {
        Self {
            hub_id: hub_id.into(),
            leaderboard_id: None,
            max_matches: 100,
            max_concurrent_matches: 4,
        }
    }

    pub fn with_leaderboard(mut self, leaderboard_id: impl Into<LeaderboardId>) -> Self {
        self.leaderboard_id = Some(leaderboard_id.into());
        self
    }

    pub fn with_concurrency(mut self, max_concurrent_matches: usize) -> Self {
        self.max_concurrent_matches = max_concurrent_matches.max(1);
        self
    }
}

impl From<&AppConfig> for LoadSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            hub_id: HubId::from(config.hub.hub_id.as_str()),
            leaderboard_id: config
                .hub
                .leaderboard_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .map(LeaderboardId::from),
            max_matches: config.hub.max_matches,
            max_concurrent_matches: config.upstream.max_concurrent_matches.max(1),
        }
    }
}

/// Roster and statistics of one match, fetched together.
async fn fetch_match(
    source: &dyn HubDataSource,
    match_id: MatchId,
) -> Result<(MatchRoster, MatchStatistics), LoadError> {
    debug!("Fetching match {}", match_id);
    let fetched = tokio::try_join!(
        source.match_roster(&match_id),
        source.match_statistics(&match_id)
    );
    fetched.map_err(|source| LoadError::MatchStatistics { match_id, source })
}

/// Run one full load against `source`.
pub async fn load_hub_snapshot(
    source: &dyn HubDataSource,
    settings: &LoadSettings,
    generation: u64,
) -> Result<HubSnapshot, LoadError> {
    info!(
        "Loading hub {} from {} (generation {})",
        settings.hub_id,
        source.name(),
        generation
    );

    let listing = source
        .list_hub_matches(&settings.hub_id, 0, settings.max_matches)
        .await
        .map_err(LoadError::MatchList)?;
    let match_ids = listing.finished_match_ids();
    let match_count = match_ids.len() as u32;
    debug!(
        "{} of {} listed matches are finished",
        match_count,
        listing.items.len()
    );

    // `buffered` yields in input order, so the fold sees listing order.
    let table = stream::iter(match_ids)
        .map(|match_id| fetch_match(source, match_id))
        .buffered(settings.max_concurrent_matches.max(1))
        .try_fold(PlayerTable::new(), |mut table, (roster, stats)| async move {
            table.record_match(&roster, &stats);
            Ok::<_, LoadError>(table)
        })
        .await?;

    let mut players = table.finish();
    let mut warnings = Vec::new();

    if let Some(leaderboard_id) = &settings.leaderboard_id {
        match source.leaderboard(leaderboard_id).await {
            Ok(leaderboard) => {
                merge_leaderboard(&mut players, &leaderboard.items);
            }
            Err(e) => {
                warn!("Leaderboard {} unavailable: {}", leaderboard_id, e);
                warnings.push(LoadWarning::LeaderboardUnavailable {
                    message: e.to_string(),
                });
            }
        }
    }

    let (players, column_ranks) = rank_players(players);

    info!(
        "Loaded {} players from {} matches (generation {})",
        players.len(),
        match_count,
        generation
    );

    Ok(HubSnapshot {
        load_id: Uuid::new_v4(),
        generation,
        hub_id: settings.hub_id.clone(),
        loaded_at: Utc::now(),
        match_count,
        players,
        column_ranks,
        warnings,
    })
}

/// Issues load generations.
#[derive(Debug, Default)]
pub struct LoadCoordinator {
    latest: AtomicU64,
}

impl LoadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every earlier one.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.latest() == generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// State of the most recent load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadState {
    pub status: LoadStatus,

    /// Message of the last failed load
    pub error: Option<String>,

    /// Warnings of the published snapshot
    pub warnings: Vec<LoadWarning>,

    /// Latest generation started
    pub generation: u64,

    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// How a load ended.
#[derive(Debug)]
pub enum LoadOutcome {
    Published(Arc<HubSnapshot>),
    Failed(LoadError),
    /// A newer load was started before this one finished.
    Discarded,
}

#[derive(Default)]
struct DashboardState {
    load: LoadState,
    snapshot: Option<Arc<HubSnapshot>>,
}

/// Holds the published snapshot and drives loads.
pub struct HubDashboard {
    source: Arc<dyn HubDataSource>,
    settings: LoadSettings,
    coordinator: LoadCoordinator,
    state: RwLock<DashboardState>,
    /// Background load started by `spawn_reload`, if any
    running: Mutex<Option<AbortHandle>>,
}

impl HubDashboard {
    pub fn new(source: Arc<dyn HubDataSource>, settings: LoadSettings) -> Self {
        Self {
            source,
            settings,
            coordinator: LoadCoordinator::new(),
            state: RwLock::new(DashboardState::default()),
            running: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &LoadSettings {
        &self.settings
    }

    pub fn source(&self) -> &Arc<dyn HubDataSource> {
        &self.source
    }

    /// Current load state.
    pub async fn load_state(&self) -> LoadState {
        self.state.read().await.load.clone()
    }

    /// Latest published snapshot, if any load has succeeded.
    pub async fn snapshot(&self) -> Option<Arc<HubSnapshot>> {
        self.state.read().await.snapshot.clone()
    }

    /// Take a new generation and mark the dashboard as loading.
    pub async fn start_load(&self) -> u64 {
        let generation = self.coordinator.begin();
        let mut state = self.state.write().await;
        state.load.status = LoadStatus::Loading;
        state.load.generation = generation;
        state.load.started_at = Some(Utc::now());
        state.load.error = None;
        generation
    }

    /// Run the load for `generation` and publish it if still current.
    ///
    /// A failure keeps the previously published snapshot.
    pub async fn run_load(&self, generation: u64) -> LoadOutcome {
        let result = load_hub_snapshot(self.source.as_ref(), &self.settings, generation).await;

        let mut state = self.state.write().await;
        // Checked under the write lock so a newer load cannot publish first.
        if !self.coordinator.is_current(generation) {
            debug!(
                "Discarding stale load (generation {}, latest {})",
                generation,
                self.coordinator.latest()
            );
            return LoadOutcome::Discarded;
        }

        state.load.completed_at = Some(Utc::now());
        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                state.load.status = LoadStatus::Ready;
                state.load.error = None;
                state.load.warnings = snapshot.warnings.clone();
                state.snapshot = Some(snapshot.clone());
                LoadOutcome::Published(snapshot)
            }
            Err(e) => {
                error!("Hub load failed: {} ({:?})", e, e);
                state.load.status = LoadStatus::Failed;
                state.load.error = Some(e.to_string());
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Start a load and wait for it.
    pub async fn load_now(&self) -> LoadOutcome {
        let generation = self.start_load().await;
        self.run_load(generation).await
    }

    /// Start a load in the background, superseding any running one.
    ///
    /// The superseded background load is aborted so it stops hitting the
    /// upstream API.
    pub async fn spawn_reload(self: &Arc<Self>) -> u64 {
        let mut running = self.running.lock().await;
        if let Some(previous) = running.take() {
            previous.abort();
        }

        let generation = self.start_load().await;
        let dashboard = Arc::clone(self);
        let handle = tokio::spawn(async move {
            dashboard.run_load(generation).await;
        });
        *running = Some(handle.abort_handle());
        generation
    }

    /// Reload on a fixed interval. The first tick is skipped.
    pub async fn run_periodic(self: Arc<Self>, every: Duration) {
        let mut ticker = interval(every);
        ticker.tick().await;

        info!("Reloading hub every {:?}", every);

        loop {
            ticker.tick().await;
            let generation = self.spawn_reload().await;
            debug!("Periodic reload started generation {}", generation);
        }
    }
}
