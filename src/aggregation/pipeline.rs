//! The aggregation pipeline.
//!
//! ```text
//! handle ──resolve──▶ UserId ──list_experiences──▶ [Experience; ≤5]
//!                                                       │ (listing order)
//!                                                       ▼
//!                                   enumerate(universe) ─ pages, sequential
//!                                                       │ (enumeration order)
//!                                                       ▼
//!                                   fetch_detail(item) ─ bounded, order-preserving fan-out
//!                                                       │
//!                                                       ▼
//!                                           flat Vec<AggregatedGamepass>
//! ```
//!
//! Only resolution and listing can fail a request. A failed page keeps what
//! was already collected for that universe; a failed detail degrades that one
//! row. Nothing is retried.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;

use crate::aggregation::error::AggregateError;
use crate::aggregation::pagination::{CursorTracker, PageStep};
use crate::aggregation::types::{
    AggregateResult, AggregatedGamepass, Experience, GameSummary, GamepassDetail,
    GamepassSummary, GamesResult, Identity, UserId,
};
use crate::config::AggregationConfig;
use crate::observability::metrics;
use crate::upstream::PlatformApi;

/// Orchestrates the upstream calls for one inbound request.
#[derive(Clone)]
pub struct Aggregator {
    api: Arc<dyn PlatformApi>,
    config: AggregationConfig,
}

impl Aggregator {
    pub fn new(api: Arc<dyn PlatformApi>, config: AggregationConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Resolve a handle to its numeric id via the first lookup match.
    pub async fn resolve(&self, handle: &str) -> Result<UserId, AggregateError> {
        let not_found = || AggregateError::Resolution {
            handle: handle.to_string(),
        };

        if handle.is_empty() {
            return Err(not_found());
        }

        let response = self.api.lookup_username(handle).await.map_err(|e| {
            tracing::error!(username = %handle, error = %e, "Failed to fetch userId");
            not_found()
        })?;

        match response.data.first().and_then(|user| UserId::new(user.id)) {
            Some(user_id) => Ok(user_id),
            None => {
                tracing::info!(username = %handle, "No user matched handle");
                Err(not_found())
            }
        }
    }

    /// List the user's newest experiences, truncated to `limit`.
    ///
    /// The upstream is always asked for a full page; truncation is local.
    pub async fn list_experiences(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Experience>, AggregateError> {
        let response = self
            .api
            .user_games(user_id.get(), self.config.experience_page_size)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Failed to fetch user experiences");
                AggregateError::Listing(e)
            })?;

        Ok(response
            .data
            .into_iter()
            .take(limit)
            .map(Experience::from)
            .collect())
    }

    /// Collect every gamepass of a universe, following the page cursor.
    ///
    /// A failed page ends the walk; items gathered so far are returned.
    pub async fn enumerate(&self, universe_id: u64) -> Vec<GamepassSummary> {
        let mut all = Vec::new();
        let mut tracker = CursorTracker::new(self.config.max_pages);
        let mut cursor = String::new();

        loop {
            let page = match self
                .api
                .game_passes_page(universe_id, self.config.gamepass_page_size, &cursor)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(
                        universe_id,
                        pages = tracker.pages_fetched(),
                        collected = all.len(),
                        error = %e,
                        "Error fetching paginated gamepasses"
                    );
                    break;
                }
            };

            all.extend(page.data.into_iter().map(GamepassSummary::from));

            match tracker.advance(page.next_page_token) {
                PageStep::Fetch(next) => cursor = next,
                PageStep::Exhausted => break,
                PageStep::Halted(reason) => {
                    tracing::warn!(
                        universe_id,
                        collected = all.len(),
                        %reason,
                        "Stopped following gamepass pages"
                    );
                    break;
                }
            }
        }

        all
    }

    /// Fetch price and icon for one gamepass. Failures are logged, not raised.
    pub async fn fetch_detail(&self, game_pass_id: u64) -> Option<GamepassDetail> {
        match self.api.product_info(game_pass_id).await {
            Ok(info) => Some(GamepassDetail::from(info)),
            Err(e) => {
                tracing::warn!(gamepass_id = game_pass_id, error = %e, "Error fetching gamepass details");
                None
            }
        }
    }

    /// Full pipeline for either a handle or an id.
    pub async fn aggregate(&self, identity: Identity) -> Result<AggregateResult, AggregateError> {
        let user_id = match identity {
            Identity::Id(user_id) => user_id,
            Identity::Handle(handle) => self.resolve(&handle).await?,
        };
        self.aggregate_for_user(user_id).await
    }

    /// Pipeline for an already-resolved id.
    #[tracing::instrument(name = "aggregate", skip(self), fields(user_id = %user_id))]
    pub async fn aggregate_for_user(
        &self,
        user_id: UserId,
    ) -> Result<AggregateResult, AggregateError> {
        let experiences = self
            .list_experiences(user_id, self.config.max_experiences)
            .await?;

        if experiences.is_empty() {
            tracing::info!("No experiences found");
            return Ok(AggregateResult::no_experiences(user_id));
        }

        let mut gamepasses = Vec::new();
        for experience in &experiences {
            let rows = self.collect_experience(experience).await;
            tracing::debug!(
                universe_id = experience.universe_id,
                gamepasses = rows.len(),
                "Experience aggregated"
            );
            gamepasses.extend(rows);
        }

        metrics::record_gamepasses_aggregated(gamepasses.len());
        tracing::info!(
            experiences = experiences.len(),
            gamepasses = gamepasses.len(),
            "Aggregation complete"
        );

        Ok(AggregateResult::new(user_id, experiences.len(), gamepasses))
    }

    /// Enumerate one experience and join details, keeping enumeration order.
    async fn collect_experience(&self, experience: &Experience) -> Vec<AggregatedGamepass> {
        let place_id = experience.root_place_id;
        let summaries = self.enumerate(experience.universe_id).await;

        // `buffered` yields in input order regardless of completion order.
        stream::iter(summaries)
            .map(|summary| async move {
                let detail = self.fetch_detail(summary.id).await;
                AggregatedGamepass::join(summary, detail, place_id)
            })
            .buffered(self.config.detail_concurrency.max(1))
            .collect()
            .await
    }

    /// Resolve a handle and list its experiences without gamepasses.
    pub async fn list_games(&self, identity: Identity) -> Result<GamesResult, AggregateError> {
        let user_id = match identity {
            Identity::Id(user_id) => user_id,
            Identity::Handle(handle) => self.resolve(&handle).await?,
        };

        let games: Vec<GameSummary> = self
            .list_experiences(user_id, self.config.experience_page_size)
            .await?
            .into_iter()
            .map(GameSummary::from)
            .collect();

        Ok(GamesResult {
            user_id,
            total_games: games.len(),
            games,
        })
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("config", &self.config)
            .finish()
    }
}
