//! Reqwest-backed platform client.
//!
//! # Responsibilities
//! - Build upstream URLs from the configured base URLs
//! - Apply connect and per-call timeouts
//! - Map transport, status and decode failures into `UpstreamError`
//! - Record one metric per upstream call
//!
//! Policy (what counts as "not found", what is fatal) lives in the
//! aggregation layer; this client only reports what happened.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::observability::metrics;
use crate::upstream::types::{
    Endpoint, GamePassPage, ProductInfoDto, UpstreamError, UpstreamResult, UserGamesResponse,
    UsernameLookupRequest, UsernameLookupResponse,
};
use crate::upstream::PlatformApi;

/// HTTP client for the platform's public REST APIs.
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    users_base: Url,
    games_base: Url,
    apis_base: Url,
}

impl PlatformClient {
    /// Create a new client from upstream and timeout settings.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> UpstreamResult<Self> {
        let http = Client::builder()
            .user_agent(upstream.user_agent.as_str())
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()
            .map_err(UpstreamError::Build)?;

        Ok(Self {
            http,
            users_base: base_url(&upstream.users_base_url)?,
            games_base: base_url(&upstream.games_base_url)?,
            apis_base: base_url(&upstream.apis_base_url)?,
        })
    }

    fn games_url(&self, user_id: u64, limit: usize) -> UpstreamResult<Url> {
        let mut url = self.games_base.join(&format!("v2/users/{user_id}/games"))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("sortOrder", "Desc");
        Ok(url)
    }

    fn game_passes_url(
        &self,
        universe_id: u64,
        page_size: usize,
        page_token: &str,
    ) -> UpstreamResult<Url> {
        let mut url = self
            .apis_base
            .join(&format!("game-passes/v1/universes/{universe_id}/game-passes"))?;
        url.query_pairs_mut()
            .append_pair("passView", "Full")
            .append_pair("pageSize", &page_size.to_string())
            .append_pair("pageToken", page_token);
        Ok(url)
    }

    fn product_info_url(&self, game_pass_id: u64) -> UpstreamResult<Url> {
        Ok(self
            .apis_base
            .join(&format!("game-passes/v1/game-passes/{game_pass_id}/product-info"))?)
    }
}

/// Parse a base URL so that relative joins keep its whole path.
///
/// `Url::join` replaces the last segment unless the path ends in `/`.
fn base_url(raw: &str) -> UpstreamResult<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl PlatformApi for PlatformClient {
    async fn lookup_username(&self, username: &str) -> UpstreamResult<UsernameLookupResponse> {
        let url = self.users_base.join("v1/usernames/users")?;
        let body = UsernameLookupRequest {
            usernames: [username],
            exclude_banned_users: true,
        };
        let res = self.http.post(url).json(&body).send().await;
        decode(Endpoint::UsernameLookup, res).await
    }

    async fn user_games(&self, user_id: u64, limit: usize) -> UpstreamResult<UserGamesResponse> {
        let url = self.games_url(user_id, limit)?;
        let res = self.http.get(url).send().await;
        decode(Endpoint::UserGames, res).await
    }

    async fn game_passes_page(
        &self,
        universe_id: u64,
        page_size: usize,
        page_token: &str,
    ) -> UpstreamResult<GamePassPage> {
        let url = self.game_passes_url(universe_id, page_size, page_token)?;
        let res = self.http.get(url).send().await;
        decode(Endpoint::GamePasses, res).await
    }

    async fn product_info(&self, game_pass_id: u64) -> UpstreamResult<ProductInfoDto> {
        let url = self.product_info_url(game_pass_id)?;
        let res = self.http.get(url).send().await;
        decode(Endpoint::ProductInfo, res).await
    }
}

/// Turn a raw send result into a typed body, recording the outcome.
async fn decode<T: DeserializeOwned>(
    endpoint: Endpoint,
    res: Result<Response, reqwest::Error>,
) -> UpstreamResult<T> {
    let result = read_body(endpoint, res).await;

    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) if e.is_timeout() => "timeout",
        Err(_) => "error",
    };
    metrics::record_upstream_call(endpoint.as_str(), outcome);

    result
}

async fn read_body<T: DeserializeOwned>(
    endpoint: Endpoint,
    res: Result<Response, reqwest::Error>,
) -> UpstreamResult<T> {
    let res = res.map_err(|source| UpstreamError::Transport { endpoint, source })?;

    let status = res.status();
    if !status.is_success() {
        return Err(UpstreamError::Status { endpoint, status });
    }

    res.json::<T>()
        .await
        .map_err(|source| UpstreamError::Decode { endpoint, source })
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("users_base", &self.users_base.as_str())
            .field("games_base", &self.games_base.as_str())
            .field("apis_base", &self.apis_base.as_str())
            .finish()
    }
}
