//! Platform API integration subsystem.
//!
//! # Data Flow
//! ```text
//! GatewayConfig.upstream (base URLs) + timeouts
//!     → client.rs (reqwest client, URL building, error mapping)
//!     → types.rs (wire DTOs, UpstreamError)
//!     → PlatformApi trait consumed by the aggregation pipeline
//! ```
//!
//! The pipeline depends on the trait, not on reqwest, so it can be
//! exercised against an in-memory fake.

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::PlatformClient;
pub use types::{
    Endpoint, GamePassDto, GamePassPage, GameDto, LookedUpUser, PlaceRef, ProductInfoDto,
    UpstreamError, UpstreamResult, UserGamesResponse, UsernameLookupResponse,
};

/// The four upstream calls the aggregation pipeline is built from.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Resolve a username; the response may carry zero matches.
    async fn lookup_username(&self, username: &str) -> UpstreamResult<UsernameLookupResponse>;

    /// List a user's published experiences, newest first.
    async fn user_games(&self, user_id: u64, limit: usize) -> UpstreamResult<UserGamesResponse>;

    /// Fetch one page of a universe's gamepasses. An empty token requests the first page.
    async fn game_passes_page(
        &self,
        universe_id: u64,
        page_size: usize,
        page_token: &str,
    ) -> UpstreamResult<GamePassPage>;

    /// Fetch price and icon for a single gamepass.
    async fn product_info(&self, game_pass_id: u64) -> UpstreamResult<ProductInfoDto>;
}
