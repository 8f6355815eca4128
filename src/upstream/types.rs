//! Wire types for the platform APIs and the upstream error taxonomy.
//!
//! DTOs mirror upstream JSON exactly and are converted into domain types
//! by the aggregation layer. Unknown fields are ignored.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Upstream call that produced an error, used for logs and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    UsernameLookup,
    UserGames,
    GamePasses,
    ProductInfo,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::UsernameLookup => "username_lookup",
            Endpoint::UserGames => "user_games",
            Endpoint::GamePasses => "game_passes",
            Endpoint::ProductInfo => "product_info",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while talking to the platform.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS or timeout failure.
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: Endpoint, status: StatusCode },

    /// Body did not match the expected shape.
    #[error("{endpoint} response could not be decoded: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    /// The reqwest client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Configured base URL could not be joined with a request path.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl UpstreamError {
    /// True when the failure was a client-side timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            UpstreamError::Transport { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of the username lookup request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameLookupRequest<'a> {
    pub usernames: [&'a str; 1],
    pub exclude_banned_users: bool,
}

/// Username lookup response: `{"data":[{"id":...}]}`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UsernameLookupResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<LookedUpUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookedUpUser {
    pub id: u64,
}

/// Experience listing response: `{"data":[...]}`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UserGamesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<GameDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDto {
    /// Universe id.
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub root_place: Option<PlaceRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceRef {
    pub id: Option<u64>,
}

/// One page of a universe's gamepasses.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GamePassPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<GamePassDto>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GamePassDto {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Product info for a single gamepass.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ProductInfoDto {
    #[serde(rename = "PriceInRobux", default)]
    pub price_in_robux: Option<u64>,
    #[serde(rename = "IconImageAssetId", default)]
    pub icon_image_asset_id: Option<u64>,
}
