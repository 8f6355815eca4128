//! Domain types for the aggregation pipeline.
//!
//! Everything here is request-scoped: built from upstream responses,
//! serialized into one response body, then dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::upstream::{GameDto, GamePassDto, ProductInfoDto};

/// Numeric platform account identifier.
///
/// Serialized as a decimal string so both the numeric and username
/// routes report it the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw id. Zero is not a valid account id.
    pub fn new(raw: u64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Rejected user id input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid user id '{0}'")]
pub struct ParseUserIdError(pub String);

impl FromStr for UserId {
    type Err = ParseUserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `u64::from_str` accepts a leading '+', which we do not.
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseUserIdError(s.to_string()));
        }
        s.parse::<u64>()
            .ok()
            .and_then(UserId::new)
            .ok_or_else(|| ParseUserIdError(s.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = ParseUserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Who a request is about: a handle still to be resolved, or an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Handle(String),
    Id(UserId),
}

/// A published experience owned by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experience {
    pub universe_id: u64,
    pub root_place_id: Option<u64>,
    pub name: String,
}

impl From<GameDto> for Experience {
    fn from(dto: GameDto) -> Self {
        Self {
            universe_id: dto.id,
            // A zero place id means "no place".
            root_place_id: dto.root_place.and_then(|p| p.id).filter(|id| *id != 0),
            name: dto.name,
        }
    }
}

/// A gamepass as listed by the enumeration endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamepassSummary {
    pub id: u64,
    pub name: String,
}

impl From<GamePassDto> for GamepassSummary {
    fn from(dto: GamePassDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

/// Price and icon for one gamepass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GamepassDetail {
    pub price_in_currency: Option<u64>,
    pub icon_asset_id: Option<u64>,
}

impl From<ProductInfoDto> for GamepassDetail {
    fn from(dto: ProductInfoDto) -> Self {
        Self {
            price_in_currency: dto.price_in_robux,
            icon_asset_id: dto.icon_image_asset_id,
        }
    }
}

/// One output row: summary joined with detail and the owning place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedGamepass {
    pub id: u64,
    pub name: String,
    pub price: u64,
    pub image_asset_id: Option<u64>,
    pub place_id: Option<u64>,
}

impl AggregatedGamepass {
    /// Join a summary with its (possibly missing) detail.
    ///
    /// Missing detail degrades to price 0 and no image. A zero icon id is
    /// treated the same as no icon.
    pub fn join(
        summary: GamepassSummary,
        detail: Option<GamepassDetail>,
        place_id: Option<u64>,
    ) -> Self {
        let detail = detail.unwrap_or_default();
        Self {
            id: summary.id,
            name: summary.name,
            price: detail.price_in_currency.unwrap_or(0),
            image_asset_id: detail.icon_asset_id.filter(|id| *id != 0),
            place_id,
        }
    }
}

/// Response body of the gamepass routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_experiences: usize,
    pub total_gamepasses: usize,
    pub gamepasses: Vec<AggregatedGamepass>,
}

impl AggregateResult {
    pub const NO_EXPERIENCES: &'static str = "No experiences found for this user";

    pub fn new(user_id: UserId, total_experiences: usize, gamepasses: Vec<AggregatedGamepass>) -> Self {
        Self {
            user_id,
            message: None,
            total_experiences,
            total_gamepasses: gamepasses.len(),
            gamepasses,
        }
    }

    /// The user exists but has nothing published. Still a success.
    pub fn no_experiences(user_id: UserId) -> Self {
        Self {
            message: Some(Self::NO_EXPERIENCES.to_string()),
            ..Self::new(user_id, 0, Vec::new())
        }
    }
}

/// One entry of the games listing route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub name: String,
    pub universe_id: u64,
    pub place_id: Option<u64>,
}

impl From<Experience> for GameSummary {
    fn from(experience: Experience) -> Self {
        Self {
            name: experience.name,
            universe_id: experience.universe_id,
            place_id: experience.root_place_id,
        }
    }
}

/// Response body of the games listing route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesResult {
    pub user_id: UserId,
    pub total_games: usize,
    pub games: Vec<GameSummary>,
}
