use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::upstream::{
    Endpoint, GameDto, GamePassDto, GamePassPage, LookedUpUser, PlaceRef, PlatformApi,
    ProductInfoDto, UpstreamError, UpstreamResult, UserGamesResponse, UsernameLookupResponse,
};

fn failure(endpoint: Endpoint) -> UpstreamError {
    UpstreamError::Status {
        endpoint,
        status: StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn game(universe_id: u64, place_id: Option<u64>, name: &str) -> GameDto {
    GameDto {
        id: universe_id,
        name: name.to_string(),
        root_place: Some(PlaceRef { id: place_id }),
    }
}

pub(crate) fn pass(id: u64, name: &str) -> GamePassDto {
    GamePassDto {
        id,
        name: name.to_string(),
    }
}

pub(crate) fn info(price: Option<u64>, icon: Option<u64>) -> ProductInfoDto {
    ProductInfoDto {
        price_in_robux: price,
        icon_image_asset_id: icon,
    }
}

/// A page reply for one (universe, token) pair.
#[derive(Clone)]
pub(crate) enum PageReply {
    Page(Vec<GamePassDto>, Option<String>),
    Fail,
}

/// Every upstream call the fake saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Lookup(String),
    Games(u64, usize),
    Page(u64, String),
    Detail(u64),
}

/// In-memory `PlatformApi` with scripted replies and a call log.
#[derive(Clone, Default)]
pub(crate) struct FakePlatform {
    users: HashMap<String, u64>,
    lookup_fails: bool,
    games: HashMap<u64, Vec<GameDto>>,
    games_fail: bool,
    pages: HashMap<(u64, String), PageReply>,
    details: HashMap<u64, ProductInfoDto>,
    detail_delays: HashMap<u64, Duration>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakePlatform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_user(mut self, name: &str, id: u64) -> Self {
        self.users.insert(name.to_string(), id);
        self
    }

    pub(crate) fn with_lookup_failure(mut self) -> Self {
        self.lookup_fails = true;
        self
    }

    pub(crate) fn with_games(mut self, user_id: u64, games: Vec<GameDto>) -> Self {
        self.games.insert(user_id, games);
        self
    }

    pub(crate) fn with_games_failure(mut self) -> Self {
        self.games_fail = true;
        self
    }

    pub(crate) fn with_page(mut self, universe_id: u64, token: &str, reply: PageReply) -> Self {
        self.pages.insert((universe_id, token.to_string()), reply);
        self
    }

    /// Single-page universe.
    pub(crate) fn with_passes(self, universe_id: u64, passes: Vec<GamePassDto>) -> Self {
        self.with_page(universe_id, "", PageReply::Page(passes, None))
    }

    pub(crate) fn with_detail(mut self, id: u64, detail: ProductInfoDto) -> Self {
        self.details.insert(id, detail);
        self
    }

    pub(crate) fn with_detail_delay(mut self, id: u64, delay: Duration) -> Self {
        self.detail_delays.insert(id, delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

#[async_trait]
impl PlatformApi for FakePlatform {
    async fn lookup_username(&self, username: &str) -> UpstreamResult<UsernameLookupResponse> {
        self.record(Call::Lookup(username.to_string()));
        if self.lookup_fails {
            return Err(failure(Endpoint::UsernameLookup));
        }
        Ok(UsernameLookupResponse {
            data: self
                .users
                .get(username)
                .map(|id| vec![LookedUpUser { id: *id }])
                .unwrap_or_default(),
        })
    }

    async fn user_games(&self, user_id: u64, limit: usize) -> UpstreamResult<UserGamesResponse> {
        self.record(Call::Games(user_id, limit));
        if self.games_fail {
            return Err(failure(Endpoint::UserGames));
        }
        let mut data = self.games.get(&user_id).cloned().unwrap_or_default();
        data.truncate(limit);
        Ok(UserGamesResponse { data })
    }

    async fn game_passes_page(
        &self,
        universe_id: u64,
        _page_size: usize,
        page_token: &str,
    ) -> UpstreamResult<GamePassPage> {
        self.record(Call::Page(universe_id, page_token.to_string()));
        match self.pages.get(&(universe_id, page_token.to_string())) {
            Some(PageReply::Page(data, next)) => Ok(GamePassPage {
                data: data.clone(),
                next_page_token: next.clone(),
            }),
            Some(PageReply::Fail) => Err(failure(Endpoint::GamePasses)),
            None => Ok(GamePassPage::default()),
        }
    }

    async fn product_info(&self, game_pass_id: u64) -> UpstreamResult<ProductInfoDto> {
        self.record(Call::Detail(game_pass_id));
        if let Some(delay) = self.detail_delays.get(&game_pass_id) {
            tokio::time::sleep(*delay).await;
        }
        self.details
            .get(&game_pass_id)
            .cloned()
            .ok_or_else(|| failure(Endpoint::ProductInfo))
    }
}
