//! Shared utilities for integration tests.
//!
//! `MockPlatform` plays all four upstream services on one ephemeral port;
//! `start_gateway` runs the real server pointed at it.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use gamepass_proxy::config::GatewayConfig;
use gamepass_proxy::{HttpServer, Shutdown};

/// Scripted upstream replies.
#[derive(Default)]
pub struct MockPlatform {
    pub users: HashMap<String, u64>,
    /// user id → raw `data` entries; missing user means 500.
    pub games: HashMap<u64, Vec<Value>>,
    /// (universe id, token) → raw page body; missing entry means 500.
    pub pages: HashMap<(u64, String), Value>,
    /// gamepass id → raw product-info body; missing entry means 404.
    pub details: HashMap<u64, Value>,
    pub detail_delays: HashMap<u64, Duration>,
    pub page_delays: HashMap<(u64, String), Duration>,
    /// user id → whole listing body, served instead of `games`.
    pub games_bodies: HashMap<u64, Value>,
}

impl MockPlatform {
    pub fn user(mut self, name: &str, id: u64) -> Self {
        self.users.insert(name.to_string(), id);
        self
    }

    pub fn games(mut self, user_id: u64, games: Vec<Value>) -> Self {
        self.games.insert(user_id, games);
        self
    }

    pub fn page(mut self, universe_id: u64, token: &str, body: Value) -> Self {
        self.pages.insert((universe_id, token.to_string()), body);
        self
    }

    pub fn detail(mut self, id: u64, body: Value) -> Self {
        self.details.insert(id, body);
        self
    }

    pub fn detail_delay(mut self, id: u64, delay: Duration) -> Self {
        self.detail_delays.insert(id, delay);
        self
    }

    pub fn page_delay(mut self, universe_id: u64, token: &str, delay: Duration) -> Self {
        self.page_delays.insert((universe_id, token.to_string()), delay);
        self
    }

    pub fn games_body(mut self, user_id: u64, body: Value) -> Self {
        self.games_bodies.insert(user_id, body);
        self
    }
}

/// Observations of what the gateway asked upstream.
#[derive(Default)]
pub struct Recorder {
    pub calls: AtomicUsize,
    pub paths: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    fn hit(&self, path: String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(path);
    }
}

#[derive(Clone)]
struct MockState {
    platform: Arc<MockPlatform>,
    recorder: Arc<Recorder>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupBody {
    usernames: Vec<String>,
}

async fn lookup(State(state): State<MockState>, Json(body): Json<LookupBody>) -> Json<Value> {
    let name = body.usernames.first().cloned().unwrap_or_default();
    state.recorder.hit(format!("lookup:{name}"));
    let data: Vec<Value> = state
        .platform
        .users
        .get(&name)
        .map(|id| vec![json!({"id": id, "name": name, "displayName": name})])
        .unwrap_or_default();
    Json(json!({ "data": data }))
}

async fn games(
    State(state): State<MockState>,
    Path(user_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.recorder.hit(format!(
        "games:{user_id}?limit={}&sortOrder={}",
        query.get("limit").cloned().unwrap_or_default(),
        query.get("sortOrder").cloned().unwrap_or_default()
    ));
    if let Some(body) = state.platform.games_bodies.get(&user_id) {
        return Json(body.clone()).into_response();
    }
    match state.platform.games.get(&user_id) {
        Some(data) => Json(json!({ "data": data, "nextPageCursor": null })).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn game_passes(
    State(state): State<MockState>,
    Path(universe_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let token = query.get("pageToken").cloned().unwrap_or_default();
    state.recorder.hit(format!(
        "passes:{universe_id}:{token}:pageSize={}",
        query.get("pageSize").cloned().unwrap_or_default()
    ));
    let key = (universe_id, token);
    if let Some(delay) = state.platform.page_delays.get(&key) {
        tokio::time::sleep(*delay).await;
    }
    match state.platform.pages.get(&key) {
        Some(body) => Json(body.clone()).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "page unavailable").into_response(),
    }
}

async fn product_info(State(state): State<MockState>, Path(id): Path<u64>) -> Response {
    state.recorder.hit(format!("detail:{id}"));
    if let Some(delay) = state.platform.detail_delays.get(&id) {
        tokio::time::sleep(*delay).await;
    }
    match state.platform.details.get(&id) {
        Some(body) => Json(body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Start the mock upstream; returns its base URL and call recorder.
pub async fn start_mock_platform(platform: MockPlatform) -> (String, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let state = MockState {
        platform: Arc::new(platform),
        recorder: recorder.clone(),
    };

    let app = Router::new()
        .route("/v1/usernames/users", post(lookup))
        .route("/v2/users/{user_id}/games", get(games))
        .route(
            "/game-passes/v1/universes/{universe_id}/game-passes",
            get(game_passes),
        )
        .route("/game-passes/v1/game-passes/{id}/product-info", get(product_info))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}"), recorder)
}

/// A running gateway.
pub struct Gateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("gateway unreachable")
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config pointing every upstream at `base_url`.
pub fn config_for(base_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_host = "127.0.0.1".to_string();
    config.listener.port = 0;
    config.upstream.users_base_url = base_url.to_string();
    config.upstream.games_base_url = base_url.to_string();
    config.upstream.apis_base_url = base_url.to_string();
    config.timeouts.upstream_secs = 2;
    config
}

/// Start the real gateway with the given config on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> Gateway {
    let server = HttpServer::new(config).expect("server should build");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    Gateway {
        addr,
        shutdown,
        client,
    }
}
