#![allow(dead_code)]

//! In-process stand-in for the piju server: status root, artwork, player
//! commands and the push socket.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use piju_client::{NowPlaying, ServerHost};
use tokio::net::TcpListener;
use tokio::sync::Notify;

#[derive(Default)]
pub struct MockState {
    pub status_code: AtomicU16,
    pub status_body: Mutex<String>,
    pub artwork_hits: Mutex<HashMap<String, usize>>,
    pub artwork_fail: AtomicBool,
    /// (path, body) of every player command received.
    pub commands: Mutex<Vec<(String, String)>>,
    /// Frames sent to each push client right after the upgrade.
    pub push_frames: Mutex<Vec<String>>,
    /// Push sockets accepted so far.
    pub push_sessions: AtomicUsize,
    /// Signals the push handler to close the socket.
    pub disconnect: Notify,
}

impl MockState {
    pub fn set_status(&self, now: &NowPlaying) {
        *self.status_body.lock().unwrap() = piju_client::protocol::encode(now).to_string();
    }

    pub fn set_raw_status(&self, code: u16, body: &str) {
        self.status_code.store(code, Ordering::SeqCst);
        *self.status_body.lock().unwrap() = body.to_string();
    }

    pub fn artwork_hits(&self, name: &str) -> usize {
        self.artwork_hits
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn commands(&self) -> Vec<(String, String)> {
        self.commands.lock().unwrap().clone()
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        state.status_code.store(200, Ordering::SeqCst);
        state.set_status(&NowPlaying::with_status(piju_client::Status::Stopped));

        let app = Router::new()
            .route("/", get(status))
            .route("/art/:name", get(artwork))
            .route("/player/:action", post(player))
            .route("/ws", get(push))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn host(&self) -> ServerHost {
        ServerHost::parse(&self.addr.to_string()).unwrap()
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// A host nothing listens on.
pub async fn dead_host() -> ServerHost {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ServerHost::parse(&addr.to_string()).unwrap()
}

async fn status(State(state): State<Arc<MockState>>) -> Response {
    let code = StatusCode::from_u16(state.status_code.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = state.status_body.lock().unwrap().clone();
    (code, body).into_response()
}

async fn artwork(State(state): State<Arc<MockState>>, Path(name): Path<String>) -> Response {
    *state
        .artwork_hits
        .lock()
        .unwrap()
        .entry(name.clone())
        .or_default() += 1;

    if name.starts_with("missing") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if state.artwork_fail.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Bytes::from(format!("image-{name}")).into_response()
}

async fn player(
    State(state): State<Arc<MockState>>,
    Path(action): Path<String>,
    body: String,
) -> StatusCode {
    state
        .commands
        .lock()
        .unwrap()
        .push((format!("player/{action}"), body));
    StatusCode::OK
}

async fn push(ws: WebSocketUpgrade, State(state): State<Arc<MockState>>) -> Response {
    ws.on_upgrade(move |socket| push_frames(socket, state))
}

async fn push_frames(mut socket: WebSocket, state: Arc<MockState>) {
    state.push_sessions.fetch_add(1, Ordering::SeqCst);
    let frames = state.push_frames.lock().unwrap().clone();
    for frame in frames {
        if socket.send(Message::Text(frame)).await.is_err() {
            return;
        }
    }
    state.disconnect.notified().await;
    let _ = socket.send(Message::Close(None)).await;
}
