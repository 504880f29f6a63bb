//! Status synchronisation with the piju server.
//!
//! Two delivery paths feed the same consumer:
//!
//! ```text
//!   poll_once()  ── GET /  ───────────────┐
//!                                         ├── decode ── artwork ── NowPlaying
//!   connect()    ── ws read task ─ frame ─┘                           │
//!                                                                     └─> updates (mpsc)
//! ```
//!
//! The read task never reconnects on its own.  When the socket dies it flips
//! `connected` off and sends a single `Status::Error` observation; whoever
//! owns the timer calls `connect()` again once it notices.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::artwork::ArtworkCache;
use crate::error::{ClientError, ClientResult};
use crate::host::ServerHost;
use crate::protocol::{self, NowPlaying, Status};

struct ClientInner {
    host: ServerHost,
    http: reqwest::Client,
    artwork: ArtworkCache,
    connected: AtomicBool,
    last_status: AtomicU8,
}

/// Cheaply cloneable handle; clones share the connection flag, the last
/// status and the artwork cache.
#[derive(Clone)]
pub struct StatusClient {
    inner: Arc<ClientInner>,
}

impl StatusClient {
    pub fn new(host: ServerHost, http: reqwest::Client) -> Self {
        let artwork = ArtworkCache::new(host.clone(), http.clone());
        Self {
            inner: Arc::new(ClientInner {
                host,
                http,
                artwork,
                connected: AtomicBool::new(false),
                last_status: AtomicU8::new(Status::Error.as_u8()),
            }),
        }
    }

    pub fn host(&self) -> &ServerHost {
        &self.inner.host
    }

    pub fn artwork(&self) -> &ArtworkCache {
        &self.inner.artwork
    }

    /// True while a push connection is open or being opened.  May lag the
    /// socket by one read.
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Status of the most recent observation handed to the consumer.
    pub fn last_status(&self) -> Status {
        Status::from_u8(self.inner.last_status.load(Ordering::Acquire))
    }

    /// One-shot fetch of the server root.  Never fails: every problem is
    /// logged and reported as `Status::Error`.
    pub async fn poll_once(&self) -> NowPlaying {
        let now = match self.fetch_status().await {
            Ok(now) => now,
            Err(e) => {
                warn!("Error getting server status: {}", e);
                NowPlaying::error()
            }
        };
        self.record(&now);
        now
    }

    async fn fetch_status(&self) -> ClientResult<NowPlaying> {
        let response = self
            .inner
            .http
            .get(self.inner.host.root().clone())
            .send()
            .await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(ClientError::HttpStatus(response.status()));
        }
        let body = response.bytes().await?;
        Ok(self.decode_observation(&body).await?)
    }

    /// Open the push connection and start the read task.  Returns the
    /// connect error straight away; retrying is the caller's business.
    ///
    /// The connected flag is claimed before dialing, so concurrent calls
    /// open at most one socket; the losers return `Ok(())` at once.
    pub async fn connect(&self, updates: mpsc::Sender<NowPlaying>) -> ClientResult<()> {
        if self
            .inner
            .connected
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("connect(): push connection already open or opening");
            return Ok(());
        }

        let ws_stream = match self.dial().await {
            Ok(ws_stream) => ws_stream,
            Err(e) => {
                self.inner.connected.store(false, Ordering::Release);
                return Err(e);
            }
        };

        let client = self.clone();
        tokio::spawn(async move {
            client.read_loop(ws_stream, updates).await;
        });
        Ok(())
    }

    async fn dial(
        &self,
    ) -> ClientResult<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
    > {
        let url = self.inner.host.push_url()?;
        let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        info!("push connection open at {}", url);
        Ok(ws_stream)
    }

    async fn read_loop<S>(&self, mut ws_stream: S, updates: mpsc::Sender<NowPlaying>)
    where
        S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
            + Unpin,
    {
        loop {
            let payload = match ws_stream.next().await {
                Some(Ok(Message::Text(text))) => text.into_bytes(),
                Some(Ok(Message::Binary(data))) => data,
                Some(Ok(Message::Close(frame))) => {
                    info!("push connection closed by server: {:?}", frame);
                    break;
                }
                // Ping/pong are answered by tungstenite itself.
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("push connection read error: {}", e);
                    break;
                }
                None => {
                    info!("push connection ended");
                    break;
                }
            };

            let now = match self.decode_observation(&payload).await {
                Ok(now) => now,
                Err(e) => {
                    warn!("Error decoding status update: {}", e);
                    NowPlaying::error()
                }
            };
            debug!(
                "Status update received: {} / {} / {} / {}",
                now.artist_name, now.track_name, now.status, now.stream_name
            );
            self.record(&now);
            if updates.send(now).await.is_err() {
                debug!("status consumer gone, closing push connection");
                break;
            }
        }

        drop(ws_stream);
        self.inner.connected.store(false, Ordering::Release);
        self.record(&NowPlaying::error());
        let _ = updates.send(NowPlaying::error()).await;
    }

    /// Shared by both delivery paths: decode, then attach artwork.
    async fn decode_observation(&self, body: &[u8]) -> Result<NowPlaying, crate::error::ProtocolError> {
        let mut now = protocol::decode(body)?;
        if !now.artwork_uri.is_empty() {
            now.artwork = self.inner.artwork.resolve(&now.artwork_uri).await;
        }
        Ok(now)
    }

    fn record(&self, now: &NowPlaying) {
        self.inner
            .last_status
            .store(now.status.as_u8(), Ordering::Release);
    }
}
