//! Single-slot artwork cache.
//!
//! Every poll and every push frame carries `CurrentArtwork`, but it only
//! changes when the album does.  The cache keeps the bytes for the last URI
//! that was fetched successfully and hands out cheap `Bytes` clones of that
//! immutable snapshot, so a renderer holding the previous image is never
//! affected by a fetch in progress.
//!
//! A failed fetch leaves the slot untouched: the stale image stays on screen
//! and the next observation with the same URI retries.

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::host::ServerHost;

#[derive(Debug, Clone)]
struct CachedArtwork {
    uri: String,
    bytes: Bytes,
}

pub struct ArtworkCache {
    host: ServerHost,
    http: reqwest::Client,
    // Held across the fetch so two observations racing on the same new URI
    // produce a single request.
    slot: Mutex<Option<CachedArtwork>>,
}

impl ArtworkCache {
    pub fn new(host: ServerHost, http: reqwest::Client) -> Self {
        Self {
            host,
            http,
            slot: Mutex::new(None),
        }
    }

    /// Bytes for `uri`, fetching only when it differs from the cached URI.
    /// Returns the previous artwork when the fetch fails.
    pub async fn resolve(&self, uri: &str) -> Option<Bytes> {
        let mut slot = self.slot.lock().await;
        if let Some(cached) = slot.as_ref() {
            if cached.uri == uri {
                return Some(cached.bytes.clone());
            }
        }

        match self.fetch(uri).await {
            Ok(bytes) => {
                debug!("artwork {} cached ({} bytes)", uri, bytes.len());
                *slot = Some(CachedArtwork {
                    uri: uri.to_string(),
                    bytes: bytes.clone(),
                });
                Some(bytes)
            }
            Err(e) => {
                warn!("artwork fetch for {} failed: {}", uri, e);
                slot.as_ref().map(|cached| cached.bytes.clone())
            }
        }
    }

    /// URI of the artwork currently held, if any.
    pub async fn cached_uri(&self) -> Option<String> {
        self.slot.lock().await.as_ref().map(|c| c.uri.clone())
    }

    async fn fetch(&self, uri: &str) -> ClientResult<Bytes> {
        let url = self.host.resolve_artwork(uri)?;
        let response = self.http.get(url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(ClientError::HttpStatus(response.status()));
        }
        Ok(response.bytes().await?)
    }
}
