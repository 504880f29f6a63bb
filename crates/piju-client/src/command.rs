//! Transport commands (`POST player/*`).
//!
//! Fire-and-forget: the response body is ignored and failures are only
//! logged.  The next poll or push frame is the authority on what actually
//! happened.

use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::host::ServerHost;
use crate::protocol::{ResumeRequest, ResumeSource};

pub const PAUSE_PATH: &str = "player/pause";
pub const RESUME_PATH: &str = "player/resume";
pub const NEXT_PATH: &str = "player/next";
pub const PREVIOUS_PATH: &str = "player/previous";

#[derive(Clone)]
pub struct CommandSender {
    host: ServerHost,
    http: reqwest::Client,
}

impl CommandSender {
    pub fn new(host: ServerHost, http: reqwest::Client) -> Self {
        Self { host, http }
    }

    pub async fn pause(&self) {
        self.send_simple(PAUSE_PATH, "pause").await;
    }

    pub async fn resume(&self) {
        self.send_simple(RESUME_PATH, "resume").await;
    }

    pub async fn next(&self) {
        self.send_simple(NEXT_PATH, "skip to next track").await;
    }

    pub async fn previous(&self) {
        self.send_simple(PREVIOUS_PATH, "skip to previous track").await;
    }

    /// Resume playback from a specific player.
    pub async fn resume_from(&self, source: ResumeSource) {
        let body = ResumeRequest { player: source };
        let description = format!("resume from {}", source.as_str());
        let result = self.post(RESUME_PATH, Some(&body)).await;
        self.report(&description, result);
    }

    async fn send_simple(&self, suffix: &str, description: &str) {
        let result = self.post(suffix, None).await;
        self.report(description, result);
    }

    async fn post(&self, suffix: &str, body: Option<&ResumeRequest>) -> ClientResult<()> {
        let url = self.host.endpoint(suffix)?;
        let request = match body {
            Some(body) => self.http.post(url).json(body),
            None => self.http.post(url).header("Content-Type", "application/json"),
        };
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status()));
        }
        Ok(())
    }

    fn report(&self, description: &str, result: ClientResult<()>) {
        match result {
            Ok(()) => debug!("sent {} command", description),
            Err(e) => warn!("Failed to send {} command to server: {}", description, e),
        }
    }
}
