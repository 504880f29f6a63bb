use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

/// Environment variable that overrides `server.host`.
pub const HOST_ENV: &str = "PIJU_HOST";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// `host`, `host:port` or a full `http(s)://` URL.
    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Upper bound for every HTTP request (poll, artwork, commands).
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// How often the push connection is checked and re-opened.
    #[serde(default = "default_reconnect_interval_secs")]
    pub reconnect_interval_secs: u64,
    /// Poll cadence while the push connection is down.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Display power strategy, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerProfile {
    /// Leave the screensaver alone.
    #[default]
    None,
    /// Long idle timeout while playing, short one when stopped.
    Balanced,
    /// Keep the screen on while playing, blank it shortly after stopping.
    OnOff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default)]
    pub profile: PowerProfile,
    /// Cadence of the screen-blank state machine.
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    /// Samples between periodic "still playing" ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval: u32,
    /// Samples of not-playing before the delayed stop fires.
    #[serde(default = "default_stop_delay")]
    pub stop_delay: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout_secs(),
            reconnect_interval_secs: default_reconnect_interval_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            profile: PowerProfile::default(),
            sample_interval_ms: default_sample_interval_ms(),
            tick_interval: default_tick_interval(),
            stop_delay: default_stop_delay(),
        }
    }
}

impl ClientConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_secs(self.reconnect_interval_secs.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }
}

impl ScreenConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(100))
    }
}

fn default_host() -> String {
    "localhost:5000".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_reconnect_interval_secs() -> u64 {
    5
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_sample_interval_ms() -> u64 {
    1000
}

fn default_tick_interval() -> u32 {
    5
}

fn default_stop_delay() -> u32 {
    10
}

impl Config {
    /// Load from the default location, writing a default file on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// Apply `PIJU_HOST` if set.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var(HOST_ENV) {
            if !host.trim().is_empty() {
                self.server.host = host;
            }
        }
    }
}
