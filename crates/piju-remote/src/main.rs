mod action;
mod app;
mod display;
mod screenblank;
mod theme;
mod ui;
mod view;

use piju_client::config::{Config, PowerProfile};
use piju_client::{platform, CommandSender, ServerHost, StatusClient};

use crate::display::DisplayHandle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut log_dir = platform::data_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("cannot create {}: {}", log_dir.display(), e);
        log_dir = platform::temp_dir();
    }
    let log_path = log_dir.join("remote.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP and websocket internals quiet by default.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        "debug,hyper_util=warn,reqwest=warn,hyper=warn,tungstenite=warn".to_string()
    });
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("piju-remote log: {}", log_path.display());

    tracing::info!("piju-remote starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("config: {}, using defaults", e);
            Config::default()
        }
    };
    config.apply_env();

    let host = ServerHost::parse(&config.server.host)?;
    tracing::info!("server: {}", host);

    // ── Shared HTTP client (poll, artwork, commands) ─────────────────────────
    let http = reqwest::Client::builder()
        .timeout(config.client.http_timeout())
        .build()?;

    let client = StatusClient::new(host.clone(), http.clone());
    let commands = CommandSender::new(host, http);

    // ── Display worker ───────────────────────────────────────────────────────
    let xset = match config.screen.profile {
        PowerProfile::None => None,
        profile => {
            let found = platform::find_xset_binary();
            if found.is_none() {
                tracing::warn!("screen profile {:?} needs xset, none found", profile);
            }
            found
        }
    };
    let display = DisplayHandle::spawn(xset);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    app::App::new(&config, client, commands, display).run().await
}
