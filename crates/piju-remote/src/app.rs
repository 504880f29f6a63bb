//! App: the single-owner event loop.
//!
//! Architecture:
//! - `App` owns the view, the screen-blank controller and every in-flight flag.
//! - Polls, connects and commands run in spawned tasks and report back through
//!   an `AppMessage` channel; the loop itself never awaits network I/O.
//! - Push observations arrive on their own `NowPlaying` channel.
//! - Three timers: reconnect check, disconnected poll, screen-blank sample.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use piju_client::config::Config;
use piju_client::{CommandSender, NowPlaying, ResumeSource, StatusClient};

use crate::action::Action;
use crate::display::DisplayHandle;
use crate::screenblank::ScreenBlankController;
use crate::ui::{self, Screen};
use crate::view::{NowPlayingView, PlayPause};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// Result of a one-shot poll.
    Polled(NowPlaying),
    /// A connect attempt finished; `Err` carries the message to show.
    ConnectFinished(Result<(), String>),
}

pub struct App {
    client: StatusClient,
    commands: CommandSender,
    display: DisplayHandle,
    blank: ScreenBlankController,
    reconnect_interval: Duration,
    poll_interval: Duration,
    sample_interval: Duration,
    host_label: String,
    link_label: String,

    view: NowPlayingView,
    show_link: bool,
    last_log: Option<String>,
    poll_in_flight: bool,
    connect_in_flight: bool,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        client: StatusClient,
        commands: CommandSender,
        display: DisplayHandle,
    ) -> Self {
        let screen = &config.screen;
        Self {
            host_label: client.host().to_string(),
            link_label: client.host().web_url().to_string(),
            client,
            commands,
            display,
            blank: ScreenBlankController::new(screen.profile, screen.tick_interval, screen.stop_delay),
            reconnect_interval: config.client.reconnect_interval(),
            poll_interval: config.client.poll_interval(),
            sample_interval: screen.sample_interval(),
            view: NowPlayingView::default(),
            show_link: false,
            last_log: None,
            poll_in_flight: false,
            connect_in_flight: false,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        let (status_tx, mut status_rx) = mpsc::channel::<NowPlaying>(256);

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut reconnect_tick = tokio::time::interval(self.reconnect_interval);
        reconnect_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut poll_tick = tokio::time::interval(self.poll_interval);
        poll_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut blank_tick = tokio::time::interval(self.sample_interval);
        blank_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg, &tx);
                }

                Some(now) = status_rx.recv() => {
                    self.apply(&now);
                    needs_redraw = true;
                }

                _ = reconnect_tick.tick() => {
                    self.start_connect(&tx, &status_tx);
                }

                _ = poll_tick.tick() => {
                    if !self.client.is_connected() {
                        self.start_poll(&tx);
                    }
                }

                _ = blank_tick.tick() => {
                    let commands = self.blank.set_state(self.client.last_status());
                    if !commands.is_empty() {
                        debug!("screen: {:?}", commands);
                        self.display.send(commands);
                    }
                }
            }
        }

        info!("piju-remote exiting");
        Ok(())
    }

    fn handle_message(
        &mut self,
        msg: AppMessage,
        tx: &mpsc::Sender<AppMessage>,
    ) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                for action in key_actions(key, &self.view) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(_, _)) => true,
            AppMessage::Event(_) => false,
            AppMessage::Polled(now) => {
                self.poll_in_flight = false;
                self.apply(&now);
                true
            }
            AppMessage::ConnectFinished(result) => {
                self.connect_in_flight = false;
                match result {
                    Ok(()) => {
                        self.log("push connection open");
                        // Push frames only arrive on change; poll once to fill the view.
                        self.start_poll(tx);
                    }
                    Err(e) => self.log(format!("push connection failed: {e}")),
                }
                true
            }
        }
    }

    fn start_poll(&mut self, tx: &mpsc::Sender<AppMessage>) {
        if self.poll_in_flight {
            return;
        }
        self.poll_in_flight = true;
        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let now = client.poll_once().await;
            let _ = tx.send(AppMessage::Polled(now)).await;
        });
    }

    fn start_connect(&mut self, tx: &mpsc::Sender<AppMessage>, status_tx: &mpsc::Sender<NowPlaying>) {
        if self.connect_in_flight || self.client.is_connected() {
            return;
        }
        self.connect_in_flight = true;
        let client = self.client.clone();
        let tx = tx.clone();
        let updates = status_tx.clone();
        tokio::spawn(async move {
            let result = client.connect(updates).await.map_err(|e| {
                warn!("push connect failed: {}", e);
                e.to_string()
            });
            let _ = tx.send(AppMessage::ConnectFinished(result)).await;
        });
    }

    fn apply(&mut self, now: &NowPlaying) {
        let view = NowPlayingView::from_now_playing(now);
        if view.status != self.view.status {
            info!("status {} -> {}", self.view.status, view.status);
        }
        self.view = view;
    }

    fn dispatch(&mut self, action: Action) {
        debug!("dispatch {:?}", action);
        let commands = self.commands.clone();
        match action {
            Action::Pause => {
                tokio::spawn(async move { commands.pause().await });
            }
            Action::Resume => {
                tokio::spawn(async move { commands.resume().await });
            }
            Action::Next => {
                tokio::spawn(async move { commands.next().await });
            }
            Action::Previous => {
                tokio::spawn(async move { commands.previous().await });
            }
            Action::ResumeFrom(source) => {
                self.show_link = false;
                tokio::spawn(async move { commands.resume_from(source).await });
            }
            Action::ToggleLink => self.show_link = !self.show_link,
            Action::Quit => self.should_quit = true,
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.last_log = Some(message);
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        ui::draw(
            frame,
            &Screen {
                view: &self.view,
                host: &self.host_label,
                link: &self.link_label,
                connected: self.client.is_connected(),
                show_link: self.show_link,
                profile: self.blank.profile(),
                last_log: self.last_log.as_deref(),
            },
        );
    }
}

/// Map a key press to actions, honouring which controls the view enables.
pub fn key_actions(key: KeyEvent, view: &NowPlayingView) -> Vec<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return vec![Action::Quit];
    }
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') => match view.play_pause {
            PlayPause::Pause => Some(Action::Pause),
            PlayPause::Resume => Some(Action::Resume),
            PlayPause::Inactive => None,
        },
        KeyCode::Char('n') | KeyCode::Right if view.next_enabled => Some(Action::Next),
        KeyCode::Char('b') | KeyCode::Char('p') | KeyCode::Left if view.previous_enabled => {
            Some(Action::Previous)
        }
        KeyCode::Char('l') if view.source.is_some() => {
            Some(Action::ResumeFrom(ResumeSource::Local))
        }
        KeyCode::Char('r') if view.source.is_some() => {
            Some(Action::ResumeFrom(ResumeSource::Radio))
        }
        KeyCode::Char('k') => Some(Action::ToggleLink),
        _ => None,
    };
    action.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use piju_client::Status;

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn view(status: Status, n: u32, of: u32) -> NowPlayingView {
        NowPlayingView::from_now_playing(&NowPlaying {
            status,
            is_track: true,
            track_number: n,
            album_tracks: of,
            ..NowPlaying::default()
        })
    }

    #[test]
    fn test_space_follows_play_pause_state() {
        assert_eq!(key_actions(press(' '), &view(Status::Playing, 1, 2)), [Action::Pause]);
        assert_eq!(key_actions(press(' '), &view(Status::Paused, 1, 2)), [Action::Resume]);
        assert!(key_actions(press(' '), &view(Status::Stopped, 1, 2)).is_empty());
    }

    #[test]
    fn test_skip_keys_respect_gating() {
        let first = view(Status::Playing, 1, 3);
        assert_eq!(key_actions(press('n'), &first), [Action::Next]);
        assert!(key_actions(press('b'), &first).is_empty());

        let last = view(Status::Playing, 3, 3);
        assert!(key_actions(press('n'), &last).is_empty());
        assert_eq!(key_actions(press('p'), &last), [Action::Previous]);
    }

    #[test]
    fn test_error_view_only_allows_link_and_quit() {
        let error = NowPlayingView::default();
        for c in [' ', 'n', 'b', 'l', 'r'] {
            assert!(key_actions(press(c), &error).is_empty(), "{c}");
        }
        assert_eq!(key_actions(press('k'), &error), [Action::ToggleLink]);
        assert_eq!(key_actions(press('q'), &error), [Action::Quit]);
    }

    #[test]
    fn test_source_keys() {
        let v = view(Status::Stopped, 0, 0);
        assert_eq!(
            key_actions(press('r'), &v),
            [Action::ResumeFrom(ResumeSource::Radio)]
        );
        assert_eq!(
            key_actions(press('l'), &v),
            [Action::ResumeFrom(ResumeSource::Local)]
        );
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_actions(key, &NowPlayingView::default()), [Action::Quit]);
    }
}
