//! Terminal renderer.
//!
//! Layout:
//! ```text
//!   ● piju @ host                          [radio]  push
//!   ┌ Now playing ───────────────────────┐┌ Link ────────┐
//!   │ Title                              ││ http://…/    │
//!   │ Artist                             ││              │
//!   │ 2 / 9   scanning…                  ││              │
//!   └────────────────────────────────────┘└──────────────┘
//!   b prev   space ⏸   n next   l local  r radio  k link  q quit
//!   last log line
//! ```
//! Everything drawn here is derived from `NowPlayingView`; no network state
//! is read directly.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use piju_client::config::PowerProfile;
use piju_client::{ResumeSource, Status};

use crate::theme::{
    style_accent, style_border, style_control, style_default, style_muted, style_secondary,
    style_title, C_CONNECTING, C_ERROR, C_NETWORK, C_PLAYING, C_SECONDARY, C_SEPARATOR, C_TAG,
};
use crate::view::NowPlayingView;

/// Everything one frame needs.
pub struct Screen<'a> {
    pub view: &'a NowPlayingView,
    pub host: &'a str,
    /// Web UI address shown in the link panel.
    pub link: &'a str,
    pub connected: bool,
    pub show_link: bool,
    pub profile: PowerProfile,
    pub last_log: Option<&'a str>,
}

pub fn draw(frame: &mut Frame, screen: &Screen) {
    let [header, body, controls, log] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header, screen);

    if screen.show_link {
        let [now, link] =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(body);
        draw_now_playing(frame, now, screen.view);
        draw_link_panel(frame, link, screen.link);
    } else {
        draw_now_playing(frame, body, screen.view);
    }

    draw_controls(frame, controls, screen);
    draw_log_bar(frame, log, screen.last_log);
}

fn status_color(status: Status) -> ratatui::style::Color {
    match status {
        Status::Playing => C_PLAYING,
        Status::Paused => C_CONNECTING,
        Status::Stopped => C_SECONDARY,
        Status::Error => C_ERROR,
    }
}

fn draw_header(frame: &mut Frame, area: Rect, screen: &Screen) {
    let status = screen.view.status;
    let mut spans = vec![
        Span::styled("● ", Style::default().fg(status_color(status))),
        Span::styled("piju", style_title()),
        Span::styled(" @ ", style_muted()),
        Span::styled(screen.host, Style::default().fg(C_NETWORK)),
        Span::styled("  │  ", Style::default().fg(C_SEPARATOR)),
        Span::styled(status.to_string(), Style::default().fg(status_color(status))),
    ];
    if let Some(source) = screen.view.source {
        spans.push(Span::styled("  │  ", Style::default().fg(C_SEPARATOR)));
        spans.push(Span::styled(
            format!("[{}]", source.as_str()),
            Style::default().fg(C_TAG),
        ));
    }
    spans.push(Span::styled("  │  ", Style::default().fg(C_SEPARATOR)));
    spans.push(if screen.connected {
        Span::styled("push", Style::default().fg(C_PLAYING))
    } else {
        Span::styled("polling", Style::default().fg(C_CONNECTING))
    });
    if screen.profile != PowerProfile::None {
        spans.push(Span::styled(
            format!("  screen:{:?}", screen.profile).to_lowercase(),
            style_muted(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_now_playing(frame: &mut Frame, area: Rect, view: &NowPlayingView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style_border(view.status == Status::Playing))
        .title(Span::styled(" Now playing ", style_secondary()));

    let headline_style = if view.status == Status::Error {
        style_accent()
    } else {
        style_title()
    };
    let mut lines = vec![Line::from(Span::styled(
        view.headline.primary().to_string(),
        headline_style,
    ))];
    if let Some(artist) = view.headline.secondary() {
        lines.push(Line::from(Span::styled(artist.to_string(), style_default())));
    }
    lines.push(Line::default());

    let mut detail = Vec::new();
    if let Some((n, of)) = view.position {
        detail.push(Span::styled(format!("{n} / {of}"), style_secondary()));
    }
    if let Some(len) = view.artwork_bytes {
        if !detail.is_empty() {
            detail.push(Span::raw("   "));
        }
        detail.push(Span::styled(format!("artwork {}", human_size(len)), style_muted()));
    }
    if view.scanning {
        if !detail.is_empty() {
            detail.push(Span::raw("   "));
        }
        detail.push(Span::styled("scanning…", Style::default().fg(C_CONNECTING)));
    }
    lines.push(Line::from(detail));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_link_panel(frame: &mut Frame, area: Rect, link: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style_border(true))
        .title(Span::styled(" Link ", style_secondary()));
    let lines = vec![
        Line::from(Span::styled("Open on your phone:", style_secondary())),
        Line::from(Span::styled(link.to_string(), Style::default().fg(C_NETWORK))),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_controls(frame: &mut Frame, area: Rect, screen: &Screen) {
    let view = screen.view;
    let live = view.status != Status::Error;
    let source_style = |source: ResumeSource| {
        if view.source == Some(source) || (source == ResumeSource::Link && screen.show_link) {
            Style::default().fg(C_TAG)
        } else {
            style_control(live)
        }
    };
    let sep = || Span::styled("   ", Style::default());
    let spans = vec![
        Span::styled("b prev", style_control(view.previous_enabled)),
        sep(),
        Span::styled(
            format!("space {}", view.play_pause.icon()),
            style_control(view.play_pause.enabled()),
        ),
        sep(),
        Span::styled("n next", style_control(view.next_enabled)),
        Span::styled("  │  ", Style::default().fg(C_SEPARATOR)),
        Span::styled("l local", source_style(ResumeSource::Local)),
        sep(),
        Span::styled("r radio", source_style(ResumeSource::Radio)),
        sep(),
        Span::styled("k link", source_style(ResumeSource::Link)),
        Span::styled("  │  ", Style::default().fg(C_SEPARATOR)),
        Span::styled("q quit", style_secondary()),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>) {
    let text = last_log.unwrap_or("");
    frame.render_widget(Paragraph::new(Span::styled(text.to_string(), style_muted())), area);
}

fn human_size(len: usize) -> String {
    if len >= 1024 * 1024 {
        format!("{:.1} MiB", len as f64 / (1024.0 * 1024.0))
    } else if len >= 1024 {
        format!("{:.1} KiB", len as f64 / 1024.0)
    } else {
        format!("{len} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piju_client::NowPlaying;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(screen: &Screen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        terminal.draw(|f| draw(f, screen)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_error_view_shows_connection_error() {
        let view = NowPlayingView::default();
        let text = render(&Screen {
            view: &view,
            host: "http://piju:5000/",
            link: "http://piju/",
            connected: false,
            show_link: false,
            profile: PowerProfile::None,
            last_log: Some("push connection failed"),
        });
        assert!(text.contains("Connection error"));
        assert!(text.contains("polling"));
        assert!(text.contains("push connection failed"));
    }

    #[test]
    fn test_track_and_link_panel() {
        let now = NowPlaying {
            status: Status::Playing,
            is_track: true,
            artist_name: "Artist".into(),
            track_name: "Title".into(),
            track_number: 2,
            album_tracks: 9,
            ..NowPlaying::default()
        };
        let view = NowPlayingView::from_now_playing(&now);
        let text = render(&Screen {
            view: &view,
            host: "http://piju:5000/",
            link: "http://piju/",
            connected: true,
            show_link: true,
            profile: PowerProfile::OnOff,
            last_log: None,
        });
        assert!(text.contains("Title"));
        assert!(text.contains("Artist"));
        assert!(text.contains("2 / 9"));
        assert!(text.contains("Link"));
        assert!(text.contains("http://piju/"));
        assert!(text.contains("screen:onoff"));
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
    }
}
