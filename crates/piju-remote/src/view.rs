//! What the front-end shows for one `NowPlaying` observation.
//!
//! Pure data, no I/O: the renderer draws it and the key handlers consult it
//! to decide whether a control is live.

use piju_client::{NowPlaying, ResumeSource, Status};

pub const CONNECTION_ERROR: &str = "Connection error";
pub const NO_TRACK: &str = "No track";

/// What the play/pause control does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPause {
    /// Shows "play", does nothing.
    Inactive,
    /// Shows "pause", sends pause.
    Pause,
    /// Shows "play", sends resume.
    Resume,
}

impl PlayPause {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Pause => "⏸",
            Self::Inactive | Self::Resume => "▶",
        }
    }

    pub fn enabled(self) -> bool {
        self != Self::Inactive
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Headline {
    ConnectionError,
    Track { artist: String, title: String },
    Stream(String),
    NoTrack,
}

impl Headline {
    pub fn primary(&self) -> &str {
        match self {
            Self::ConnectionError => CONNECTION_ERROR,
            Self::Track { title, .. } => title,
            Self::Stream(name) => name,
            Self::NoTrack => NO_TRACK,
        }
    }

    pub fn secondary(&self) -> Option<&str> {
        match self {
            Self::Track { artist, .. } => Some(artist),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingView {
    pub status: Status,
    pub headline: Headline,
    pub play_pause: PlayPause,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    /// `Some((n, of))` when the track position is meaningful.
    pub position: Option<(u32, u32)>,
    /// Player the server is currently using; `None` while in error.
    pub source: Option<ResumeSource>,
    pub scanning: bool,
    pub artwork_bytes: Option<usize>,
}

impl NowPlayingView {
    pub fn from_now_playing(now: &NowPlaying) -> Self {
        if now.is_error() {
            return Self {
                status: Status::Error,
                headline: Headline::ConnectionError,
                play_pause: PlayPause::Inactive,
                previous_enabled: false,
                next_enabled: false,
                position: None,
                source: None,
                scanning: false,
                artwork_bytes: None,
            };
        }

        let headline = if now.is_track {
            Headline::Track {
                artist: now.artist_name.clone(),
                title: now.track_name.clone(),
            }
        } else if !now.stream_name.is_empty() {
            Headline::Stream(now.stream_name.clone())
        } else {
            Headline::NoTrack
        };

        let play_pause = match now.status {
            Status::Playing => PlayPause::Pause,
            Status::Paused => PlayPause::Resume,
            Status::Stopped | Status::Error => PlayPause::Inactive,
        };

        let (previous_enabled, next_enabled, position) =
            match track_position(now.track_number, now.album_tracks) {
                Some((n, of)) => (n > 1, n < of, Some((n, of))),
                None => (false, false, None),
            };

        let source = if now.stream_name.is_empty() {
            ResumeSource::Local
        } else {
            ResumeSource::Radio
        };

        Self {
            status: now.status,
            headline,
            play_pause,
            previous_enabled,
            next_enabled,
            position,
            source: Some(source),
            scanning: now.scanning,
            artwork_bytes: now.artwork.as_ref().map(|b| b.len()),
        }
    }
}

impl Default for NowPlayingView {
    fn default() -> Self {
        Self::from_now_playing(&NowPlaying::error())
    }
}

fn track_position(track_number: u32, album_tracks: u32) -> Option<(u32, u32)> {
    if track_number == 0 || album_tracks == 0 || track_number > album_tracks {
        return None;
    }
    Some((track_number, album_tracks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(status: Status, n: u32, of: u32) -> NowPlaying {
        NowPlaying {
            status,
            is_track: true,
            artist_name: "Artist".into(),
            track_name: "Title".into(),
            track_number: n,
            album_tracks: of,
            ..NowPlaying::default()
        }
    }

    #[test]
    fn test_error_disables_everything() {
        let mut now = track(Status::Error, 2, 5);
        now.scanning = true;
        let view = NowPlayingView::from_now_playing(&now);
        assert_eq!(view.headline, Headline::ConnectionError);
        assert_eq!(view.headline.primary(), CONNECTION_ERROR);
        assert!(!view.play_pause.enabled());
        assert!(!view.previous_enabled && !view.next_enabled);
        assert!(!view.scanning);
        assert_eq!(view.source, None);
    }

    #[test]
    fn test_headline_fallbacks() {
        let view = NowPlayingView::from_now_playing(&track(Status::Playing, 1, 1));
        assert_eq!(view.headline.primary(), "Title");
        assert_eq!(view.headline.secondary(), Some("Artist"));

        let stream = NowPlaying {
            status: Status::Playing,
            stream_name: "Radio 3".into(),
            ..NowPlaying::default()
        };
        let view = NowPlayingView::from_now_playing(&stream);
        assert_eq!(view.headline, Headline::Stream("Radio 3".into()));
        assert_eq!(view.source, Some(ResumeSource::Radio));

        let idle = NowPlaying::with_status(Status::Stopped);
        let view = NowPlayingView::from_now_playing(&idle);
        assert_eq!(view.headline.primary(), NO_TRACK);
        assert_eq!(view.source, Some(ResumeSource::Local));
    }

    #[test]
    fn test_play_pause_follows_status() {
        let cases = [
            (Status::Stopped, PlayPause::Inactive, "▶"),
            (Status::Playing, PlayPause::Pause, "⏸"),
            (Status::Paused, PlayPause::Resume, "▶"),
        ];
        for (status, expected, icon) in cases {
            let view = NowPlayingView::from_now_playing(&track(status, 1, 3));
            assert_eq!(view.play_pause, expected, "{status}");
            assert_eq!(view.play_pause.icon(), icon);
        }
    }

    #[test]
    fn test_prev_next_gating() {
        let cases = [
            // (track_number, album_tracks, previous, next)
            (1, 5, false, true),
            (3, 5, true, true),
            (5, 5, true, false),
            (1, 1, false, false),
            (0, 5, false, false),
            (3, 0, false, false),
            (6, 5, false, false),
        ];
        for (n, of, previous, next) in cases {
            let view = NowPlayingView::from_now_playing(&track(Status::Playing, n, of));
            assert_eq!(view.previous_enabled, previous, "{n}/{of} previous");
            assert_eq!(view.next_enabled, next, "{n}/{of} next");
        }
    }

    #[test]
    fn test_position_only_when_meaningful() {
        let view = NowPlayingView::from_now_playing(&track(Status::Paused, 2, 9));
        assert_eq!(view.position, Some((2, 9)));
        let view = NowPlayingView::from_now_playing(&track(Status::Paused, 10, 9));
        assert_eq!(view.position, None);
    }

    #[test]
    fn test_scanning_and_artwork_pass_through() {
        let mut now = track(Status::Stopped, 0, 0);
        now.scanning = true;
        now.artwork = Some(bytes::Bytes::from_static(b"abcd"));
        let view = NowPlayingView::from_now_playing(&now);
        assert!(view.scanning);
        assert_eq!(view.artwork_bytes, Some(4));
    }
}
