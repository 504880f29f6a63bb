//! Wire schema of the piju server and the `NowPlaying` snapshot decoded from it.
//!
//! The poll body (`GET /`) and every push frame (`/ws`) share one JSON
//! object shape:
//!
//! ```text
//!   PlayerStatus       "stopped" | "playing" | "paused"
//!   CurrentTrack       { "artist": .., "title": .. }   (absent or {} = no track)
//!   CurrentStream      radio stream name
//!   CurrentTrackIndex  1-based track number, 0 = none
//!   MaximumTrackIndex  tracks on the current album
//!   CurrentArtwork     artwork URI, usually root-relative
//!   WorkerStatus       "Idle" or a description of the running scan
//! ```
//!
//! Decoding is lenient about individual fields (wrong type = default) but
//! strict about `PlayerStatus`: without a recognised status nothing else in
//! the payload is trusted.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ProtocolError;

pub const UNKNOWN_ARTIST: &str = "Unknown artist";
pub const UNKNOWN_TRACK: &str = "Unknown track";

/// Playback status reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// No usable observation.  Nothing else in a `NowPlaying` can be trusted.
    #[default]
    Error,
    Stopped,
    Playing,
    Paused,
}

impl Status {
    /// Parse the `PlayerStatus` wire value.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "stopped" => Some(Self::Stopped),
            "playing" => Some(Self::Playing),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }

    /// Wire value, `None` for `Error` (which the server never sends).
    pub fn wire_name(self) -> Option<&'static str> {
        match self {
            Self::Error => None,
            Self::Stopped => Some("stopped"),
            Self::Playing => Some("playing"),
            Self::Paused => Some("paused"),
        }
    }

    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Stopped => 1,
            Self::Playing => 2,
            Self::Paused => 3,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Stopped,
            2 => Self::Playing,
            3 => Self::Paused,
            _ => Self::Error,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name().unwrap_or("error"))
    }
}

/// Player the server should resume from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeSource {
    Local,
    Radio,
    Link,
}

impl ResumeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Radio => "radio",
            Self::Link => "link",
        }
    }
}

/// Body of `POST player/resume` when a source is selected.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeRequest {
    pub player: ResumeSource,
}

/// One observation of remote playback state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NowPlaying {
    /// If this is `Error`, no other field can be relied upon.
    pub status: Status,
    pub is_track: bool,
    pub artist_name: String,
    pub track_name: String,
    pub stream_name: String,
    pub track_number: u32,
    pub album_tracks: u32,
    /// Artwork reference exactly as the server sent it.
    pub artwork_uri: String,
    /// Immutable snapshot of the artwork bytes; cheap to clone.
    pub artwork: Option<Bytes>,
    /// Library scan in progress on the server.
    pub scanning: bool,
}

impl NowPlaying {
    /// The observation used for every transport or decode failure.
    pub fn error() -> Self {
        Self::default()
    }

    pub fn with_status(status: Status) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

/// Decode a poll body or push frame.  Artwork is left unresolved.
pub fn decode(body: &[u8]) -> Result<NowPlaying, ProtocolError> {
    let value: Value = serde_json::from_slice(body)?;
    decode_value(&value)
}

pub fn decode_value(value: &Value) -> Result<NowPlaying, ProtocolError> {
    let reply = value.as_object().ok_or(ProtocolError::NotAnObject)?;

    let status = match reply.get("PlayerStatus") {
        None | Some(Value::Null) => return Err(ProtocolError::MissingStatus),
        Some(Value::String(s)) => {
            Status::from_wire(s).ok_or_else(|| ProtocolError::UnknownStatus(s.clone()))?
        }
        Some(other) => return Err(ProtocolError::UnknownStatus(other.to_string())),
    };

    let stream_name = string_field(reply, "CurrentStream");
    let (is_track, artist_name, track_name) = match reply.get("CurrentTrack") {
        Some(Value::Object(track)) if !track.is_empty() => (
            true,
            track
                .get("artist")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_ARTIST)
                .to_string(),
            track
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_TRACK)
                .to_string(),
        ),
        _ => (false, String::new(), String::new()),
    };

    Ok(NowPlaying {
        status,
        is_track,
        artist_name,
        track_name,
        stream_name,
        track_number: index_field(reply, "CurrentTrackIndex"),
        album_tracks: index_field(reply, "MaximumTrackIndex"),
        artwork_uri: string_field(reply, "CurrentArtwork"),
        artwork: None,
        scanning: scanning_field(reply),
    })
}

/// Encode a snapshot back into the wire schema.  `Error` has no wire form,
/// so `PlayerStatus` is omitted for it.
pub fn encode(now: &NowPlaying) -> Value {
    let mut reply = Map::new();
    if let Some(status) = now.status.wire_name() {
        reply.insert("PlayerStatus".into(), json!(status));
    }
    if now.is_track {
        reply.insert(
            "CurrentTrack".into(),
            json!({ "artist": now.artist_name, "title": now.track_name }),
        );
    } else {
        reply.insert("CurrentTrack".into(), json!({}));
    }
    reply.insert("CurrentStream".into(), json!(now.stream_name));
    reply.insert("CurrentTrackIndex".into(), json!(now.track_number));
    reply.insert("MaximumTrackIndex".into(), json!(now.album_tracks));
    reply.insert("CurrentArtwork".into(), json!(now.artwork_uri));
    reply.insert(
        "WorkerStatus".into(),
        json!(if now.scanning { "Scanning" } else { "Idle" }),
    );
    Value::Object(reply)
}

fn string_field(reply: &Map<String, Value>, key: &str) -> String {
    reply
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// JSON numbers may arrive as floats; truncate and clamp negatives to 0.
fn index_field(reply: &Map<String, Value>, key: &str) -> u32 {
    reply
        .get(key)
        .and_then(Value::as_f64)
        .map(|n| n as u32)
        .unwrap_or(0)
}

fn scanning_field(reply: &Map<String, Value>) -> bool {
    reply
        .get("WorkerStatus")
        .and_then(Value::as_str)
        .map(|s| !s.eq_ignore_ascii_case("idle"))
        .unwrap_or(false)
}
