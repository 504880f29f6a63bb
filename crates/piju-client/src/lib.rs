//! Client side of the piju music server: status synchronisation (poll and
//! push), artwork caching and transport commands.

pub mod artwork;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod platform;
pub mod protocol;

pub use artwork::ArtworkCache;
pub use client::StatusClient;
pub use command::CommandSender;
pub use error::{ClientError, ClientResult, ProtocolError};
pub use host::ServerHost;
pub use protocol::{NowPlaying, ResumeSource, Status};
