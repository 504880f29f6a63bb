use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can go wrong talking to the server.  None of these are
/// fatal: callers turn them into `Status::Error` or keep their last good value.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("push channel error: {0}")]
    PushChannel(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("server returned {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("invalid payload: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The payload arrived but cannot be trusted.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply is not a JSON object")]
    NotAnObject,
    #[error("reply has no PlayerStatus")]
    MissingStatus,
    #[error("unrecognised player status {0}")]
    UnknownStatus(String),
}
