#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("stream api key is missing")]
    MissingApiKey,
    #[error("stream connection not established within the timeout")]
    ConnectTimeout,
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    InvalidUri(#[from] tokio_tungstenite::tungstenite::http::uri::InvalidUri),
    #[error(transparent)]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("audio sink is closed")]
    AudioSinkClosed,
}
