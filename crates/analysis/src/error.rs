#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("analysis api key is missing")]
    MissingApiKey,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("analysis call returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unparsable analysis result body: {0}")]
    Parse(#[from] serde_json::Error),
}
