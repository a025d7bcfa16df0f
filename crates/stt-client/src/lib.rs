mod error;
mod live;

pub use error::Error;
pub use live::{AudioSink, LiveStream};

use std::time::Duration;

use coach_stt_interface::ListenParams;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for one live speech-to-text stream. Each speaker role gets its own
/// independently connected instance.
#[derive(Debug, Clone)]
pub struct ListenClient {
    pub(crate) api_base: String,
    pub(crate) api_key: String,
    pub(crate) params: ListenParams,
    pub(crate) connect_timeout: Duration,
}

#[derive(Debug, Default)]
pub struct ListenClientBuilder {
    api_base: Option<String>,
    api_key: Option<String>,
    params: Option<ListenParams>,
    connect_timeout: Option<Duration>,
}

impl ListenClientBuilder {
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn params(mut self, params: ListenParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ListenClient, Error> {
        let api_key = match self.api_key {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => return Err(Error::MissingApiKey),
        };

        Ok(ListenClient {
            api_base: self
                .api_base
                .unwrap_or_else(|| "wss://api.deepgram.com/v1/listen".to_string()),
            api_key,
            params: self.params.unwrap_or_default(),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        })
    }
}

impl ListenClient {
    pub fn builder() -> ListenClientBuilder {
        ListenClientBuilder::default()
    }
}
