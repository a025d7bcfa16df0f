use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use coach_stt_client::{AudioSink, ListenClient};
use coach_stt_interface::StreamEvent;
use coach_transcript::Speaker;

use crate::error::Error;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One connected stream, ready for the session loop: events to select on,
/// an optional sink for the audio acquisition layer, and the token that
/// tears the stream down on session stop.
pub struct StreamHandle {
    pub events: mpsc::Receiver<StreamEvent>,
    pub audio: Option<AudioSink>,
    pub cancel: CancellationToken,
}

/// Seam over stream establishment so the session loop can be driven by
/// scripted streams in tests. Object-safe via `BoxFuture`.
pub trait StreamConnector: Send + Sync {
    fn connect<'a>(&'a self, speaker: Speaker) -> BoxFuture<'a, Result<StreamHandle, Error>>;
}

/// Connects both roles to the same live transcription endpoint, one socket
/// per role.
pub struct ListenConnector {
    client: ListenClient,
}

impl ListenConnector {
    pub fn new(client: ListenClient) -> Self {
        Self { client }
    }
}

impl StreamConnector for ListenConnector {
    fn connect<'a>(&'a self, speaker: Speaker) -> BoxFuture<'a, Result<StreamHandle, Error>> {
        Box::pin(async move {
            let stream = self.client.connect().await.map_err(|source| match source {
                coach_stt_client::Error::MissingApiKey => Error::MissingCredentials,
                source => Error::StreamUnavailable { speaker, source },
            })?;

            let (events, audio, cancel) = stream.into_parts();
            Ok(StreamHandle {
                events,
                audio: Some(audio),
                cancel,
            })
        })
    }
}
