use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::ClientRequestBuilder;
use tokio_tungstenite::tungstenite::http::Uri;
use tokio_util::sync::CancellationToken;

use coach_stt_interface::{StreamEvent, StreamResponse};

use crate::{Error, ListenClient};

const EVENT_CHANNEL_CAPACITY: usize = 64;
const AUDIO_CHANNEL_CAPACITY: usize = 256;

/// A connected speech stream: parsed transcript events out, opaque audio
/// bytes in. Dropping the handles without calling [`LiveStream::close`]
/// leaves the socket to be torn down when the remote side closes.
pub struct LiveStream {
    events: mpsc::Receiver<StreamEvent>,
    audio: mpsc::Sender<Bytes>,
    cancel: CancellationToken,
}

/// Clonable sink for raw encoded audio. The audio acquisition layer is an
/// external collaborator; bytes are forwarded as-is.
#[derive(Clone)]
pub struct AudioSink(mpsc::Sender<Bytes>);

impl AudioSink {
    pub async fn send(&self, bytes: Bytes) -> Result<(), Error> {
        self.0.send(bytes).await.map_err(|_| Error::AudioSinkClosed)
    }
}

impl ListenClient {
    /// Open the stream. Fails with [`Error::ConnectTimeout`] when the
    /// handshake does not complete within the configured timeout; the
    /// connection attempt is abandoned, nothing else is torn down.
    pub async fn connect(&self) -> Result<LiveStream, Error> {
        let url = self.params.build_ws_url(&self.api_base)?;
        let uri: Uri = url.as_str().parse()?;
        let request = ClientRequestBuilder::new(uri)
            .with_header("Authorization", format!("Token {}", self.api_key));

        let (ws, _response) = tokio::time::timeout(self.connect_timeout, connect_async(request))
            .await
            .map_err(|_| Error::ConnectTimeout)??;

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (audio_tx, audio_rx) = mpsc::channel(AUDIO_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        tokio::spawn(run_stream(ws, event_tx, audio_rx, cancel.clone()));

        Ok(LiveStream {
            events: event_rx,
            audio: audio_tx,
            cancel,
        })
    }
}

impl LiveStream {
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    pub fn audio_sink(&self) -> AudioSink {
        AudioSink(self.audio.clone())
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn into_parts(self) -> (mpsc::Receiver<StreamEvent>, AudioSink, CancellationToken) {
        (self.events, AudioSink(self.audio), self.cancel)
    }
}

async fn run_stream<S>(
    ws: tokio_tungstenite::WebSocketStream<S>,
    event_tx: mpsc::Sender<StreamEvent>,
    mut audio_rx: mpsc::Receiver<Bytes>,
    cancel: CancellationToken,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut sink, mut stream) = ws.split();
    let mut audio_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
            audio = audio_rx.recv(), if audio_open => {
                match audio {
                    Some(bytes) => {
                        if let Err(error) = sink.send(Message::Binary(bytes)).await {
                            tracing::warn!(?error, "audio_send_failed");
                            break;
                        }
                    }
                    // Audio side dropped; keep receiving transcripts.
                    None => audio_open = false,
                }
            }
            message = stream.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        handle_payload(text.as_str(), &event_tx).await;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = frame
                            .map(|f| (Some(u16::from(f.code)), f.reason.to_string()))
                            .unwrap_or((None, String::new()));
                        let _ = event_tx.send(StreamEvent::Closed { code, reason }).await;
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        tracing::warn!(?error, "stream_read_failed");
                        let _ = event_tx
                            .send(StreamEvent::Closed {
                                code: None,
                                reason: error.to_string(),
                            })
                            .await;
                        break;
                    }
                    None => {
                        let _ = event_tx
                            .send(StreamEvent::Closed { code: None, reason: String::new() })
                            .await;
                        break;
                    }
                }
            }
        }
    }
}

/// A malformed payload is dropped and the stream continues; one bad event
/// must not abort the stream, let alone the session.
async fn handle_payload(payload: &str, event_tx: &mpsc::Sender<StreamEvent>) {
    match serde_json::from_str::<StreamResponse>(payload) {
        Ok(StreamResponse::ErrorResponse {
            error_code,
            error_message,
        }) => {
            tracing::warn!(?error_code, %error_message, "stream_error_response");
        }
        Ok(response) => {
            if let Some(fragment) = response.to_fragment() {
                let _ = event_tx.send(StreamEvent::Transcript(fragment)).await;
            }
        }
        Err(error) => {
            tracing::warn!(?error, "malformed_stream_payload_dropped");
        }
    }
}
