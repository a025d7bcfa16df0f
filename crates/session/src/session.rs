//! Single-task session runtime.
//!
//! All mutable state (conversation view, trigger scheduler, analysis
//! history) lives inside one spawned task; stream events, timer fires,
//! analysis completions, and control commands all arrive as messages on its
//! queue and are processed one at a time. The debounce timer and the
//! analysis call run as separate tasks, but they only report back through
//! the queue, so nothing mutates concurrently.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::AbortHandle;
use tokio::time::Instant;

use coach_analysis::{AnalysisBackend, AnalysisHistory, AnalysisRecord, SuggestedResponse};
use coach_stt_client::AudioSink;
use coach_stt_interface::{StreamEvent, TranscriptFragment};
use coach_transcript::{ConversationView, Speaker};

use crate::config::SessionConfig;
use crate::connector::{StreamConnector, StreamHandle};
use crate::error::Error;
use crate::events::{
    SessionDataEvent, SessionErrorEvent, SessionLifecycleEvent, SessionSnapshot, State,
};
use crate::runtime::CoachRuntime;
use crate::scheduler::TriggerScheduler;

const MSG_CHANNEL_CAPACITY: usize = 64;

enum SessionMsg {
    DebounceFired {
        generation: u64,
    },
    AnalysisDone {
        trigger_text: String,
        result: Result<Vec<SuggestedResponse>, coach_analysis::Error>,
    },
    Stop {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Clear,
    ForceAnalyze {
        reply: oneshot::Sender<Result<(), Error>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// Control surface for one running session. Dropping the handle does not
/// stop the session; call [`SessionHandle::stop`].
pub struct SessionHandle {
    session_id: String,
    msg_tx: mpsc::Sender<SessionMsg>,
    audio: BTreeMap<Speaker, AudioSink>,
    join: tokio::sync::Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_active(&self) -> bool {
        !self.msg_tx.is_closed()
    }

    /// Sink for the audio acquisition layer to push encoded bytes into,
    /// per role. `None` when that role's stream failed to connect.
    pub fn audio_sink(&self, speaker: Speaker) -> Option<AudioSink> {
        self.audio.get(&speaker).cloned()
    }

    /// Stop the session: cancels the pending debounce timer, tears both
    /// streams down, and discards the result of any in-flight analysis
    /// call. Resolves once the session task has fully wound down, yielding
    /// the final state marked [`State::Inactive`]; `None` when the session
    /// was already gone.
    pub async fn stop(&self) -> Option<SessionSnapshot> {
        let (reply, ack) = oneshot::channel();
        let mut last = None;
        if self
            .msg_tx
            .send(SessionMsg::Stop { reply })
            .await
            .is_ok()
        {
            last = ack.await.ok();
        }
        if let Some(join) = self.join.lock().await.take() {
            let _ = join.await;
        }
        last
    }

    /// Drop conversation history, analysis history, and the trigger
    /// baseline without touching the live streams.
    pub async fn clear_history(&self) -> Result<(), Error> {
        self.msg_tx
            .send(SessionMsg::Clear)
            .await
            .map_err(|_| Error::SessionClosed)
    }

    /// Request an immediate analysis, bypassing the debounce/content/time
    /// gates. Rejected (not queued) while a call is in flight.
    pub async fn force_analyze(&self) -> Result<(), Error> {
        let (reply, response) = oneshot::channel();
        self.msg_tx
            .send(SessionMsg::ForceAnalyze { reply })
            .await
            .map_err(|_| Error::SessionClosed)?;
        response.await.map_err(|_| Error::SessionClosed)?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, Error> {
        let (reply, response) = oneshot::channel();
        self.msg_tx
            .send(SessionMsg::Snapshot { reply })
            .await
            .map_err(|_| Error::SessionClosed)?;
        response.await.map_err(|_| Error::SessionClosed)
    }
}

/// Connect both speech streams and spawn the session task.
///
/// The client stream is required; an operator stream failure degrades the
/// session to client-only (reported through the runtime sink) because the
/// remote party's audio is what drives coaching.
pub async fn start_session(
    connector: &dyn StreamConnector,
    backend: Arc<dyn AnalysisBackend>,
    runtime: Arc<dyn CoachRuntime>,
    config: SessionConfig,
) -> Result<SessionHandle, Error> {
    let session_id = uuid::Uuid::new_v4().to_string();

    let client = connector.connect(Speaker::Client).await?;

    let operator = match connector.connect(Speaker::Operator).await {
        Ok(handle) => handle,
        Err(error) => {
            tracing::warn!(?error, "operator_stream_unavailable");
            runtime.emit_error(SessionErrorEvent::StreamClosed {
                session_id: session_id.clone(),
                speaker: Speaker::Operator,
                reason: error.to_string(),
            });
            closed_stream_handle()
        }
    };

    let mut audio = BTreeMap::new();
    if let Some(sink) = client.audio.clone() {
        audio.insert(Speaker::Client, sink);
    }
    if let Some(sink) = operator.audio.clone() {
        audio.insert(Speaker::Operator, sink);
    }

    let (msg_tx, msg_rx) = mpsc::channel(MSG_CHANNEL_CAPACITY);

    let actor = SessionActor {
        session_id: session_id.clone(),
        backend,
        runtime,
        msg_tx: msg_tx.clone(),
        view: ConversationView::new(),
        history: AnalysisHistory::new(),
        scheduler: TriggerScheduler::new(config.trigger),
        debounce: None,
    };

    let join = tokio::spawn(run_session(actor, msg_rx, client, operator));

    Ok(SessionHandle {
        session_id,
        msg_tx,
        audio,
        join: tokio::sync::Mutex::new(Some(join)),
    })
}

/// Stand-in for a stream that never connected: yields `None` immediately.
fn closed_stream_handle() -> StreamHandle {
    let (_tx, events) = mpsc::channel(1);
    StreamHandle {
        events,
        audio: None,
        cancel: tokio_util::sync::CancellationToken::new(),
    }
}

struct SessionActor {
    session_id: String,
    backend: Arc<dyn AnalysisBackend>,
    runtime: Arc<dyn CoachRuntime>,
    msg_tx: mpsc::Sender<SessionMsg>,
    view: ConversationView,
    history: AnalysisHistory,
    scheduler: TriggerScheduler,
    debounce: Option<AbortHandle>,
}

async fn run_session(
    mut actor: SessionActor,
    mut msg_rx: mpsc::Receiver<SessionMsg>,
    mut client: StreamHandle,
    mut operator: StreamHandle,
) {
    actor
        .runtime
        .emit_lifecycle(SessionLifecycleEvent::Active {
            session_id: actor.session_id.clone(),
        });

    let mut client_open = true;
    let mut operator_open = true;
    let mut stop_ack: Option<oneshot::Sender<SessionSnapshot>> = None;

    loop {
        tokio::select! {
            msg = msg_rx.recv() => {
                match msg {
                    None => break,
                    Some(SessionMsg::Stop { reply }) => {
                        stop_ack = Some(reply);
                        break;
                    }
                    Some(msg) => actor.on_msg(msg),
                }
            }
            event = client.events.recv(), if client_open => {
                client_open = actor.on_stream_event(Speaker::Client, event);
            }
            event = operator.events.recv(), if operator_open => {
                operator_open = actor.on_stream_event(Speaker::Operator, event);
            }
        }
    }

    if let Some(handle) = actor.debounce.take() {
        handle.abort();
    }
    client.cancel.cancel();
    operator.cancel.cancel();

    actor
        .runtime
        .emit_lifecycle(SessionLifecycleEvent::Inactive {
            session_id: actor.session_id.clone(),
        });

    if let Some(ack) = stop_ack {
        let _ = ack.send(actor.snapshot(State::Inactive));
    }
    // msg_rx drops here: any in-flight analysis completion has nowhere to
    // land and is discarded, never applied to the torn-down session.
}

impl SessionActor {
    fn on_msg(&mut self, msg: SessionMsg) {
        match msg {
            SessionMsg::DebounceFired { generation } => self.on_debounce_fired(generation),
            SessionMsg::AnalysisDone {
                trigger_text,
                result,
            } => self.on_analysis_done(trigger_text, result),
            SessionMsg::Clear => self.on_clear(),
            SessionMsg::ForceAnalyze { reply } => {
                let result = self.on_force();
                let _ = reply.send(result);
            }
            SessionMsg::Snapshot { reply } => {
                let _ = reply.send(self.snapshot(State::Active));
            }
            // Stop is intercepted by the loop.
            SessionMsg::Stop { .. } => {}
        }
    }

    /// Returns whether the stream is still open.
    fn on_stream_event(&mut self, speaker: Speaker, event: Option<StreamEvent>) -> bool {
        match event {
            Some(StreamEvent::Transcript(fragment)) => {
                self.on_transcript(speaker, fragment);
                true
            }
            Some(StreamEvent::Closed { code, reason }) => {
                tracing::info!(?speaker, ?code, %reason, "stream_closed");
                self.runtime.emit_error(SessionErrorEvent::StreamClosed {
                    session_id: self.session_id.clone(),
                    speaker,
                    reason,
                });
                false
            }
            None => false,
        }
    }

    fn on_transcript(&mut self, speaker: Speaker, fragment: TranscriptFragment) {
        let update = self.view.apply(speaker, &fragment);

        if let Some(entry) = &update.new_entry {
            self.runtime.emit_data(SessionDataEvent::EntryAdded {
                session_id: self.session_id.clone(),
                entry: entry.clone(),
            });
        }
        self.runtime.emit_data(SessionDataEvent::CombinedUpdated {
            session_id: self.session_id.clone(),
            combined: self.view.combined_transcript(),
        });

        // Only new finalized client speech can trigger coaching.
        if speaker == Speaker::Client && update.new_entry.is_some() {
            let finalized = self.view.finalized_text(Speaker::Client).to_string();
            if let Some(generation) = self
                .scheduler
                .on_client_finalized(&finalized, Instant::now())
            {
                self.arm_debounce(generation);
            }
        }
    }

    fn arm_debounce(&mut self, generation: u64) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }

        let delay = self.scheduler.debounce();
        let tx = self.msg_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionMsg::DebounceFired { generation }).await;
        });
        self.debounce = Some(task.abort_handle());
    }

    fn on_debounce_fired(&mut self, generation: u64) {
        self.debounce = None;
        if self.scheduler.on_debounce_fired(generation, Instant::now()) {
            self.start_analysis();
        }
    }

    fn on_force(&mut self) -> Result<(), Error> {
        self.scheduler
            .force(Instant::now())
            .map_err(|_| Error::AnalysisBusy)?;
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
        self.start_analysis();
        Ok(())
    }

    fn start_analysis(&mut self) {
        let combined = self.view.combined_transcript();
        let trigger_text = self.view.finalized_text(Speaker::Client).to_string();

        self.runtime.emit_data(SessionDataEvent::AnalysisStarted {
            session_id: self.session_id.clone(),
        });

        let backend = Arc::clone(&self.backend);
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let result = backend.analyze(&combined).await;
            let _ = tx
                .send(SessionMsg::AnalysisDone {
                    trigger_text,
                    result,
                })
                .await;
        });
    }

    fn on_analysis_done(
        &mut self,
        trigger_text: String,
        result: Result<Vec<SuggestedResponse>, coach_analysis::Error>,
    ) {
        self.scheduler.on_call_completed(&trigger_text);

        match result {
            Ok(suggestions) => {
                let record = AnalysisRecord::new(trigger_text, suggestions);
                self.history.record(record.clone());
                self.runtime.emit_data(SessionDataEvent::AnalysisCompleted {
                    session_id: self.session_id.clone(),
                    record,
                });
            }
            Err(error) => {
                tracing::warn!(?error, "analysis_call_failed");
                self.runtime.emit_error(SessionErrorEvent::AnalysisFailed {
                    session_id: self.session_id.clone(),
                    message: error.to_string(),
                    retryable: true,
                });
            }
        }
    }

    fn on_clear(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
        self.view.clear();
        self.history.clear();
        self.scheduler.reset();
        self.runtime.emit_data(SessionDataEvent::CombinedUpdated {
            session_id: self.session_id.clone(),
            combined: String::new(),
        });
    }

    fn snapshot(&self, state: State) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            state,
            entries: self.view.entries().to_vec(),
            combined: self.view.combined_transcript(),
            latest_analysis: self.history.latest().cloned(),
            analysis_history: self.history.iter().cloned().collect(),
        }
    }
}
