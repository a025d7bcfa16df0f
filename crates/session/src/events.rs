use coach_analysis::AnalysisRecord;
use coach_transcript::{ConversationEntry, Speaker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Inactive,
    Active,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionLifecycleEvent {
    Active { session_id: String },
    Inactive { session_id: String },
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionDataEvent {
    EntryAdded {
        session_id: String,
        entry: ConversationEntry,
    },
    CombinedUpdated {
        session_id: String,
        combined: String,
    },
    AnalysisStarted {
        session_id: String,
    },
    AnalysisCompleted {
        session_id: String,
        record: AnalysisRecord,
    },
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionErrorEvent {
    StreamClosed {
        session_id: String,
        speaker: Speaker,
        reason: String,
    },
    /// The advisory call failed; previously recorded history is untouched
    /// and the next qualifying trigger (or a manual request) may retry.
    AnalysisFailed {
        session_id: String,
        message: String,
        retryable: bool,
    },
}

/// Read-only projection of session state for the presentation layer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub state: State,
    pub entries: Vec<ConversationEntry>,
    pub combined: String,
    pub latest_analysis: Option<AnalysisRecord>,
    pub analysis_history: Vec<AnalysisRecord>,
}
