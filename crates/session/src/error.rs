use coach_transcript::Speaker;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("speech credentials are missing")]
    MissingCredentials,
    #[error("speech stream unavailable for {speaker}")]
    StreamUnavailable {
        speaker: Speaker,
        #[source]
        source: coach_stt_client::Error,
    },
    #[error("analysis backend unavailable: {0}")]
    AnalysisUnavailable(String),
    #[error("analysis call already in flight")]
    AnalysisBusy,
    #[error("session is no longer running")]
    SessionClosed,
}
