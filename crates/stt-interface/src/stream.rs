use crate::common_derives;

// Subset of the Deepgram live-streaming response the engine consumes.
// https://developers.deepgram.com/reference/speech-to-text-api/listen-streaming

common_derives! {
    pub struct Word {
        pub word: String,
        pub start: f64,
        pub end: f64,
        pub confidence: f64,
        #[serde(default)]
        pub punctuated_word: Option<String>,
    }
}

common_derives! {
    pub struct Alternatives {
        pub transcript: String,
        #[serde(default)]
        pub confidence: f64,
        #[serde(default)]
        pub words: Vec<Word>,
    }
}

common_derives! {
    pub struct Channel {
        pub alternatives: Vec<Alternatives>,
    }
}

common_derives! {
    #[serde(tag = "type")]
    #[non_exhaustive]
    pub enum StreamResponse {
        #[serde(rename = "Results")]
        TranscriptResponse {
            #[serde(default)]
            start: f64,
            #[serde(default)]
            duration: f64,
            is_final: bool,
            channel: Channel,
        },
        #[serde(rename = "Metadata")]
        TerminalResponse {
            request_id: String,
            #[serde(default)]
            duration: f64,
            #[serde(default)]
            channels: u32,
        },
        #[serde(rename = "Error")]
        ErrorResponse {
            #[serde(default)]
            error_code: Option<i32>,
            error_message: String,
        },
    }
}

impl StreamResponse {
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamResponse::TranscriptResponse { channel, .. } => {
                channel.alternatives.first().map(|a| a.transcript.as_str())
            }
            _ => None,
        }
    }

    /// Normalize into the fragment the engine consumes. `None` for
    /// non-transcript responses and for results with an empty transcript.
    pub fn to_fragment(&self) -> Option<TranscriptFragment> {
        match self {
            StreamResponse::TranscriptResponse {
                is_final, channel, ..
            } => {
                let alt = channel.alternatives.first()?;
                if alt.transcript.trim().is_empty() {
                    return None;
                }
                Some(TranscriptFragment {
                    text: alt.transcript.clone(),
                    is_final: *is_final,
                })
            }
            _ => None,
        }
    }
}

common_derives! {
    pub struct TranscriptFragment {
        pub text: String,
        pub is_final: bool,
    }
}

impl TranscriptFragment {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn finalized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

common_derives! {
    #[serde(tag = "type")]
    pub enum StreamEvent {
        Transcript(TranscriptFragment),
        Closed {
            #[serde(default)]
            code: Option<u16>,
            #[serde(default)]
            reason: String,
        },
    }
}
