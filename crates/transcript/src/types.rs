/// Which audio pipeline a fragment came from, not who spoke first. The
/// client role is fed by the remote-party capture, the operator role by the
/// local microphone.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Client,
    Operator,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Client => "Client",
            Speaker::Operator => "You",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One finalized utterance in arrival order of its finalize event.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConversationEntry {
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
    pub timestamp_ms: u64,
}

/// What changed as a result of feeding one fragment into the view.
///
/// `new_entry` is set only when a non-empty finalized delta was appended.
/// Interim updates change the combined projection without producing an
/// entry; callers wanting the projection call
/// [`crate::view::ConversationView::combined_transcript`].
#[derive(Debug, Clone, Default)]
pub struct MergeUpdate {
    pub new_entry: Option<ConversationEntry>,
}

pub(crate) fn now_unix_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .min(u64::MAX as u128) as u64
}
