use std::time::Duration;

use coach_analysis::AnalysisClient;
use coach_stt_client::ListenClient;

use crate::error::Error;

/// Gates for the coaching trigger. Defaults mirror the tuning the product
/// shipped with: rapid finalize events from one utterance coalesce behind a
/// 2 s debounce, calls start at least 5 s apart, and a trigger needs 50
/// characters of not-yet-analyzed client text.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    pub debounce: Duration,
    pub cooldown: Duration,
    pub min_new_content: usize,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(2),
            cooldown: Duration::from_secs(5),
            min_new_content: 50,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub trigger: TriggerConfig,
}

/// Credentials picked up from the environment (`COACH_DEEPGRAM_API_KEY`,
/// `COACH_OPENAI_API_KEY`).
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CoachEnv {
    #[serde(default)]
    pub deepgram_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

impl CoachEnv {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("COACH_").from_env()
    }

    /// Stream client for one speaker role; each role connects its own.
    pub fn listen_client(&self) -> Result<ListenClient, Error> {
        ListenClient::builder()
            .api_key(self.deepgram_api_key.as_deref().unwrap_or_default())
            .build()
            .map_err(|_| Error::MissingCredentials)
    }

    pub fn analysis_client(&self) -> Result<AnalysisClient, Error> {
        AnalysisClient::builder()
            .api_key(self.openai_api_key.as_deref().unwrap_or_default())
            .build()
            .map_err(|error| Error::AnalysisUnavailable(error.to_string()))
    }
}
