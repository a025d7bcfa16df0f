mod backend;
mod client;
mod error;
mod history;
mod types;

pub use backend::{AnalysisBackend, BoxFuture};
pub use client::{AnalysisClient, AnalysisClientBuilder, DEFAULT_MODEL, OPENAI_CHAT_COMPLETIONS_URL};
pub use error::Error;
pub use history::{AnalysisHistory, AnalysisRecord, DEFAULT_HISTORY_CAPACITY};
pub use types::SuggestedResponse;
