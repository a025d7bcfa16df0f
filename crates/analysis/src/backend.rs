use std::future::Future;
use std::pin::Pin;

use crate::client::AnalysisClient;
use crate::error::Error;
use crate::types::SuggestedResponse;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe seam over the advisory-analysis call so the session loop can
/// run against a scripted backend in tests. Use `dyn AnalysisBackend` for
/// dynamic dispatch.
pub trait AnalysisBackend: Send + Sync {
    fn analyze<'a>(
        &'a self,
        conversation: &'a str,
    ) -> BoxFuture<'a, Result<Vec<SuggestedResponse>, Error>>;
}

impl AnalysisBackend for AnalysisClient {
    fn analyze<'a>(
        &'a self,
        conversation: &'a str,
    ) -> BoxFuture<'a, Result<Vec<SuggestedResponse>, Error>> {
        Box::pin(AnalysisClient::analyze(self, conversation))
    }
}
