/// One suggestion the advisory model returned for the operator.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedResponse {
    #[serde(default)]
    pub situation: String,
    pub response: String,
    #[serde(default)]
    pub outcome: String,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct AnalysisPayload {
    #[serde(default, rename = "suggestedResponses")]
    pub suggested_responses: Vec<SuggestedResponse>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}
