use crate::error::Error;
use crate::types::{AnalysisPayload, ApiErrorBody, ChatCompletionResponse, SuggestedResponse};

pub const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const SYSTEM_PROMPT: &str = r#"You are a real-time AI sales coach providing INSTANT analysis during live sales conversations.

CONTEXT: This is a LIVE conversation happening RIGHT NOW. The salesperson needs immediate, actionable guidance to influence the client's decision in real-time.

CONVERSATION FORMAT:
- "Client:" = prospect/client speaking
- "You:" = salesperson speaking

Behavior rules:
- Only give suggestions after the client speaks.
- Keep suggestions short (1-2 lines) and conversational.
- Stay neutral and non-pushy, but persuasive and helpful.

Return analysis in this JSON format:
{
  "suggestedResponses": [
    {
      "situation": "when client says X",
      "response": "exact phrase/question to use",
      "outcome": "expected result"
    }
  ]
}
Do not include any markdown formatting. Only return raw JSON."#;

/// Client for the external advisory-analysis call (OpenAI-compatible chat
/// completions). Transport errors, non-success statuses, and unparsable
/// bodies are all one "analysis failed" outcome to the caller; the error
/// enum keeps them apart for logging.
pub struct AnalysisClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Default)]
pub struct AnalysisClientBuilder {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    http: Option<reqwest::Client>,
}

impl AnalysisClientBuilder {
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<AnalysisClient, Error> {
        let api_key = match self.api_key {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => return Err(Error::MissingApiKey),
        };

        Ok(AnalysisClient {
            http: self.http.unwrap_or_default(),
            api_base: self
                .api_base
                .unwrap_or_else(|| OPENAI_CHAT_COMPLETIONS_URL.to_string()),
            api_key,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }
}

impl AnalysisClient {
    pub fn builder() -> AnalysisClientBuilder {
        AnalysisClientBuilder::default()
    }

    /// Submit the combined conversation text and return the suggested
    /// responses (possibly empty).
    pub async fn analyze(&self, conversation: &str) -> Result<Vec<SuggestedResponse>, Error> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "LIVE SALES CONVERSATION (analyze for immediate action):\n\n{conversation}\n\nProvide instant analysis focusing on what the salesperson should do RIGHT NOW to influence this client's decision."
                    ),
                },
            ],
            "max_tokens": 1000,
            "temperature": 0.2,
        });

        let response = self
            .http
            .post(&self.api_base)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .map(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or("{}");

        let payload: AnalysisPayload = serde_json::from_str(strip_code_fences(content))?;
        tracing::debug!(
            suggestions = payload.suggested_responses.len(),
            "analysis_completed"
        );

        Ok(payload.suggested_responses)
    }
}

// Models wrap JSON in fences despite being told not to.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_code_fences() {
        let fenced = "```json\n{\"suggestedResponses\": []}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"suggestedResponses\": []}");
    }

    #[test]
    fn strips_bare_code_fences() {
        let fenced = "```\n{}\n```";
        assert_eq!(strip_code_fences(fenced), "{}");
    }

    #[test]
    fn leaves_raw_json_untouched() {
        let raw = "{\"suggestedResponses\": []}";
        assert_eq!(strip_code_fences(raw), raw);
    }

    #[test]
    fn build_without_api_key_fails() {
        assert!(matches!(
            AnalysisClient::builder().build(),
            Err(Error::MissingApiKey)
        ));
        assert!(matches!(
            AnalysisClient::builder().api_key("  ").build(),
            Err(Error::MissingApiKey)
        ));
    }
}
