//! Groq backend, via its OpenAI-compatible chat completions endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::analysis::prompts::{build_review_prompt, REVIEW_SYSTEM};
use crate::analysis::provider::{
    parse_analysis_response, AnalysisProvider, AnalyzeOptions, ProviderError,
};
use crate::models::resume::ResumeAnalysis;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 120;
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct GroqProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl GroqProvider {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl AnalysisProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn analyze(
        &self,
        resume_text: &str,
        options: &AnalyzeOptions,
    ) -> Result<ResumeAnalysis, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials("GROQ_API_KEY"))?;

        let prompt = build_review_prompt(resume_text, options.job_description.as_deref());
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: REVIEW_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        let text = body
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or(ProviderError::EmptyContent)?;
        parse_analysis_response(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let provider = GroqProvider::new(None, "llama-3.3-70b-versatile".to_string());
        let result = provider
            .analyze("some resume text", &AnalyzeOptions::default())
            .await;
        assert!(matches!(
            result,
            Err(ProviderError::MissingCredentials("GROQ_API_KEY"))
        ));
    }

    #[test]
    fn test_empty_choices_deserialize() {
        let parsed: ChatResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.choices.is_empty());
    }
}
