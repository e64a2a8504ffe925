//! OpenAI chat-completions client backing the fun-fact resolver.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    facts::{CompletionClient, FactRequest, ProviderError},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You are a film trivia assistant who always varies the angle of each \
     answer (production, cast, reception, symbolism, etc.).";

/// Sampling parameters sent with every fun-fact request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sampling {
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub max_tokens: u32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            temperature: 0.85,
            top_p: 0.95,
            frequency_penalty: 0.2,
            presence_penalty: 0.3,
            max_tokens: 120,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(flatten)]
    sampling: Sampling,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Prompt asking for one short fact; the request id keeps repeated asks varied
pub fn user_prompt(request: &FactRequest) -> String {
    format!(
        "Movie: {} \nRequest ID: {}\nShare one short, spoiler-free fun fact. Keep it under 40 words \
         and avoid repeating facts you might have given for other request IDs.",
        request.subject, request.request_id
    )
}

/// Turns a non-success response body into a provider error
fn error_from_body(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let error_message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message);

    match error_message {
        Some(message) => ProviderError {
            error_message: Some(message),
            ..ProviderError::default()
        },
        None => ProviderError::with_message(format!("OpenAI API returned status {}", status)),
    }
}

#[derive(Clone)]
pub struct OpenAiCompletionClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    sampling: Sampling,
}

impl OpenAiCompletionClient {
    pub fn new(api_key: String, api_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            sampling: Sampling::default(),
        })
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(
        &self,
        model: &str,
        request: &FactRequest,
    ) -> Result<Option<String>, ProviderError> {
        let prompt = user_prompt(request);
        let body = ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            sampling: self.sampling,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::with_message(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &text));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::with_message(e.to_string()))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content))
    }
}
