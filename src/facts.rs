//! Fun-fact generation with ordered model fallback.
//!
//! Candidates are tried strictly one after another. The first non-blank
//! completion wins; a failure on the final candidate is surfaced as-is and
//! earlier failures are only logged.

use std::sync::Arc;

/// Shown whenever no more specific message is available
pub const DEFAULT_ERROR: &str =
    "We couldn't fetch a fun fact right now. Please try again in a little while.";

pub const MISSING_API_KEY_ERROR: &str = "OPENAI_API_KEY is not configured on the server.";

pub const MISSING_SUBJECT_ERROR: &str = "No favorite movie set";

/// Used when `OPENAI_MODEL` is not set at all
pub const DEFAULT_MODELS: [&str; 2] = ["gpt-4o-mini", "gpt-3.5-turbo"];

/// Resolver settings, injected rather than read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactConfig {
    pub api_key: Option<String>,
    pub models: Vec<String>,
}

impl FactConfig {
    /// Builds the config from the raw key and comma-separated model list.
    ///
    /// A blank key counts as missing. An unset list falls back to
    /// [`DEFAULT_MODELS`]; a set but blank list yields no candidates.
    pub fn from_parts(api_key: Option<String>, models: Option<&str>) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        let models = match models {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|model| !model.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        };

        Self { api_key, models }
    }
}

/// What a single completion call is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactRequest {
    /// Movie title the fact should be about
    pub subject: String,
    /// Per-request nonce embedded in the prompt so repeated asks vary
    pub request_id: String,
}

/// Raw failure from a completion provider.
///
/// Providers report messages in different places; the fields are checked in
/// declaration order when building the user-facing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderError {
    /// Top-level message, e.g. a transport error
    pub message: Option<String>,
    /// `error.message` from the provider's error object
    pub error_message: Option<String>,
    /// `response.data.error.message` from a wrapped HTTP response
    pub response_message: Option<String>,
}

impl ProviderError {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// First present message, or [`DEFAULT_ERROR`] when it is blank.
    ///
    /// A present but blank field still wins over the later ones.
    pub fn normalized(&self) -> String {
        self.message
            .as_deref()
            .or(self.error_message.as_deref())
            .or(self.response_message.as_deref())
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(DEFAULT_ERROR)
            .to_string()
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.normalized())
    }
}

impl std::error::Error for ProviderError {}

/// Capability to request one completion from one model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the message content of the first choice, if any
    async fn complete(
        &self,
        model: &str,
        request: &FactRequest,
    ) -> Result<Option<String>, ProviderError>;
}

/// Result of trying a single candidate
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptResult {
    Success(String),
    Failure(String),
}

/// Final result of a resolver invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactOutcome {
    Fact(String),
    Error(String),
}

async fn attempt(client: &dyn CompletionClient, model: &str, request: &FactRequest) -> AttemptResult {
    match client.complete(model, request).await {
        Ok(content) => match content.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => AttemptResult::Success(text.to_string()),
            _ => {
                tracing::warn!(model = %model, "Completion returned no content");
                AttemptResult::Failure(DEFAULT_ERROR.to_string())
            }
        },
        Err(e) => {
            tracing::warn!(model = %model, error = ?e, "Fun fact completion failed");
            AttemptResult::Failure(e.normalized())
        }
    }
}

/// Tries each candidate in order until one yields a non-blank fact.
///
/// Only the last candidate's failure message reaches the caller.
pub async fn resolve_fact(
    request: &FactRequest,
    candidates: &[String],
    client: &dyn CompletionClient,
) -> FactOutcome {
    if candidates.is_empty() {
        tracing::error!("No fun fact models configured");
        return FactOutcome::Error(DEFAULT_ERROR.to_string());
    }

    let last = candidates.len() - 1;

    for (position, model) in candidates.iter().enumerate() {
        match attempt(client, model, request).await {
            AttemptResult::Success(fact) => {
                tracing::info!(model = %model, attempts = position + 1, "Fun fact generated");
                return FactOutcome::Fact(fact);
            }
            AttemptResult::Failure(message) if position == last => {
                return FactOutcome::Error(message);
            }
            AttemptResult::Failure(_) => {}
        }
    }

    FactOutcome::Error(DEFAULT_ERROR.to_string())
}

/// Configured resolver shared by request handlers
#[derive(Clone)]
pub struct FactResolver {
    config: FactConfig,
    client: Arc<dyn CompletionClient>,
}

impl FactResolver {
    pub fn new(config: FactConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self { config, client }
    }

    pub fn models(&self) -> &[String] {
        &self.config.models
    }

    /// Generates a fun fact about `subject`.
    pub async fn generate(&self, subject: &str, request_id: &str) -> FactOutcome {
        if self.config.api_key.is_none() {
            tracing::error!("Fun fact requested but no OpenAI key is configured");
            return FactOutcome::Error(MISSING_API_KEY_ERROR.to_string());
        }

        let subject = subject.trim();
        if subject.is_empty() {
            return FactOutcome::Error(MISSING_SUBJECT_ERROR.to_string());
        }

        let request = FactRequest {
            subject: subject.to_string(),
            request_id: request_id.to_string(),
        };

        resolve_fact(&request, &self.config.models, self.client.as_ref()).await
    }
}
