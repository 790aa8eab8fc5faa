use serde::Serialize;
use thiserror::Error;

/// Remote model failure. Each variant carries its own user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    #[error("Anthropic API key is not configured. Add ANTHROPIC_API_KEY to your .env file.")]
    MissingCredentials,
    #[error("Remote model is disabled (offline mode).")]
    Disabled,
    #[error("Invalid API key. Please check your Anthropic API key.")]
    Authentication,
    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,
    #[error("Model request failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Could not reach the model service: {0}")]
    Network(String),
    #[error("The model service did not answer in time.")]
    Timeout,
    #[error("Unreadable model response: {0}")]
    Parse(String),
}

impl LlmError {
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::MissingCredentials => "missing_credentials",
            LlmError::Disabled => "disabled",
            LlmError::Authentication => "authentication",
            LlmError::RateLimited => "rate_limited",
            LlmError::Http { .. } => "http",
            LlmError::Network(_) => "network",
            LlmError::Timeout => "timeout",
            LlmError::Parse(_) => "parse",
        }
    }
}

/// One single-turn completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub user_message: String,
}

impl CompletionRequest {
    pub fn user(model: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 1024,
            system_prompt: String::new(),
            user_message: user_message.into(),
        }
    }

    pub fn with_system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A remote language model the orchestrator can ask.
#[async_trait::async_trait]
pub trait LlmBackend: Send + Sync {
    fn id(&self) -> &str;

    /// Generated text, or why there is none.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}
