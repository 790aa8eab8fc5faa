//! Model Router: sends a grounded prompt to the Anthropic Messages API, or refuses in offline mode.

use cultura_core::{CompletionRequest, LlmBackend, LlmError, LlmSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BACKEND_ID: &str = "anthropic";
const ENV_LLM_MODE: &str = "CULTURA_LLM_MODE";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Offline never calls out; live calls the remote model when a key is configured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LlmMode {
    Offline,
    #[default]
    Live,
}

impl LlmMode {
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("offline") {
            LlmMode::Offline
        } else {
            LlmMode::Live
        }
    }

    /// `CULTURA_LLM_MODE` wins over the configured mode.
    fn resolve(configured: &str) -> Self {
        match std::env::var(ENV_LLM_MODE) {
            Ok(v) if !v.trim().is_empty() => Self::parse(&v),
            _ => Self::parse(configured),
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub struct ModelRouter {
    mode: LlmMode,
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ModelRouter {
    pub fn new(llm: &LlmSettings) -> Self {
        Self {
            mode: LlmMode::resolve(&llm.mode),
            http: reqwest::Client::new(),
            api_url: llm.api_url.trim_end_matches('/').to_string(),
            api_key: llm.api_key.clone().filter(|k| !k.trim().is_empty()),
            timeout: Duration::from_secs(llm.timeout_secs),
        }
    }

    pub fn with_mode(mut self, mode: LlmMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> LlmMode {
        self.mode
    }

    /// True when a live call would actually be attempted.
    pub fn is_available(&self) -> bool {
        self.mode == LlmMode::Live && self.api_key.is_some()
    }

    async fn live_generate(&self, api_key: &str, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: &request.system_prompt,
            messages: [UserTurn {
                role: "user",
                content: &request.user_message,
            }],
        };

        let resp = self
            .http
            .post(format!("{}/v1/messages", self.api_url))
            .timeout(self.timeout)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Network(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Authentication,
                429 => LlmError::RateLimited,
                code => LlmError::Http {
                    status: code,
                    body: resp.text().await.unwrap_or_default(),
                },
            });
        }

        let parsed: MessagesResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Parse(e.to_string())
            }
        })?;
        parsed
            .content
            .into_iter()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text)
            .ok_or_else(|| LlmError::Parse("response has no text content".to_string()))
    }
}

#[async_trait::async_trait]
impl LlmBackend for ModelRouter {
    fn id(&self) -> &str {
        BACKEND_ID
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        if self.mode == LlmMode::Offline {
            return Err(LlmError::Disabled);
        }
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredentials)?;
        tracing::debug!(target: "cultura::skills", model = %request.model, "calling remote model");
        self.live_generate(api_key, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_offline_only_explicitly() {
        assert_eq!(LlmMode::parse("offline"), LlmMode::Offline);
        assert_eq!(LlmMode::parse(" OFFLINE "), LlmMode::Offline);
        assert_eq!(LlmMode::parse("live"), LlmMode::Live);
        assert_eq!(LlmMode::parse(""), LlmMode::Live);
    }

    #[tokio::test]
    async fn offline_mode_never_calls_out() {
        let router = ModelRouter::new(&LlmSettings {
            api_key: Some("sk-test".to_string()),
            ..LlmSettings::default()
        })
        .with_mode(LlmMode::Offline);
        assert!(!router.is_available());
        let err = router
            .complete(CompletionRequest::user("m", "hello"))
            .await
            .unwrap_err();
        assert_eq!(err, LlmError::Disabled);
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let router = ModelRouter::new(&LlmSettings::default()).with_mode(LlmMode::Live);
        let err = router
            .complete(CompletionRequest::user("m", "hello"))
            .await
            .unwrap_err();
        assert_eq!(err, LlmError::MissingCredentials);
    }
}
