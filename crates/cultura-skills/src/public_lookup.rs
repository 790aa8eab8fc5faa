//! MyMemory public translation lookup. Unauthenticated and best effort.

use crate::retry::{read_json, send_with_retry, RetryPolicy};
use cultura_core::{Lang, PublicLookup, RetrySettings, ServiceError, ServiceSettings};
use serde_json::Value;

const SERVICE_ID: &str = "mymemory";

pub struct MyMemoryLookup {
    http: reqwest::Client,
    url: String,
    policy: RetryPolicy,
}

impl MyMemoryLookup {
    /// Single attempt per lookup with the configured timeout.
    pub fn new(url: impl Into<String>, retry: &RetrySettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            policy: RetryPolicy {
                max_retries: 0,
                ..RetryPolicy::from(retry)
            },
        }
    }

    /// `None` when the lookup URL is blank.
    pub fn from_settings(services: &ServiceSettings, retry: &RetrySettings) -> Option<Self> {
        let url = services.public_lookup_url.trim();
        (!url.is_empty()).then(|| Self::new(url, retry))
    }
}

#[async_trait::async_trait]
impl PublicLookup for MyMemoryLookup {
    async fn lookup(&self, text: &str, source: Lang, target: Lang) -> Result<Option<String>, ServiceError> {
        let langpair = format!("{}|{}", source.code(), target.code());
        let url = reqwest::Url::parse_with_params(&self.url, &[("q", text), ("langpair", langpair.as_str())])
            .map_err(|e| ServiceError::InvalidResponse(format!("bad lookup url: {e}")))?;

        let resp = send_with_retry(&self.policy, SERVICE_ID, || self.http.get(url.clone())).await?;
        let value: Value = read_json(resp).await?;

        let status_ok = match value.get("responseStatus") {
            Some(Value::Number(n)) => n.as_u64() == Some(200),
            Some(Value::String(s)) => s == "200",
            _ => true,
        };
        if !status_ok {
            return Ok(None);
        }

        Ok(value
            .pointer("/responseData/translatedText")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    }
}
