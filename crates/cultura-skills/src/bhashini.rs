//! BHASHINI two-step translation client: pipeline discovery, then compute.

use crate::retry::{read_json, send_with_retry, RetryPolicy};
use cultura_core::{Lang, RemoteTranslator, RetrySettings, ServiceError, ServiceSettings};
use serde::Deserialize;
use serde_json::{json, Value};

const SERVICE_ID: &str = "bhashini";

#[derive(Debug, Deserialize)]
struct PipelineResponse {
    #[serde(rename = "pipelineResponseConfig")]
    response_config: Option<Value>,
    #[serde(rename = "pipelineInferenceAPIEndPoint")]
    inference_endpoint: Option<InferenceEndpoint>,
}

#[derive(Debug, Deserialize)]
struct InferenceEndpoint {
    #[serde(rename = "callbackUrl")]
    callback_url: Option<String>,
    #[serde(rename = "inferenceApiKey")]
    inference_api_key: Option<InferenceApiKey>,
}

#[derive(Debug, Deserialize)]
struct InferenceApiKey {
    value: Option<String>,
}

struct Credentials {
    user_id: String,
    api_key: String,
}

/// Authenticated BHASHINI client. Without credentials every call fails fast with
/// [`ServiceError::Unavailable`] and sends nothing.
pub struct BhashiniClient {
    http: reqwest::Client,
    pipeline_url: String,
    compute_url: String,
    pipeline_id: String,
    credentials: Option<Credentials>,
    policy: RetryPolicy,
}

impl BhashiniClient {
    pub fn new(services: &ServiceSettings, retry: &RetrySettings) -> Self {
        let credentials = services.bhashini_credentials().map(|(user, key)| Credentials {
            user_id: user.to_string(),
            api_key: key.to_string(),
        });
        Self {
            http: reqwest::Client::new(),
            pipeline_url: services.bhashini_pipeline_url.clone(),
            compute_url: services.bhashini_compute_url.clone(),
            pipeline_id: services.bhashini_pipeline_id.clone(),
            credentials,
            policy: RetryPolicy::from(retry),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn credentials(&self) -> Result<&Credentials, ServiceError> {
        self.credentials
            .as_ref()
            .ok_or_else(|| ServiceError::Unavailable("BHASHINI credentials are not configured".to_string()))
    }

    async fn search_pipeline(&self, source: Lang, target: Lang) -> Result<PipelineResponse, ServiceError> {
        let creds = self.credentials()?;
        let body = json!({
            "pipelineTasks": [{
                "taskType": "translation",
                "config": {
                    "language": {
                        "sourceLanguage": source.bhashini_code(),
                        "targetLanguage": target.bhashini_code(),
                    }
                }
            }],
            "pipelineRequestConfig": { "pipelineId": self.pipeline_id },
        });

        let resp = send_with_retry(&self.policy, SERVICE_ID, || {
            self.http
                .post(&self.pipeline_url)
                .header("userID", &creds.user_id)
                .header("ulcaApiKey", &creds.api_key)
                .json(&body)
        })
        .await?;

        read_json::<PipelineResponse>(resp).await
    }

    async fn compute(&self, text: &str, pipeline: PipelineResponse) -> Result<String, ServiceError> {
        let tasks = pipeline
            .response_config
            .filter(|v| !v.is_null())
            .ok_or_else(|| ServiceError::InvalidResponse("no translation pipeline available".to_string()))?;
        let endpoint = pipeline.inference_endpoint;
        let url = endpoint
            .as_ref()
            .and_then(|e| e.callback_url.clone())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.compute_url.clone());
        let auth = endpoint
            .and_then(|e| e.inference_api_key)
            .and_then(|k| k.value)
            .unwrap_or_default();

        let body = json!({
            "pipelineTasks": tasks,
            "inputData": { "input": [{ "source": text }] },
        });

        let resp = send_with_retry(&self.policy, SERVICE_ID, || {
            self.http.post(&url).header("Authorization", &auth).json(&body)
        })
        .await?;

        let value: Value = read_json(resp).await?;
        value
            .pointer("/pipelineResponse/0/output/0/target")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ServiceError::InvalidResponse("missing translation target".to_string()))
    }
}

#[async_trait::async_trait]
impl RemoteTranslator for BhashiniClient {
    fn id(&self) -> &str {
        SERVICE_ID
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn translate(&self, text: &str, source: Lang, target: Lang) -> Result<String, ServiceError> {
        let pipeline = self.search_pipeline(source, target).await?;
        let translated = self.compute(text, pipeline).await?;
        tracing::debug!(target: "cultura::skills", %source, %target, "bhashini translation succeeded");
        Ok(translated)
    }

    async fn health(&self) -> Result<(), ServiceError> {
        let creds = self.credentials()?;
        send_with_retry(&self.policy, SERVICE_ID, || {
            self.http
                .get(&self.pipeline_url)
                .header("userID", &creds.user_id)
                .header("ulcaApiKey", &creds.api_key)
        })
        .await?;
        Ok(())
    }
}
