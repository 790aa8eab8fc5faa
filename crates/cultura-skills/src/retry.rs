//! Shared retry/timeout policy for outbound service calls.

use cultura_core::{RetrySettings, ServiceError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Per attempt.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(s: &RetrySettings) -> Self {
        Self {
            max_retries: s.max_retries,
            base_delay: s.base_delay(),
            timeout: s.timeout(),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry `attempt` (0-based): base × 2^attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Maps a non-success status to its service error.
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> ServiceError {
    match status.as_u16() {
        401 | 403 => ServiceError::Authentication(format!("HTTP {}", status.as_u16())),
        429 => ServiceError::RateLimited,
        code => ServiceError::Http {
            status: code,
            message: body,
        },
    }
}

/// Sends the request built by `build` until it succeeds or the policy gives up.
///
/// Each attempt carries `policy.timeout` as a request timeout, so the deadline also covers
/// reading the response body. A timed-out attempt abandons the call. Only transient failures
/// (network, 429, 5xx) are retried.
pub async fn send_with_retry<F>(
    policy: &RetryPolicy,
    service: &str,
    build: F,
) -> Result<reqwest::Response, ServiceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let request = build().timeout(policy.timeout);
        let err = match tokio::time::timeout(policy.timeout, request.send()).await {
            Err(_) => return Err(ServiceError::Timeout),
            Ok(Err(e)) if e.is_timeout() => return Err(ServiceError::Timeout),
            Ok(Err(e)) => ServiceError::Network(e.to_string()),
            Ok(Ok(resp)) if resp.status().is_success() => return Ok(resp),
            Ok(Ok(resp)) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                status_error(status, body)
            }
        };

        if !err.is_transient() || attempt >= policy.max_retries {
            return Err(err);
        }
        let delay = policy.delay_for(attempt);
        tracing::warn!(
            target: "cultura::skills",
            service,
            attempt = attempt + 1,
            delay_ms = delay.as_millis() as u64,
            kind = err.kind(),
            "request failed; retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

/// Reads a JSON body returned by [`send_with_retry`]. A body that stalls past the deadline is a
/// [`ServiceError::Timeout`].
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    resp.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::InvalidResponse(e.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
    }

    #[test]
    fn policy_follows_settings() {
        let settings = RetrySettings {
            max_retries: 1,
            base_delay_ms: 5,
            timeout_secs: 2,
        };
        let policy = RetryPolicy::from(&settings);
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.base_delay, Duration::from_millis(5));
        assert_eq!(policy.timeout, Duration::from_secs(2));
    }

    #[test]
    fn statuses_map_to_errors() {
        use reqwest::StatusCode;
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, String::new()),
            ServiceError::Authentication(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, String::new()),
            ServiceError::Authentication(_)
        ));
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ServiceError::RateLimited
        );
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY, "down".to_string()),
            ServiceError::Http {
                status: 502,
                message: "down".to_string()
            }
        );
    }
}
