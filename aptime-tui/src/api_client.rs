//! HTTP implementation of [`RemoteData`].
//!
//! Every request goes to the single configured base URL with the resource
//! named in a query parameter (`?endpoint=course`). Bodies are JSON and every
//! response is an [`Envelope`].

use crate::config::{RetryConfig, TuiConfig};
use aptime_core::{Envelope, Record, RecordId, RemoteData, RemoteError, RemoteResult};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// Non-CRUD actions that only read and may be retried.
pub const READ_ACTIONS: &[&str] = &["getimetable", "getfacultybytimetable"];

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl ApiClientError {
    /// Connection problems, timeouts and server-side failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiClientError::Http(_) => true,
            ApiClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<ApiClientError> for RemoteError {
    fn from(err: ApiClientError) -> Self {
        match err {
            ApiClientError::Http(e) => RemoteError::Transport(e.to_string()),
            ApiClientError::Status { status, body } => RemoteError::Status { status, body },
            ApiClientError::Serde(e) => RemoteError::Malformed(e.to_string()),
            ApiClientError::InvalidResponse(msg) | ApiClientError::Config(msg) => {
                RemoteError::Malformed(msg)
            }
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    resource_param: String,
    retry: RetryConfig,
}

impl ApiClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let base_url = config.api_base_url.trim().to_string();
        if base_url.is_empty() {
            return Err(ApiClientError::Config("api_base_url is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url,
            resource_param: config.resource_param.trim().to_string(),
            retry: config.retry.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        method: Method,
        resource: &str,
        body: Option<&Value>,
    ) -> Result<Envelope, ApiClientError> {
        tracing::debug!(%method, resource, "request");
        let mut request = self
            .client
            .request(method, &self.base_url)
            .query(&[(self.resource_param.as_str(), resource)]);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        self.parse_response(response).await
    }

    /// `send`, retrying retryable failures with exponential backoff.
    async fn send_with_retry(
        &self,
        method: Method,
        resource: &str,
        body: Option<&Value>,
    ) -> Result<Envelope, ApiClientError> {
        let mut attempt = 0;
        loop {
            match self.send(method.clone(), resource, body).await {
                Err(err) if err.is_retryable() && attempt + 1 < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        resource,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn parse_response(&self, response: reqwest::Response) -> Result<Envelope, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            if text.trim().is_empty() {
                return Err(ApiClientError::InvalidResponse("empty response body".to_string()));
            }
            return Ok(serde_json::from_str::<Envelope>(&text)?);
        }
        // Some endpoints answer failures with a proper envelope and a 4xx code.
        if let Ok(envelope) = serde_json::from_str::<Envelope>(&text) {
            if !envelope.success && envelope.message.is_some() {
                return Ok(envelope);
            }
        }
        Err(ApiClientError::Status {
            status: status.as_u16(),
            body: text,
        })
    }
}

#[async_trait]
impl RemoteData for ApiClient {
    async fn fetch(&self, resource: &str) -> RemoteResult<Envelope> {
        Ok(self.send_with_retry(Method::GET, resource, None).await?)
    }

    async fn create(&self, resource: &str, payload: &Record) -> RemoteResult<Envelope> {
        let body = payload.clone().into_value();
        Ok(self.send(Method::POST, resource, Some(&body)).await?)
    }

    async fn update(&self, resource: &str, id: &RecordId, payload: &Record) -> RemoteResult<Envelope> {
        let body = payload
            .clone()
            .with(id.field().name(), id.to_json())
            .into_value();
        Ok(self.send(Method::PUT, resource, Some(&body)).await?)
    }

    async fn delete(&self, resource: &str, id: &RecordId) -> RemoteResult<Envelope> {
        let body = Record::new().with(id.field().name(), id.to_json()).into_value();
        Ok(self.send(Method::DELETE, resource, Some(&body)).await?)
    }

    async fn call(&self, action: &str, payload: &Record) -> RemoteResult<Envelope> {
        let body = payload.clone().into_value();
        let envelope = if READ_ACTIONS.contains(&action) {
            self.send_with_retry(Method::POST, action, Some(&body)).await?
        } else {
            self.send(Method::POST, action, Some(&body)).await?
        };
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_map_to_remote_status() {
        let err = ApiClientError::Status {
            status: 503,
            body: "down".into(),
        };
        assert!(err.is_retryable());
        let remote: RemoteError = err.into();
        assert_eq!(
            remote,
            RemoteError::Status {
                status: 503,
                body: "down".into()
            }
        );
        assert!(remote.is_transport());
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let err = ApiClientError::Status {
            status: 404,
            body: String::new(),
        };
        assert!(!err.is_retryable());
        assert!(!ApiClientError::InvalidResponse("x".into()).is_retryable());
    }

    #[test]
    fn test_decode_failure_is_malformed() {
        let err = serde_json::from_str::<Envelope>("<html>").unwrap_err();
        let remote: RemoteError = ApiClientError::from(err).into();
        assert!(matches!(remote, RemoteError::Malformed(_)));
    }
}
