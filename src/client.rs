use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, header};
use serde_json::Value;
use url::Url;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{DebugInfo, HealthStatus, RecommendRequest, Recommendation, SeedStatus};

/// Base URL used when neither the caller nor the environment provides one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable consulted for the base URL.
pub const BASE_URL_ENV: &str = "SMART_LIBRARIAN_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const SEED_PATH: &str = "api/seed";
const RECOMMEND_PATH: &str = "api/recommend";
const HEALTH_PATH: &str = "api/health";
const DEBUG_PATH: &str = "api/debug";

/// HTTP client for the Smart Librarian backend.
#[derive(Debug, Clone)]
pub struct LibrarianClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl LibrarianClient {
    /// Create a new client.
    ///
    /// The base URL can be provided directly or read from the
    /// `SMART_LIBRARIAN_URL` environment variable; it falls back to
    /// [`DEFAULT_BASE_URL`].
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url
            .or_else(|| env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(Error::validation(
                "timeout must be greater than zero",
                Some("timeout".to_string()),
            ));
        }
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Send a request and return the JSON body of a successful response.
    async fn execute(&self, request: RequestBuilder, label: &'static str) -> Result<Value> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.execute_inner(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CLIENT_REQUEST_ERRORS.click();
            tracing::warn!(endpoint = label, error = %err, "request failed");
        } else {
            tracing::debug!(endpoint = label, "request succeeded");
        }
        result
    }

    async fn execute_inner(&self, request: RequestBuilder) -> Result<Value> {
        let response = request
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        serde_json::from_str::<Value>(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Convert a non-success response into an error, keeping the `detail`
    /// field of the body when one can be found.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let detail = match response.text().await {
            Ok(body) => serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("detail").and_then(Value::as_str).map(String::from)),
            Err(_) => None,
        };
        Error::api(status_code, detail)
    }
}

#[async_trait::async_trait]
impl Backend for LibrarianClient {
    async fn recommend(&self, query: &str) -> Result<Recommendation> {
        let url = self.endpoint(RECOMMEND_PATH)?;
        let request = self
            .client
            .post(url)
            .json(&RecommendRequest::new(query));
        let value = self.execute(request, RECOMMEND_PATH).await?;
        Ok(Recommendation::from_value(&value))
    }

    async fn seed(&self) -> Result<SeedStatus> {
        let url = self.endpoint(SEED_PATH)?;
        let value = self.execute(self.client.get(url), SEED_PATH).await?;
        Ok(SeedStatus::from_value(&value))
    }

    async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(HEALTH_PATH)?;
        let value = self.execute(self.client.get(url), HEALTH_PATH).await?;
        Ok(HealthStatus::from_value(&value))
    }

    async fn debug_info(&self) -> Result<DebugInfo> {
        let url = self.endpoint(DEBUG_PATH)?;
        let value = self.execute(self.client.get(url), DEBUG_PATH).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Parse a base URL, making sure its path ends in `/` so that endpoint paths
/// are appended rather than replacing the last segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation(
            format!("base URL must be an http(s) URL: {raw}"),
            Some("base_url".to_string()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = LibrarianClient::new(Some("http://localhost:8000".to_string())).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(
            client.endpoint(SEED_PATH).unwrap().as_str(),
            "http://localhost:8000/api/seed"
        );
    }

    #[test]
    fn base_url_with_prefix_keeps_prefix() {
        let client = LibrarianClient::new(Some("https://example.com/librarian".to_string())).unwrap();
        assert_eq!(
            client.endpoint(RECOMMEND_PATH).unwrap().as_str(),
            "https://example.com/librarian/api/recommend"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = LibrarianClient::new(Some("mailto:someone@example.com".to_string())).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        let err = LibrarianClient::new(Some("not a url".to_string())).unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn custom_timeout() {
        let client = LibrarianClient::with_options(
            Some(DEFAULT_BASE_URL.to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = LibrarianClient::with_options(
            Some(DEFAULT_BASE_URL.to_string()),
            Some(Duration::ZERO),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
