//! Request wrapper around `reqwest`.
//!
//! Every call resolves to either the decoded success body or an
//! [`UpskillError`]: non-2xx answers become `Api` errors carrying the
//! backend's `error` string, and network or decode failures become the
//! generic `Transport` error.

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use upskill_core::error::{UpskillError, UpskillResult};

use crate::error::HttpError;

/// Environment variable overriding [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "UPSKILL_API_URL";

/// Configuration for reaching the UpSkillHub backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every path is appended to (e.g., `http://localhost:3001/api`).
    pub base_url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/api".into(),
            user_agent: concat!("upskill-client/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ApiConfig {
    /// Defaults, with the base URL taken from `UPSKILL_API_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        config
    }
}

/// `{error, details?}` body of a failed request. Some endpoints use
/// `message` instead of `error`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    details: Option<serde_json::Value>,
}

/// Shared HTTP client; cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client for the configured backend.
    ///
    /// No request timeout is set; slow requests are bounded only by the
    /// transport.
    pub fn new(config: &ApiConfig) -> Result<Self, HttpError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| HttpError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(HttpError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "URL cannot be a base".into(),
            });
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended by percent-encoded path segments.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        token: Option<&str>,
    ) -> UpskillResult<T> {
        let request = self.http.request(Method::GET, self.url(segments));
        self.send(request, token).await
    }

    pub(crate) async fn get_with_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &Q,
        token: Option<&str>,
    ) -> UpskillResult<T> {
        let request = self
            .http
            .request(Method::GET, self.url(segments))
            .query(query);
        self.send(request, token).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
        token: Option<&str>,
    ) -> UpskillResult<T> {
        let request = self
            .http
            .request(Method::POST, self.url(segments))
            .json(body);
        self.send(request, token).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> UpskillResult<T> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request to backend failed");
            HttpError::from(e)
        })?;

        let status = response.status();
        let url = response.url().clone();
        let bytes = response.bytes().await.map_err(|e| {
            warn!(error = %e, %url, "Failed to read response body");
            HttpError::from(e)
        })?;

        if !status.is_success() {
            let body: Option<ErrorBody> = serde_json::from_slice(&bytes).ok();
            let (message, details) = match body {
                Some(ErrorBody {
                    error,
                    message,
                    details,
                }) => (error.or(message), details),
                None => (None, None),
            };
            let message = message.unwrap_or_else(|| {
                format!(
                    "Request failed: {}",
                    status.canonical_reason().unwrap_or(status.as_str())
                )
            });
            debug!(status = status.as_u16(), %url, %message, "Backend rejected request");
            return Err(UpskillError::Api {
                status: status.as_u16(),
                message,
                details,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, %url, "Failed to decode response body");
            HttpError::Decode(e.to_string()).into()
        })
    }
}
