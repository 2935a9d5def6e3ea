//! HTTP client for the bar backend.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::instrument;

use comptoir::cart::submission::SubmissionError;

use crate::config::ApiConfig;

mod customer;
mod staff;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or deserialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend answered {status}: {message}")]
    Backend {
        /// Response status
        status: StatusCode,

        /// Message from the `{ "error": ... }` body, or the raw body
        message: String,
    },

    /// A resource URL could not be built.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the backend refused the request itself, as opposed to failing to answer it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Backend { status, .. } if status.is_client_error())
    }
}

impl From<ApiError> for SubmissionError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Backend { status, message } if status.is_client_error() => {
                Self::Rejected(message)
            }
            error => Self::Unavailable(error.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Builds the error for a non-2xx response body.
pub(crate) fn backend_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map_or_else(|_not_json| body.to_string(), |parsed| parsed.error);

    ApiError::Backend { status, message }
}

/// HTTP client for the bar backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            http,
        })
    }

    /// Absolute URL of a backend path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.endpoint(path));

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    #[instrument(level = "debug", skip_all, err)]
    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        Err(backend_error(status, &body))
    }

    async fn read<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        Ok(Self::send(request).await?.json().await?)
    }
}
