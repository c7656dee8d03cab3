use std::time::Duration;

use reqwest::{Response, StatusCode};
use rostrum_core::{AppError, AppResult, FieldError, ServerFailure};
use serde::Deserialize;
use url::Url;

/// Connection settings shared by the HTTP adapters.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// API root, e.g. `http://127.0.0.1:8080/api`.
    pub base_url: Url,
    /// Bearer token forwarded to the backend.
    pub access_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpBackendConfig {
    /// Builds the reqwest client used by the adapters.
    pub fn build_client(&self) -> AppResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))
    }

    /// Appends `path` segments to the API root.
    pub fn endpoint(&self, path: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "API base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    pub(crate) fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.access_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorBodyEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorBodyEntry {
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    message: String,
}

/// Converts a failure response into [`AppError::Server`].
pub(crate) async fn server_error(response: Response) -> AppError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_owned());

    AppError::Server(server_failure(status, body.as_str()))
}

pub(crate) fn server_failure(status: StatusCode, body: &str) -> ServerFailure {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|parsed| parsed.message.clone().or_else(|| parsed.error.clone()))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            } else {
                trimmed.to_owned()
            }
        });
    let field_errors = parsed
        .map(|parsed| {
            parsed
                .errors
                .into_iter()
                .map(|entry| FieldError {
                    field: entry.field,
                    message: entry.message,
                })
                .collect()
        })
        .unwrap_or_default();

    ServerFailure::new(status.as_u16(), message).with_field_errors(field_errors)
}
