//! JSON-over-HTTP plumbing shared by the REST adapters.

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::ProviderError;

/// Maximum number of body characters kept in errors.
pub(crate) const ERROR_BODY_CHARS: usize = 500;

/// A `reqwest` client bound to one base URL and timeout.
#[derive(Debug, Clone)]
pub(crate) struct JsonClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl JsonClient {
    pub(crate) fn new(
        name: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if base_url.is_empty() {
            return Err(ProviderError::NotConfigured(format!(
                "{name}: base URL must not be empty"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trip-query/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    /// GET `path` with query parameters and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Sending request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::from_request(e, self.timeout))?;

        let body = self.checked_body(response).await?;

        serde_json::from_str(&body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
            body: Some(truncate_body(&body)),
        })
    }

    async fn checked_body(&self, response: Response) -> Result<String, ProviderError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::from_request(e, self.timeout))
    }
}

/// Keep at most [`ERROR_BODY_CHARS`] characters, marking the cut.
pub(crate) fn truncate_body(body: &str) -> String {
    let mut chars = body.char_indices();
    match chars.nth(ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
