//! Shared HTTP client, auth headers, and response decoding.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;

use crate::error::ConciergeError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// Per-call deadlines are applied with [`crate::util::timeout::with_timeout`]
/// so that each component can carry its own configured bound.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default HTTP client");
                reqwest::Client::new()
            })
    })
}

/// Default headers, with a bearer token when one is configured.
pub fn auth_headers(api_key: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        if let Ok(val) = HeaderValue::from_str(&format!("Bearer {key}")) {
            headers.insert(AUTHORIZATION, val);
        }
    }
    headers
}

/// Join a base URL and a path without doubling the slash.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Map a non-success status to an error carrying the server's message.
pub fn status_to_error(status: u16, body: &str) -> ConciergeError {
    let message = extract_error_message(body).unwrap_or_else(|| body.trim().to_string());
    ConciergeError::api(status, message)
}

/// Check the status, then decode the body as JSON.
pub async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ConciergeError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_to_error(status.as_u16(), &body));
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    let candidate = value
        .get("error")
        .and_then(|e| {
            e.as_str()
                .map(str::to_string)
                .or_else(|| e.get("message").and_then(|m| m.as_str()).map(str::to_string))
        })
        .or_else(|| value.get("message").and_then(|m| m.as_str()).map(str::to_string))?;
    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
