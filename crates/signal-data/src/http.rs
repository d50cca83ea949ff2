//! Shared HTTP plumbing for the data sources.

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use signal_core::error::FetchError;
use std::time::Duration;

/// Build a client that gives up on any request after `timeout_secs`.
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("market-signal/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FetchError::Configuration(e.to_string()))
}

/// Send a request and decode the body as JSON.
///
/// Non-2xx replies become [`FetchError::Provider`] when the body carries a
/// `code`/`msg` error object and [`FetchError::Status`] otherwise.
pub(crate) async fn get_json(request: RequestBuilder, timeout_secs: u64) -> Result<Value, FetchError> {
    let resp = request
        .send()
        .await
        .map_err(|e| transport_error(e, timeout_secs))?;

    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| transport_error(e, timeout_secs))?;

    if !status.is_success() {
        if let Some(err) = serde_json::from_str::<Value>(&text)
            .ok()
            .as_ref()
            .and_then(provider_error)
        {
            return Err(err);
        }
        return Err(FetchError::status(status.as_u16(), &text));
    }

    serde_json::from_str(&text).map_err(|e| FetchError::Schema(format!("invalid JSON: {}", e)))
}

/// Map a reqwest failure, dropping the URL: some providers take their
/// API key as a path segment.
fn transport_error(err: reqwest::Error, timeout_secs: u64) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout_secs)
    } else {
        FetchError::Transport(err.without_url().to_string())
    }
}

/// Recognise `{"code": -1121, "msg": "Invalid symbol."}` style error bodies.
///
/// A zero code is a success marker on some venues and is not an error.
pub(crate) fn provider_error(body: &Value) -> Option<FetchError> {
    let object = body.as_object()?;
    let code = object.get("code")?.as_i64()?;
    if code == 0 {
        return None;
    }
    let message = object
        .get("msg")
        .or_else(|| object.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(FetchError::Provider { code, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_error_detection() {
        let body = json!({"code": -1121, "msg": "Invalid symbol."});
        assert_eq!(
            provider_error(&body),
            Some(FetchError::Provider {
                code: -1121,
                message: "Invalid symbol.".into()
            })
        );

        assert_eq!(provider_error(&json!({"code": 0, "msg": "", "data": []})), None);
        assert_eq!(provider_error(&json!([[1, "2"]])), None);
        assert_eq!(provider_error(&json!({"error": "nope"})), None);
    }
}
