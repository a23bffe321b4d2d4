//! Shared plumbing for the provider's REST surfaces.

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use url::Url;

/// Normalize a base URL and join an endpoint path.
///
/// # Errors
///
/// Returns an error if `url` cannot be parsed, has no host, or uses an
/// unsupported scheme.
pub fn endpoint_url(url: &str, path: &str) -> Result<String> {
    let url = Url::parse(url)?;

    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}"));
    }

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None if scheme == "http" => 80,
        None => 443,
    };

    let endpoint_url = format!("{scheme}://{host}:{port}{path}");

    debug!("endpoint URL: {}", endpoint_url);

    Ok(endpoint_url)
}

/// Extract the message from a Google-style error body:
/// `{"error": {"code": 400, "message": "EMAIL_EXISTS", ...}}`
#[must_use]
pub fn error_message(json_response: &Value) -> &str {
    json_response
        .get("error")
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Current unix time in seconds.
#[must_use]
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use serde_json::json;

    #[test]
    fn endpoint_url_defaults_http_port() -> Result<()> {
        let url = endpoint_url("http://example.com", "/v1/accounts:signUp")?;
        assert_eq!(url, "http://example.com:80/v1/accounts:signUp");
        Ok(())
    }

    #[test]
    fn endpoint_url_defaults_https_port() -> Result<()> {
        let url = endpoint_url("https://example.com", "/v1/accounts:signUp")?;
        assert_eq!(url, "https://example.com:443/v1/accounts:signUp");
        Ok(())
    }

    #[test]
    fn endpoint_url_keeps_explicit_port() -> Result<()> {
        let url = endpoint_url("http://127.0.0.1:8085", "/v1/test")?;
        assert_eq!(url, "http://127.0.0.1:8085/v1/test");
        Ok(())
    }

    #[test]
    fn endpoint_url_rejects_unsupported_scheme() -> Result<()> {
        for url in ["ftp://example.com", "ftp://example.com:21"] {
            let err = endpoint_url(url, "/v1/test")
                .err()
                .ok_or_else(|| anyhow!("expected error"))?;
            assert!(err.to_string().contains("unsupported scheme"));
        }
        Ok(())
    }

    #[test]
    fn error_message_reads_google_error_body() {
        let body = json!({"error": {"code": 400, "message": "EMAIL_EXISTS"}});
        assert_eq!(error_message(&body), "EMAIL_EXISTS");
    }

    #[test]
    fn error_message_defaults_to_empty() {
        assert_eq!(error_message(&json!({"unexpected": true})), "");
    }

    #[test]
    fn unix_now_is_positive() {
        assert!(unix_now() > 0);
    }
}
