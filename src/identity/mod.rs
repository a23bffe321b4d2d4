//! Credential exchange against the provider's identity REST endpoints.

use crate::rest;
use anyhow::{anyhow, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, info_span, Instrument};

/// Which identity endpoint a credential exchange targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SignUp,
    SignIn,
}

impl Mode {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SignUp => "/v1/accounts:signUp",
            Self::SignIn => "/v1/accounts:signInWithPassword",
        }
    }
}

/// Forward an email/password pair to the provider and pass its response
/// through verbatim.
///
/// # Errors
///
/// Returns an error if the request fails or the provider returns a
/// non-success status; the error carries the provider's status and error
/// message (e.g. `EMAIL_EXISTS`). Never retried.
pub async fn exchange(
    client: &Client,
    base_url: &str,
    api_key: &SecretString,
    mode: Mode,
    email: &str,
    password: &SecretString,
) -> Result<Value> {
    let url = rest::endpoint_url(base_url, mode.path())?;

    let payload = json!({
        "email": email,
        "password": password.expose_secret(),
        "returnSecureToken": true
    });

    debug!("credential exchange: {} email: {}", url, email);

    let span = info_span!(
        "identity.exchange",
        http.method = "POST",
        url = %url
    );
    let response = client
        .post(&url)
        .query(&[("key", api_key.expose_secret())])
        .json(&payload)
        .send()
        .instrument(span)
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let json_response: Value = response.json().await?;

        return Err(anyhow!(
            "{} - {}, {}",
            url,
            status,
            rest::error_message(&json_response)
        ));
    }

    Ok(response.json().await?)
}
