use anyhow::{anyhow, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use reqwest::Client;
use rsa::{BigUint, RsaPublicKey};
use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};

/// The key set the provider publishes for its token signers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

impl Jwks {
    /// Find a key by `kid` (Key ID).
    #[must_use]
    pub fn find_by_kid(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|k| k.kid == kid)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jwk {
    pub kty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    pub kid: String,
    pub n: String,
    pub e: String,
}

impl Jwk {
    /// Convert this JWK to an `RsaPublicKey`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base64url values cannot be decoded or the RSA
    /// key is invalid.
    pub fn to_rsa_public_key(&self) -> Result<RsaPublicKey, super::Error> {
        let n_bytes = Base64UrlUnpadded::decode_vec(&self.n).map_err(|_| super::Error::Base64)?;
        let e_bytes = Base64UrlUnpadded::decode_vec(&self.e).map_err(|_| super::Error::Base64)?;
        let n = BigUint::from_bytes_be(&n_bytes);
        let e = BigUint::from_bytes_be(&e_bytes);
        RsaPublicKey::new(n, e).map_err(super::Error::Rsa)
    }
}

/// Fetch the signer key set from the provider's published JWKS endpoint.
///
/// # Errors
///
/// Returns an error if the request fails, the endpoint returns a non-success
/// status, or the body is not a valid JWKS.
pub async fn fetch_jwks(client: &Client, url: &str) -> Result<Jwks> {
    let span = info_span!(
        "token.fetch_jwks",
        http.method = "GET",
        url = %url
    );
    let response = client.get(url).send().instrument(span).await?;

    if !response.status().is_success() {
        return Err(anyhow!("{} - {}", url, response.status()));
    }

    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn test_jwk() -> serde_json::Value {
        json!({
            "kty": "RSA",
            "alg": "RS256",
            "use": "sig",
            "kid": "k1",
            "n": "ylnwQqfyOhVtfcD5wv51iKBIA5JPLh_wigqxpJG-RoXmc0ngyBtCWXIYQ_mlDDQUUhJxQHup0PPJEbCsVJpcGpFrHmfpNcf5qHGBH6CyP8bbjbQsVmI0o6FiHj8OcVx0TceNIJPXJuGsH37pdY9lbkCcIiIGhIwthx_wo96STdhTV_JPnRuC7TdyZQRRtTD4PGyfplOPR1NDTagEyuUgXxuYJaCkIXGePFzc8KzaPeVt5jQaRqcgK_EFo7cF7YVRyeFS28Rz9LqPrabZRaNoxh1aqJ43zi4w2_2FjoaPjKmekZQmJR-hVXWU-Zm2P30mf4eiWywmMdzaapqU32Xevw",
            "e": "AQAB"
        })
    }

    #[test]
    fn find_by_kid_resolves_known_key() -> Result<()> {
        let jwks: Jwks = serde_json::from_value(json!({"keys": [test_jwk()]}))?;
        assert!(jwks.find_by_kid("k1").is_some());
        assert!(jwks.find_by_kid("k9").is_none());
        Ok(())
    }

    #[test]
    fn jwk_converts_to_rsa_public_key() -> Result<()> {
        let jwk: Jwk = serde_json::from_value(test_jwk())?;
        assert_eq!(jwk.key_use.as_deref(), Some("sig"));
        jwk.to_rsa_public_key()?;
        Ok(())
    }

    #[test]
    fn jwk_rejects_invalid_base64() -> Result<()> {
        let mut jwk: Jwk = serde_json::from_value(test_jwk())?;
        jwk.n = "!not-base64!".to_string();
        assert!(matches!(
            jwk.to_rsa_public_key(),
            Err(crate::token::Error::Base64)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn fetch_jwks_parses_key_set() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"keys": [test_jwk()]})),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let jwks = fetch_jwks(&client, &format!("{}/jwks", server.uri())).await?;
        assert_eq!(jwks.keys.len(), 1);
        assert_eq!(jwks.keys[0].kid, "k1");
        Ok(())
    }

    #[tokio::test]
    async fn fetch_jwks_errors_on_failure_status() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let result = fetch_jwks(&client, &format!("{}/jwks", server.uri())).await;
        let err = result.err().ok_or_else(|| anyhow!("expected error"))?;
        assert!(err.to_string().contains("500"));
        Ok(())
    }
}
