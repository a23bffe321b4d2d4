//! The gateway handle: one HTTP client, one credentials config, every
//! operation.
//!
//! Built exactly once by the composition root and passed by reference; there
//! is no process-wide singleton to initialize lazily.

use crate::cli::globals::GlobalArgs;
use crate::credentials::{self, AccessToken, ServiceAccount};
use crate::identity::{self, Mode};
use crate::token::Claims;
use crate::{profile, rest, token};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_THEME: &str = "dark";

const TOKEN_EXPIRY_LEEWAY: i64 = 30;

/// Provider endpoints; `Default` is production, tests override.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub identity_url: String,
    pub firestore_url: String,
    pub jwks_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            identity_url: "https://identitytoolkit.googleapis.com".to_string(),
            firestore_url: "https://firestore.googleapis.com".to_string(),
            jwks_url:
                "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
                    .to_string(),
        }
    }
}

pub struct Gateway {
    client: Client,
    globals: GlobalArgs,
    service_account: ServiceAccount,
    endpoints: Endpoints,
    access_token: Mutex<Option<AccessToken>>,
}

impl Gateway {
    /// Build the gateway handle: one HTTP client, credentials loaded once.
    ///
    /// # Errors
    ///
    /// Returns an error if the service-account descriptor is missing or
    /// unreadable (fatal: the process cannot proceed without it) or the HTTP
    /// client cannot be built.
    pub fn new(globals: GlobalArgs, endpoints: Endpoints) -> Result<Self> {
        let service_account = ServiceAccount::load(&globals.service_account)?;
        let client = Client::builder().user_agent(crate::APP_USER_AGENT).build()?;

        Ok(Self {
            client,
            globals,
            service_account,
            endpoints,
            access_token: Mutex::new(None),
        })
    }

    fn issuer(&self) -> String {
        format!(
            "https://securetoken.google.com/{}",
            self.globals.project_id
        )
    }

    /// Access token for the document store, minted on first use and reused
    /// until close to expiry. The lock makes concurrent first use mint it
    /// once.
    async fn store_token(&self) -> Result<SecretString> {
        let mut guard = self.access_token.lock().await;

        if let Some(cached) = guard.as_ref() {
            if cached.expires_at - TOKEN_EXPIRY_LEEWAY > rest::unix_now() {
                return Ok(cached.token.clone());
            }
        }

        let minted = credentials::access_token(
            &self.client,
            &self.service_account,
            credentials::DATASTORE_SCOPE,
        )
        .await?;
        let fresh = minted.token.clone();
        *guard = Some(minted);

        Ok(fresh)
    }

    /// Sign up with email/password, then create the user's profile document
    /// (`displayName` defaults to empty, `theme` to `"dark"`, `createdAt`
    /// server-assigned). Returns the provider's auth response verbatim.
    ///
    /// If the profile write fails the auth account is not rolled back; the
    /// error surfaces and the caller may retry via [`Self::save_profile`].
    ///
    /// # Errors
    ///
    /// Returns an error if the credential exchange fails (carrying the
    /// provider's status and message) or the profile write fails.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        display_name: Option<&str>,
    ) -> Result<Value> {
        let auth = identity::exchange(
            &self.client,
            &self.endpoints.identity_url,
            &self.globals.api_key,
            Mode::SignUp,
            email,
            password,
        )
        .await?;

        let uid = auth
            .get("localId")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Error parsing JSON response: no localId found"))?;

        let mut fields = Map::new();
        fields.insert("email".to_string(), json!(email));
        fields.insert(
            "displayName".to_string(),
            json!(display_name.unwrap_or_default()),
        );
        fields.insert("theme".to_string(), json!(DEFAULT_THEME));

        let store_token = self.store_token().await?;
        profile::create_profile(
            &self.client,
            &self.endpoints.firestore_url,
            &store_token,
            &self.globals.project_id,
            uid,
            &fields,
        )
        .await
        .with_context(|| format!("Error creating profile for uid {uid}"))?;

        Ok(auth)
    }

    /// Sign in with email/password. Does not touch the profile store.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential exchange fails, carrying the
    /// provider's status and message.
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Value> {
        identity::exchange(
            &self.client,
            &self.endpoints.identity_url,
            &self.globals.api_key,
            Mode::SignIn,
            email,
            password,
        )
        .await
    }

    /// Verify a bearer token and decode its claims.
    ///
    /// Any failure (malformed, expired, wrong issuer, key-set fetch error)
    /// collapses to `None`: callers treat it as "unauthenticated" and cannot
    /// distinguish causes. The cause is logged at `debug` before being
    /// dropped.
    pub async fn verify(&self, id_token: &str) -> Option<Claims> {
        let jwks = match token::fetch_jwks(&self.client, &self.endpoints.jwks_url).await {
            Ok(jwks) => jwks,
            Err(err) => {
                debug!("token verification failed: {err:#}");
                return None;
            }
        };

        match token::verify_rs256(
            id_token,
            &jwks,
            &self.issuer(),
            &self.globals.project_id,
            rest::unix_now(),
        ) {
            Ok(claims) => Some(claims),
            Err(err) => {
                debug!("token verification failed: {err}");
                None
            }
        }
    }

    /// Read the profile document for `uid`; `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails with anything other than
    /// "not found".
    pub async fn get_profile(&self, uid: &str) -> Result<Option<Map<String, Value>>> {
        let store_token = self.store_token().await?;
        profile::get_profile(
            &self.client,
            &self.endpoints.firestore_url,
            &store_token,
            &self.globals.project_id,
            uid,
        )
        .await
    }

    /// Merge-write `fields` into the profile document at `uid`; fields not
    /// supplied are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store request fails.
    pub async fn save_profile(&self, uid: &str, fields: &Map<String, Value>) -> Result<()> {
        let store_token = self.store_token().await?;
        profile::save_profile(
            &self.client,
            &self.endpoints.firestore_url,
            &store_token,
            &self.globals.project_id,
            uid,
            fields,
        )
        .await
    }
}
