//! Profile store accessor: per-user documents in the `users` collection.
//!
//! All writes are merge-writes: the update mask lists exactly the supplied
//! field names, so the store only adds or overwrites those fields and never
//! deletes the rest. Single-document atomicity is inherited from the store;
//! concurrent writers are last-write-wins at the field level.

pub mod value;

use crate::rest;
use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Map, Value};
use tracing::{debug, info_span, Instrument};

pub const COLLECTION: &str = "users";

fn document_path(project_id: &str, uid: &str) -> String {
    format!("projects/{project_id}/databases/(default)/documents/{COLLECTION}/{uid}")
}

/// Read a profile document by user id.
///
/// A missing document is `Ok(None)`, not an error.
///
/// # Errors
///
/// Returns an error if the request fails or the store returns a non-success
/// status other than 404.
pub async fn get_profile(
    client: &Client,
    base_url: &str,
    token: &SecretString,
    project_id: &str,
    uid: &str,
) -> Result<Option<Map<String, Value>>> {
    let url = rest::endpoint_url(base_url, &format!("/v1/{}", document_path(project_id, uid)))?;

    let span = info_span!(
        "profile.get",
        http.method = "GET",
        url = %url
    );
    let response = client
        .get(&url)
        .bearer_auth(token.expose_secret())
        .send()
        .instrument(span)
        .await?;

    if response.status() == StatusCode::NOT_FOUND {
        debug!("no profile document for uid: {}", uid);
        return Ok(None);
    }

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

    let json_response: Value = response.json().await?;
    let fields = json_response
        .get("fields")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Ok(Some(value::fields_from_firestore(&fields)))
}

/// Merge-write `fields` into the profile document at `uid`, creating it if
/// absent. Fields not present in `fields` are left untouched; an empty map
/// is a no-op.
///
/// # Errors
///
/// Returns an error if the request fails or the store returns a non-success
/// status.
pub async fn save_profile(
    client: &Client,
    base_url: &str,
    token: &SecretString,
    project_id: &str,
    uid: &str,
    fields: &Map<String, Value>,
) -> Result<()> {
    // an empty mask would turn the PATCH into a full-document replace
    if fields.is_empty() {
        return Ok(());
    }

    let url = rest::endpoint_url(base_url, &format!("/v1/{}", document_path(project_id, uid)))?;

    // the mask is what makes this a merge and not a replace
    let mask: Vec<(&str, &str)> = fields
        .keys()
        .map(|k| ("updateMask.fieldPaths", k.as_str()))
        .collect();
    let payload = json!({ "fields": value::fields_to_firestore(fields) });

    let span = info_span!(
        "profile.save",
        http.method = "PATCH",
        url = %url
    );
    let response = client
        .patch(&url)
        .query(&mask)
        .bearer_auth(token.expose_secret())
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

    Ok(())
}

/// Creation-time merge-write: same semantics as [`save_profile`], plus a
/// server-assigned `createdAt` timestamp via a `REQUEST_TIME` transform.
/// Used once, at signup.
///
/// # Errors
///
/// Returns an error if the request fails or the store returns a non-success
/// status.
pub async fn create_profile(
    client: &Client,
    base_url: &str,
    token: &SecretString,
    project_id: &str,
    uid: &str,
    fields: &Map<String, Value>,
) -> Result<()> {
    let url = rest::endpoint_url(
        base_url,
        &format!("/v1/projects/{project_id}/databases/(default)/documents:commit"),
    )?;

    let field_paths: Vec<&str> = fields.keys().map(String::as_str).collect();
    let payload = json!({
        "writes": [{
            "update": {
                "name": document_path(project_id, uid),
                "fields": value::fields_to_firestore(fields)
            },
            "updateMask": { "fieldPaths": field_paths },
            "updateTransforms": [
                { "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" }
            ]
        }]
    });

    let span = info_span!(
        "profile.create",
        http.method = "POST",
        url = %url
    );
    let response = client
        .post(&url)
        .bearer_auth(token.expose_secret())
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

    Ok(())
}
