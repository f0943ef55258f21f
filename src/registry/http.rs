//! Best-effort HTTP GET helpers for registry endpoints.
//!
//! Each request is issued once. A request that exceeds the client timeout, fails to
//! connect, or returns a non-success status surfaces as an error for the package
//! being fetched; a 404 is reported separately so callers can tell a missing package
//! from a broken endpoint.

use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = "      http";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("pkg-trends/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by all registry providers.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .into_app_err("creating HTTP client")
}

/// Fetch a URL and decode its JSON body.
///
/// Returns `Ok(None)` when the server answers 404.
pub async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<Option<T>> {
    let Some(body) = get_text(client, url).await? else {
        return Ok(None);
    };

    let value = serde_json::from_str(&body).into_app_err_with(|| format!("parsing JSON response from '{url}'"))?;
    Ok(Some(value))
}

/// Fetch a URL and return its body as text.
///
/// Returns `Ok(None)` when the server answers 404.
pub async fn get_text(client: &reqwest::Client, url: &str) -> Result<Option<String>> {
    log::debug!(target: LOG_TARGET, "GET {url}");

    let resp = client
        .get(url)
        .send()
        .await
        .into_app_err_with(|| format!("requesting '{url}'"))?;

    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        log::debug!(target: LOG_TARGET, "GET {url} returned 404");
        return Ok(None);
    }

    if !status.is_success() {
        return Err(app_err!("request to '{url}' failed with HTTP status {status}"));
    }

    let body = resp.text().await.into_app_err_with(|| format!("reading response body from '{url}'"))?;
    Ok(Some(body))
}
