//! REST access to room history.
//!
//! Requests are one-shot: a failed fetch is reported and not retried.

use std::time::Duration;

use reqwest::Url;
use serde_json::Value;

use crate::CliError;
use crate::config::ClientConfig;

/// `GET {base}/messages/{room_id}` with bearer auth; returns the raw records.
pub async fn fetch_room_messages(
    config: &ClientConfig,
    session_token: &str,
    room_id: &str,
) -> Result<Vec<Value>, CliError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()?;

    let url = messages_url(&config.base_url, room_id)?;
    tracing::debug!(%url, "fetching room history");
    let response = client.get(url.clone()).bearer_auth(session_token).send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), %url, "room history request failed");
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }

    let json = response.json::<Value>().await?;
    extract_messages(json)
}

/// Room ids are pushed as a single percent-encoded path segment.
pub fn messages_url(base_url: &str, room_id: &str) -> Result<Url, CliError> {
    if room_id.is_empty() {
        return Err(CliError::MissingField("room"));
    }
    let mut url = Url::parse(base_url).map_err(|error| CliError::InvalidBaseUrl(format!("{base_url}: {error}")))?;
    url.path_segments_mut()
        .map_err(|()| CliError::InvalidBaseUrl(base_url.to_owned()))?
        .pop_if_empty()
        .push("messages")
        .push(room_id);
    Ok(url)
}

/// The endpoint answers with a bare array or an object wrapping `messages`.
pub fn extract_messages(json: Value) -> Result<Vec<Value>, CliError> {
    match json {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("messages") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(CliError::MissingField("messages")),
        },
        _ => Err(CliError::MissingField("messages")),
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
