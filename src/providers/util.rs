use anyhow::{Context, Result, anyhow};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Sends `request` and decodes a JSON body. Any non-success status or
/// undecodable body is an error; nothing is retried.
pub async fn fetch_json<T>(request: RequestBuilder, what: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to send request for {what}"))?;
    let status = response.status();
    let response_text = response
        .text()
        .await
        .with_context(|| format!("Failed to get response text for {what}"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "Request for {what} failed with status {status}: '{response_text}'"
        ));
    }
    if response_text.trim().is_empty() {
        return Err(anyhow!("Received empty response for {what}"));
    }

    match serde_json::from_str(&response_text) {
        Ok(data) => {
            debug!("Fetched {what}");
            Ok(data)
        }
        Err(e) => {
            error!(
                error = ?e,
                response = %response_text,
                "Failed to parse response"
            );
            Err(e).with_context(|| {
                format!("Failed to parse response for {what}. Response: '{response_text}'")
            })
        }
    }
}

/// Sends a write request, discarding the body of a successful response.
pub async fn send_checked(request: RequestBuilder, what: &str) -> Result<()> {
    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to send request to {what}"))?;
    let status = response.status();
    if !status.is_success() {
        let response_text = response.text().await.unwrap_or_default();
        return Err(anyhow!(
            "Request to {what} failed with status {status}: '{response_text}'"
        ));
    }
    debug!("Request to {what} succeeded with status {status}");
    Ok(())
}
