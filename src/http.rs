use std::time::Duration;

use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{DdnsError, Result};

pub const CLIENT_USER_AGENT: &str = "DNSPOD-DDNS-CLIENT";

/// Applied to every outbound call; a timeout surfaces as a transport error.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `DNSPOD-DDNS-CLIENT/<version>(<email>)`, as DNSPod asks API clients to identify.
pub fn user_agent(email: &str) -> String {
    format!(
        "{}/{}({})",
        CLIENT_USER_AGENT,
        env!("CARGO_PKG_VERSION"),
        email
    )
}

pub fn build_client(email: &str) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent(email))
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Sends the request and decodes a JSON body, keeping transport and decode
/// failures apart. The body is decoded whatever the HTTP status, since
/// DNSPod explains rejections in it; a non-2xx reply that does not parse
/// counts as a transport failure.
pub async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    target: &'static str,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| DdnsError::transport(target, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| DdnsError::transport(target, e))?;
    debug!("{} response ({}): {}", target, status, body);

    serde_json::from_str(&body).map_err(|e| {
        if status.is_success() {
            DdnsError::decode(target, e)
        } else {
            DdnsError::transport(target, format!("HTTP status {}", status))
        }
    })
}
