use std::net::Ipv4Addr;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{DdnsError, Result};
use crate::http::fetch_json;

const TARGET: &str = "public IP";

#[async_trait]
pub trait IpSource {
    async fn public_ip(&self) -> Result<String>;
}

/// Asks an httpbin-style echo service for the caller's address.
pub struct HttpIpSource {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct EchoResponse {
    origin: String,
}

impl HttpIpSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn public_ip(&self) -> Result<String> {
        let response: EchoResponse = fetch_json(self.client.get(&self.url), TARGET).await?;
        parse_origin(&response.origin)
    }
}

/// Behind proxies `origin` holds a comma-separated chain; the first hop is ours.
fn parse_origin(origin: &str) -> Result<String> {
    let first = origin.split(',').next().unwrap_or_default().trim();
    first
        .parse::<Ipv4Addr>()
        .map(|ip| ip.to_string())
        .map_err(|_| DdnsError::decode(TARGET, format!("not an IPv4 address: {:?}", origin)))
}
