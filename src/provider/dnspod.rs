use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::Deserialize;

use super::{DnsRecord, RecordApi};
use crate::config::Config;
use crate::error::{DdnsError, Result};
use crate::http::fetch_json;

const RECORD_TYPE: &str = "A";
/// DNSPod's default resolution line.
const RECORD_LINE: &str = "默认";

pub struct DnspodClient {
    client: Client,
    api_base: String,
    login_token: String,
    domain: String,
    sub_domain: Option<String>,
    status_ok: String,
}

impl DnspodClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            login_token: config.login_token(),
            domain: config.domain.clone(),
            sub_domain: config.sub_domain.clone(),
            status_ok: config.status_ok.clone(),
        }
    }

    /// Parameters shared by every DNSPod call: credentials, JSON output,
    /// and no error for an empty record list.
    fn common_params<'a>(&'a self, sub_domain: Option<&'a str>) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("login_token", self.login_token.as_str()),
            ("format", "json"),
            ("lang", "cn"),
            ("error_on_empty", "no"),
            ("domain", self.domain.as_str()),
        ];
        if let Some(sub_domain) = sub_domain {
            params.push(("sub_domain", sub_domain));
        }
        params
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}", self.api_base, action)
    }
}

#[async_trait]
impl RecordApi for DnspodClient {
    async fn get_record(&self, sub_domain: &str) -> Result<DnsRecord> {
        let params = self.common_params(Some(sub_domain));

        let response: RecordListResponse = fetch_json(
            self.client.post(self.endpoint("Record.List")).form(&params),
            "record list",
        )
        .await?;

        check_status(&response.status, &self.status_ok, "record list")?;
        select_record(response.records, sub_domain)
    }

    async fn update_record(&self, record_id: &str, ip: &str) -> Result<()> {
        let mut params = self.common_params(self.sub_domain.as_deref());
        params.extend([
            ("record_id", record_id),
            ("record_type", RECORD_TYPE),
            ("record_line", RECORD_LINE),
            ("value", ip),
        ]);

        let response: StatusResponse = fetch_json(
            self.client.post(self.endpoint("Record.Modify")).form(&params),
            "record modify",
        )
        .await?;

        check_status(&response.status, &self.status_ok, "record modify")?;
        info!("DNSPod accepted record {} -> {}", record_id, ip);
        Ok(())
    }
}

fn check_status(status: &Status, status_ok: &str, action: &'static str) -> Result<()> {
    if status.code == status_ok {
        return Ok(());
    }
    Err(DdnsError::Rejected {
        action,
        code: status.code.clone(),
        message: status.message.clone(),
    })
}

/// First entry whose name matches exactly; the provider's filter is not trusted.
fn select_record(records: Vec<RecordEntry>, sub_domain: &str) -> Result<DnsRecord> {
    records
        .into_iter()
        .find(|r| r.name == sub_domain)
        .map(|r| DnsRecord {
            id: r.id,
            value: r.value,
        })
        .ok_or_else(|| DdnsError::RecordNotFound {
            sub_domain: sub_domain.to_string(),
        })
}

// DNSPod API types

#[derive(Debug, Deserialize)]
struct Status {
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Status,
}

#[derive(Debug, Deserialize)]
struct RecordListResponse {
    status: Status,
    #[serde(default)]
    records: Vec<RecordEntry>,
}

#[derive(Debug, Deserialize)]
struct RecordEntry {
    name: String,
    id: String,
    value: String,
}
