pub mod dnspod;

use async_trait::async_trait;

use crate::error::Result;

/// A record as published by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub id: String,
    pub value: String,
}

#[async_trait]
pub trait RecordApi {
    /// Looks up the record whose name is exactly `sub_domain`.
    async fn get_record(&self, sub_domain: &str) -> Result<DnsRecord>;

    /// Points the A record `record_id` at `ip`.
    async fn update_record(&self, record_id: &str, ip: &str) -> Result<()>;
}
