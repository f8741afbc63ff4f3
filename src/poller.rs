use std::time::Duration;

use log::{debug, error, info};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::config::Config;
use crate::error::{DdnsError, Result};
use crate::provider::RecordApi;
use crate::public_ip::IpSource;

/// What the poller knows between iterations. Lives only in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollState {
    pub last_ip: Option<String>,
    pub record_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Updated,
}

pub struct Poller<I, R> {
    ip_source: I,
    records: R,
    sub_domain: Option<String>,
    interval: Duration,
    offset: UtcOffset,
    state: PollState,
}

impl<I: IpSource, R: RecordApi> Poller<I, R> {
    pub fn new(config: &Config, ip_source: I, records: R) -> Self {
        Self {
            ip_source,
            records,
            sub_domain: config.sub_domain.clone(),
            interval: config.interval(),
            offset: UtcOffset::UTC,
            state: PollState {
                last_ip: None,
                record_id: config.record_id.clone(),
            },
        }
    }

    /// Offset used when printing the next check time.
    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    #[cfg(test)]
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Polls forever. Every iteration, failed or not, is followed by exactly
    /// one interval of sleep.
    pub async fn run(mut self) {
        info!("start");
        loop {
            match self.tick().await {
                Ok(_) => info!(
                    "Next check at {}",
                    next_check_time(OffsetDateTime::now_utc().to_offset(self.offset), self.interval)
                ),
                Err(e) => error!("{}", e),
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One iteration: public IP, record lookup if needed, update if changed.
    /// On error the cached last IP is left untouched.
    pub async fn tick(&mut self) -> Result<Outcome> {
        let public_ip = self.ip_source.public_ip().await?;
        let record_id = self.record_id().await?;

        if self.state.last_ip.as_deref() == Some(public_ip.as_str()) {
            debug!("Public IP {} unchanged", public_ip);
            return Ok(Outcome::Unchanged);
        }

        info!(
            "Public IP changed from {} to {}, updating record {}",
            self.state.last_ip.as_deref().unwrap_or("unknown"),
            public_ip,
            record_id
        );
        self.records.update_record(&record_id, &public_ip).await?;

        info!("Record updated, new public IP: {}", public_ip);
        self.state.last_ip = Some(public_ip);
        Ok(Outcome::Updated)
    }

    /// The record is (re)resolved while either the id or the published IP is
    /// unknown. Without a subdomain there is nothing to list, so a configured
    /// id is used as-is.
    async fn record_id(&mut self) -> Result<String> {
        let known = self.state.last_ip.is_some();
        match (self.state.record_id.clone(), self.sub_domain.as_deref()) {
            (Some(id), _) if known => Ok(id),
            (Some(id), None) => Ok(id),
            (_, Some(sub_domain)) => {
                let record = self.records.get_record(sub_domain).await?;
                info!(
                    "Found record {} for '{}', published value: {}",
                    record.id, sub_domain, record.value
                );
                self.state.record_id = Some(record.id.clone());
                self.state.last_ip = Some(record.value).filter(|v| !v.is_empty());
                Ok(record.id)
            }
            (None, None) => Err(DdnsError::NoRecordTarget),
        }
    }
}

fn next_check_time(now: OffsetDateTime, interval: Duration) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    time::Duration::try_from(interval)
        .ok()
        .and_then(|step| now.checked_add(step))
        .and_then(|next| next.format(&format).ok())
        .unwrap_or_else(|| format!("in {}s", interval.as_secs()))
}
