mod config;
mod error;
mod http;
mod poller;
mod provider;
mod public_ip;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use time::UtcOffset;

use crate::config::{
    non_empty, parse_interval, Config, DEFAULT_API_BASE, DEFAULT_EMAIL, DEFAULT_IP_URL,
    DEFAULT_STATUS_OK,
};
use crate::poller::Poller;
use crate::provider::dnspod::DnspodClient;
use crate::public_ip::HttpIpSource;

#[derive(Parser, Debug)]
#[command(name = "dnspod-ddns", version)]
#[command(about = "Keeps a DNSPod A record pointed at this network's public IP")]
struct Args {
    /// DNSPod API token id
    #[arg(long, env = "DNSPOD_ID")]
    id: Option<String>,

    /// DNSPod API token secret
    #[arg(long, env = "DNSPOD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Zone to operate on, e.g. example.com
    #[arg(long, env = "DNSPOD_DOMAIN")]
    domain: Option<String>,

    /// Host label of the record to keep in sync
    #[arg(long, env = "DNSPOD_SUBDOMAIN")]
    sub_domain: Option<String>,

    /// Record id; skips the lookup by subdomain when given without one
    #[arg(long, env = "DNSPOD_RECORDID")]
    record_id: Option<String>,

    /// Seconds between checks (minimum 5, default 60)
    #[arg(long, env = "DNSPOD_INTERNAL")]
    interval: Option<String>,

    /// Contact address sent in the User-Agent
    #[arg(long, env = "DNSPOD_EMAIL")]
    email: Option<String>,

    /// DNSPod API base URL
    #[arg(long, env = "DNSPOD_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Public IP echo service returning {"origin": "<ip>"}
    #[arg(long, env = "DNSPOD_IP_URL", default_value = DEFAULT_IP_URL)]
    ip_url: String,

    /// Status code DNSPod uses to signal success
    #[arg(long, env = "DNSPOD_STATUS_OK", default_value = DEFAULT_STATUS_OK)]
    status_ok: String,

    /// Default log filter (RUST_LOG takes precedence)
    #[arg(long, env = "DNSPOD_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            dnspod_id: non_empty(self.id).unwrap_or_default(),
            dnspod_token: non_empty(self.token).unwrap_or_default(),
            domain: non_empty(self.domain).unwrap_or_default(),
            sub_domain: non_empty(self.sub_domain),
            record_id: non_empty(self.record_id),
            interval_secs: parse_interval(self.interval.as_deref()),
            email: non_empty(self.email).unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            api_base: self.api_base,
            ip_url: self.ip_url,
            status_ok: self.status_ok,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Read before any worker thread exists; afterwards the lookup is refused.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let args = Args::parse();

    // Status lines go to stdout (RUST_LOG takes precedence)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .target(env_logger::Target::Stdout)
        .init();

    let config = args.into_config();
    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!(
        "Watching {}.{} (record id: {}) every {}s",
        config.sub_domain.as_deref().unwrap_or("@"),
        config.domain,
        config.record_id.as_deref().unwrap_or("to be resolved"),
        config.interval_secs
    );

    let client = http::build_client(&config.email).context("Failed to build HTTP client")?;
    let ip_source = HttpIpSource::new(client.clone(), config.ip_url.clone());
    let records = DnspodClient::new(client, &config);

    Poller::new(&config, ip_source, records)
        .with_offset(offset)
        .run()
        .await;

    Ok(())
}
