use std::time::Duration;

use thiserror::Error;

pub const MIN_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_EMAIL: &str = "example@example.com";
pub const DEFAULT_API_BASE: &str = "https://dnsapi.cn";
pub const DEFAULT_IP_URL: &str = "https://httpbin.org/ip";
/// DNSPod reports success as status code "1".
pub const DEFAULT_STATUS_OK: &str = "1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment DNSPOD_ID required")]
    MissingId,
    #[error("environment DNSPOD_TOKEN required")]
    MissingToken,
    #[error("environment DNSPOD_RECORDID or DNSPOD_SUBDOMAIN required")]
    MissingTarget,
    #[error("environment DNSPOD_DOMAIN required")]
    MissingDomain,
    #[error("environment DNSPOD_INTERNAL must be at least {min} seconds, got {0}", min = MIN_INTERVAL_SECS)]
    IntervalTooShort(u64),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dnspod_id: String,
    pub dnspod_token: String,
    pub domain: String,
    pub sub_domain: Option<String>,
    pub record_id: Option<String>,
    pub interval_secs: u64,
    pub email: String,
    pub api_base: String,
    pub ip_url: String,
    pub status_ok: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dnspod_id: String::new(),
            dnspod_token: String::new(),
            domain: String::new(),
            sub_domain: None,
            record_id: None,
            interval_secs: DEFAULT_INTERVAL_SECS,
            email: DEFAULT_EMAIL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            ip_url: DEFAULT_IP_URL.to_string(),
            status_ok: DEFAULT_STATUS_OK.to_string(),
        }
    }
}

impl Config {
    /// Checks the fields in a fixed order and reports the first one missing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dnspod_id.is_empty() {
            return Err(ConfigError::MissingId);
        }
        if self.dnspod_token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if self.record_id.is_none() && self.sub_domain.is_none() {
            return Err(ConfigError::MissingTarget);
        }
        if self.domain.is_empty() {
            return Err(ConfigError::MissingDomain);
        }
        if self.interval_secs < MIN_INTERVAL_SECS {
            return Err(ConfigError::IntervalTooShort(self.interval_secs));
        }
        Ok(())
    }

    /// The `<id>,<token>` pair DNSPod expects in `login_token`.
    pub fn login_token(&self) -> String {
        format!("{},{}", self.dnspod_id, self.dnspod_token)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Unset, unparsable, or too short intervals all fall back to the default.
pub fn parse_interval(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|secs| *secs >= MIN_INTERVAL_SECS as i64)
        .map(|secs| secs as u64)
        .unwrap_or(DEFAULT_INTERVAL_SECS)
}

/// Treats an empty (or blank) value the same as an unset one.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            dnspod_id: "1234".to_string(),
            dnspod_token: "bfc41abad5a9852380ba15a124690ec5".to_string(),
            domain: "example.com".to_string(),
            sub_domain: Some("test".to_string()),
            record_id: Some("123456".to_string()),
            interval_secs: 10,
            ..Config::default()
        }
    }

    #[test]
    fn validate_reports_fields_in_order() {
        let mut config = Config::default();
        assert_eq!(config.validate(), Err(ConfigError::MissingId));

        config.dnspod_id = "1234".to_string();
        assert_eq!(config.validate(), Err(ConfigError::MissingToken));

        config.dnspod_token = "secret".to_string();
        assert_eq!(config.validate(), Err(ConfigError::MissingTarget));

        config.sub_domain = Some("test".to_string());
        assert_eq!(config.validate(), Err(ConfigError::MissingDomain));

        config.domain = "example.com".to_string();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn either_record_id_or_sub_domain_is_enough() {
        let only_record = Config {
            sub_domain: None,
            ..valid()
        };
        assert!(only_record.validate().is_ok());

        let only_sub = Config {
            record_id: None,
            ..valid()
        };
        assert!(only_sub.validate().is_ok());

        let neither = Config {
            sub_domain: None,
            record_id: None,
            ..valid()
        };
        assert_eq!(neither.validate(), Err(ConfigError::MissingTarget));
    }

    #[test]
    fn short_intervals_are_rejected() {
        for secs in [0, 1, 4] {
            let config = Config {
                interval_secs: secs,
                ..valid()
            };
            assert_eq!(config.validate(), Err(ConfigError::IntervalTooShort(secs)));
        }

        let config = Config {
            interval_secs: MIN_INTERVAL_SECS,
            ..valid()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn error_messages_name_the_environment_key() {
        assert_eq!(
            ConfigError::MissingTarget.to_string(),
            "environment DNSPOD_RECORDID or DNSPOD_SUBDOMAIN required"
        );
        assert_eq!(
            ConfigError::IntervalTooShort(3).to_string(),
            "environment DNSPOD_INTERNAL must be at least 5 seconds, got 3"
        );
    }

    #[test]
    fn interval_falls_back_to_default() {
        assert_eq!(parse_interval(None), 60);
        assert_eq!(parse_interval(Some("")), 60);
        assert_eq!(parse_interval(Some("soon")), 60);
        assert_eq!(parse_interval(Some("-1")), 60);
        assert_eq!(parse_interval(Some("4")), 60);
        assert_eq!(parse_interval(Some("5")), 5);
        assert_eq!(parse_interval(Some(" 300 ")), 300);
    }

    #[test]
    fn blank_values_count_as_unset() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("www".to_string())), Some("www".to_string()));
    }

    #[test]
    fn login_token_joins_id_and_token() {
        assert_eq!(
            valid().login_token(),
            "1234,bfc41abad5a9852380ba15a124690ec5"
        );
    }
}
