use thiserror::Error;

pub type Result<T> = std::result::Result<T, DdnsError>;

/// Failures of a single remote call. The poller logs these and retries
/// after one interval, whatever the variant.
#[derive(Debug, Error)]
pub enum DdnsError {
    #[error("Failed to request {target}: {detail}")]
    Transport { target: &'static str, detail: String },

    #[error("Failed to decode {target} response: {detail}")]
    Decode { target: &'static str, detail: String },

    #[error("DNSPod rejected {action}, code: {code}, message: {message}")]
    Rejected {
        action: &'static str,
        code: String,
        message: String,
    },

    #[error("No record named '{sub_domain}' found, create it in the DNSPod console first")]
    RecordNotFound { sub_domain: String },

    #[error("Neither a record id nor a subdomain is configured")]
    NoRecordTarget,
}

impl DdnsError {
    pub fn transport(target: &'static str, detail: impl ToString) -> Self {
        Self::Transport {
            target,
            detail: detail.to_string(),
        }
    }

    pub fn decode(target: &'static str, detail: impl ToString) -> Self {
        Self::Decode {
            target,
            detail: detail.to_string(),
        }
    }
}
