//! URL validation
//!
//! Rejects malformed targets and dangerous schemes before a mapping is
//! created.

use url::Url;

use crate::errors::{BatchlinkError, Result};

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// Validate a target URL.
///
/// Accepts only syntactically valid absolute http(s) URLs with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();

    if url.is_empty() {
        return Err(BatchlinkError::invalid_url("URL cannot be empty"));
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(BatchlinkError::invalid_url(format!(
                "Dangerous protocol blocked: {}",
                proto
            )));
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(BatchlinkError::invalid_url(format!(
            "Invalid protocol: {}. Only http:// and https:// are allowed",
            proto
        )));
    }

    let parsed =
        Url::parse(url).map_err(|e| BatchlinkError::invalid_url(format!("Invalid URL: {}", e)))?;

    if parsed.host_str().is_none() {
        return Err(BatchlinkError::invalid_url("URL must have a host"));
    }

    Ok(())
}
