pub mod url_validator;

use crate::errors::{BatchlinkError, Result};

pub const MIN_CODE_LENGTH: usize = 3;
pub const MAX_CODE_LENGTH: usize = 10;

pub fn generate_random_code(length: usize) -> String {
    use rand::Rng;
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    iter::repeat_with(|| chars[rng.gen_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// Validate a user-supplied shortcode: 3-10 characters, alphanumeric only,
/// case-sensitive. No side effects.
pub fn validate_custom_code(code: &str) -> Result<()> {
    if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
        return Err(BatchlinkError::invalid_shortcode(format!(
            "Shortcode must be {}-{} characters, got {}",
            MIN_CODE_LENGTH,
            MAX_CODE_LENGTH,
            code.len()
        )));
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(BatchlinkError::invalid_shortcode(
            "Shortcode may only contain A-Z, a-z and 0-9",
        ));
    }

    Ok(())
}

/// Human-readable uptime for log lines.
pub fn format_duration_human(from: chrono::DateTime<chrono::Utc>, to: chrono::DateTime<chrono::Utc>) -> String {
    let duration = to.signed_duration_since(from);

    if duration.num_seconds() < 0 {
        return "0s".to_string();
    }

    let days = duration.num_days();
    let hours = (duration.num_seconds() % 86400) / 3600;
    let minutes = (duration.num_seconds() % 3600) / 60;

    if days > 0 {
        format!("{}d{}h", days, hours)
    } else if hours > 0 {
        format!("{}h{}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", duration.num_seconds())
    }
}
