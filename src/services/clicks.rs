use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::{BatchlinkError, Result};
use crate::storages::click::ClickManager;
use crate::storages::{ShortUrl, Storage};

/// Liveness-gated click accounting.
///
/// Resolution and accounting share this one decision path, so a caller
/// redirecting and a caller counting always report the same error kind for
/// the same code state.
#[derive(Clone)]
pub struct ClickAccountant {
    storage: Arc<dyn Storage>,
    manager: Arc<ClickManager>,
}

impl ClickAccountant {
    pub fn new(storage: Arc<dyn Storage>, manager: Arc<ClickManager>) -> Self {
        ClickAccountant { storage, manager }
    }

    /// Record one click against `code` and return the live mapping.
    ///
    /// `NotFound` for codes that never existed, `Expired` for codes whose
    /// validity window elapsed; neither increments the counter.
    pub async fn record_click(&self, code: &str, now: DateTime<Utc>) -> Result<ShortUrl> {
        let url = self
            .storage
            .get(code)
            .await
            .ok_or_else(|| BatchlinkError::not_found(format!("Short URL not found: {}", code)))?;

        if !url.is_live(now) {
            return Err(BatchlinkError::expired(format!(
                "Short URL '{}' expired at {}",
                code,
                url.expires_at.to_rfc3339()
            )));
        }

        self.manager.increment(code);
        Ok(url)
    }
}
