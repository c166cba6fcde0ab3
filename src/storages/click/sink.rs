use std::sync::Arc;

use crate::storages::Storage;

/// Destination for drained click counts.
#[async_trait::async_trait]
pub trait ClickSink: Send + Sync {
    async fn flush_clicks(&self, updates: Vec<(String, u64)>) -> anyhow::Result<()>;
}

/// Sink that merges drained counts into the mapping store.
///
/// A code that has expired since the click was recorded still gets its
/// count: the click happened inside the validity window.
pub struct StorageSink {
    storage: Arc<dyn Storage>,
}

impl StorageSink {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        StorageSink { storage }
    }
}

#[async_trait::async_trait]
impl ClickSink for StorageSink {
    async fn flush_clicks(&self, updates: Vec<(String, u64)>) -> anyhow::Result<()> {
        for (code, count) in updates {
            if let Err(e) = self.storage.increment_clicks(&code, count).await {
                // A count for a code the store does not know cannot be
                // applied; log and keep flushing the rest.
                tracing::warn!("Dropping {} clicks for '{}': {}", count, code, e);
            }
        }
        Ok(())
    }
}
