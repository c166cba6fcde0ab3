use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::Config;
use crate::errors::Result;

pub mod click;
pub mod file;
pub mod memory;
pub mod models;

pub use models::{SerializableShortUrl, ShortUrl};

#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch a mapping regardless of expiry state. Liveness is the caller's
    /// concern, so "not found" and "found but expired" stay distinguishable.
    async fn get(&self, code: &str) -> Option<ShortUrl>;

    /// All mappings in creation order.
    async fn load_all(&self) -> Vec<ShortUrl>;

    /// Atomically reserve the code and create the mapping. Check and insert
    /// happen under one write lock; a concurrent caller for the same code
    /// gets `CodeTaken`.
    async fn insert(&self, url: ShortUrl) -> Result<()>;

    /// 增加点击量计数器
    async fn increment_clicks(&self, code: &str, n: u64) -> Result<()>;

    /// Count of all mappings ever created (nothing is deleted in-band).
    async fn count_urls(&self) -> u64;

    /// Sum of persisted click counts.
    async fn total_clicks(&self) -> u64;

    async fn get_backend_name(&self) -> String;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &Config) -> Result<Arc<dyn Storage>> {
        let boxed: Box<dyn Storage> = match config.storage_backend.as_str() {
            "file" => Box::new(file::FileStorage::new(&config.urls_file)?),
            "memory" => Box::new(memory::MemoryStorage::new()),
            other => {
                warn!("Unknown storage backend '{}', falling back to memory", other);
                Box::new(memory::MemoryStorage::new())
            }
        };

        Ok(Arc::from(boxed))
    }
}
