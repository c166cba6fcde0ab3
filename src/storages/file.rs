use std::fs;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{error, info};

use super::memory::UrlIndex;
use super::{SerializableShortUrl, ShortUrl, Storage};
use crate::errors::{BatchlinkError, Result};

/// JSON-file backend. All reads are served from the in-memory index; every
/// mutation rewrites the file while still holding the write lock, so the
/// persisted snapshot never observes a half-applied update.
#[derive(Debug)]
pub struct FileStorage {
    file_path: String,
    index: RwLock<UrlIndex>,
}

impl FileStorage {
    pub fn new(file_path: &str) -> Result<Self> {
        let storage = FileStorage {
            file_path: file_path.to_string(),
            index: RwLock::new(UrlIndex::default()),
        };

        // 初始化时加载数据到缓存
        let urls = storage.load_from_file()?;
        {
            let mut index = storage.index.write();
            index.replace(urls);
            info!(
                "FileStorage initialized, loaded {} short URLs from {}",
                index.count(),
                file_path
            );
        }

        Ok(storage)
    }

    fn load_from_file(&self) -> Result<Vec<ShortUrl>> {
        match fs::read_to_string(&self.file_path) {
            Ok(content) => {
                let records: Vec<SerializableShortUrl> =
                    serde_json::from_str(&content).map_err(|e| {
                        error!("Failed to parse URLs file: {}", e);
                        BatchlinkError::serialization(format!("Failed to parse URLs file: {}", e))
                    })?;

                let mut urls = Vec::with_capacity(records.len());
                for record in records {
                    match ShortUrl::try_from(record) {
                        Ok(url) => urls.push(url),
                        Err(e) => error!("Skipping URL record with bad timestamp: {}", e),
                    }
                }
                Ok(urls)
            }
            Err(_) => {
                info!("URLs file missing, creating empty storage");
                fs::write(&self.file_path, "[]").map_err(|e| {
                    BatchlinkError::file_operation(format!("Failed to create URLs file: {}", e))
                })?;
                Ok(Vec::new())
            }
        }
    }

    fn save_to_file(&self, index: &UrlIndex) -> Result<()> {
        let records: Vec<SerializableShortUrl> = index
            .load_all()
            .iter()
            .map(SerializableShortUrl::from)
            .collect();

        let json = serde_json::to_string_pretty(&records)?;
        fs::write(&self.file_path, json)?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, code: &str) -> Option<ShortUrl> {
        self.index.read().get(code)
    }

    async fn load_all(&self) -> Vec<ShortUrl> {
        self.index.read().load_all()
    }

    async fn insert(&self, url: ShortUrl) -> Result<()> {
        let mut index = self.index.write();
        index.insert(url)?;
        self.save_to_file(&index)
    }

    async fn increment_clicks(&self, code: &str, n: u64) -> Result<()> {
        let mut index = self.index.write();
        index.increment_clicks(code, n)?;
        self.save_to_file(&index)
    }

    async fn count_urls(&self) -> u64 {
        self.index.read().count()
    }

    async fn total_clicks(&self) -> u64 {
        self.index.read().total_clicks()
    }

    async fn get_backend_name(&self) -> String {
        "file".to_string()
    }
}
