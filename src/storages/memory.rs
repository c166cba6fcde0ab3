use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;

use super::{ShortUrl, Storage};
use crate::errors::{BatchlinkError, Result};

/// Insertion-ordered index shared by the in-memory and file backends.
///
/// One write lock serializes all mutations, so reserve-and-create is a
/// single atomic step and click increments on the same code never race.
#[derive(Default, Debug)]
pub(crate) struct UrlIndex {
    map: HashMap<String, ShortUrl>,
    order: Vec<String>,
}

impl UrlIndex {
    pub(crate) fn get(&self, code: &str) -> Option<ShortUrl> {
        self.map.get(code).cloned()
    }

    pub(crate) fn load_all(&self) -> Vec<ShortUrl> {
        self.order
            .iter()
            .filter_map(|code| self.map.get(code).cloned())
            .collect()
    }

    pub(crate) fn insert(&mut self, url: ShortUrl) -> Result<()> {
        if self.map.contains_key(&url.code) {
            return Err(BatchlinkError::code_taken(format!(
                "Shortcode '{}' is already in use",
                url.code
            )));
        }
        self.order.push(url.code.clone());
        self.map.insert(url.code.clone(), url);
        Ok(())
    }

    pub(crate) fn increment_clicks(&mut self, code: &str, n: u64) -> Result<()> {
        match self.map.get_mut(code) {
            Some(url) => {
                url.clicks += n;
                Ok(())
            }
            None => Err(BatchlinkError::not_found(format!(
                "Short URL not found: {}",
                code
            ))),
        }
    }

    pub(crate) fn count(&self) -> u64 {
        self.map.len() as u64
    }

    pub(crate) fn total_clicks(&self) -> u64 {
        self.map.values().map(|url| url.clicks).sum()
    }

    pub(crate) fn replace(&mut self, urls: Vec<ShortUrl>) {
        self.map.clear();
        self.order.clear();
        for url in urls {
            self.order.push(url.code.clone());
            self.map.insert(url.code.clone(), url);
        }
    }
}

pub struct MemoryStorage {
    index: RwLock<UrlIndex>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        info!("MemoryStorage initialized");
        MemoryStorage {
            index: RwLock::new(UrlIndex::default()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, code: &str) -> Option<ShortUrl> {
        self.index.read().get(code)
    }

    async fn load_all(&self) -> Vec<ShortUrl> {
        self.index.read().load_all()
    }

    async fn insert(&self, url: ShortUrl) -> Result<()> {
        self.index.write().insert(url)
    }

    async fn increment_clicks(&self, code: &str, n: u64) -> Result<()> {
        self.index.write().increment_clicks(code, n)
    }

    async fn count_urls(&self) -> u64 {
        self.index.read().count()
    }

    async fn total_clicks(&self) -> u64 {
        self.index.read().total_clicks()
    }

    async fn get_backend_name(&self) -> String {
        "memory".to_string()
    }
}
