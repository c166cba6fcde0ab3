use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use dashmap::DashMap;
use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::storages::click::ClickSink;

/// Buffers click increments off the redirect hot path and drains them to a
/// sink on an interval. Entry-level atomicity in the buffer plus drain-once
/// semantics in the flush mean concurrent increments are never lost.
pub struct ClickManager {
    buffer: DashMap<String, u64>,
    flush_lock: AtomicBool,
    sink: Arc<dyn ClickSink>,
    flush_interval: Duration,
}

impl ClickManager {
    pub fn new(sink: Arc<dyn ClickSink>, flush_interval: Duration) -> Self {
        Self {
            buffer: DashMap::new(),
            flush_lock: AtomicBool::new(false),
            sink,
            flush_interval,
        }
    }

    /// 增加点击计数（线程安全，无锁）
    pub fn increment(&self, code: &str) {
        *self.buffer.entry(code.to_string()).or_insert(0) += 1;
    }

    /// 启动后台刷盘任务
    pub async fn start_background_task(&self) {
        loop {
            sleep(self.flush_interval).await;

            debug!("ClickManager: triggering flush to storage");
            self.flush_inner().await;
        }
    }

    pub async fn flush(&self) {
        debug!("ClickManager: manual flush triggered");
        self.flush_inner().await;
    }

    async fn flush_inner(&self) {
        if self.flush_lock.swap(true, Ordering::SeqCst) {
            debug!("ClickManager: flush already in progress, skipping");
            return;
        }

        // Drain entry by entry: an increment racing the flush either lands
        // before its entry is removed (counted now) or re-creates the entry
        // (counted next flush). Never both, never neither.
        let keys: Vec<String> = self.buffer.iter().map(|entry| entry.key().clone()).collect();

        if keys.is_empty() {
            debug!("ClickManager: no clicks to flush");
            self.flush_lock.store(false, Ordering::SeqCst);
            return;
        }

        let mut updates = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some((code, count)) = self.buffer.remove(&key) {
                if count > 0 {
                    updates.push((code, count));
                }
            }
        }

        let result = self.sink.flush_clicks(updates).await;

        if let Err(e) = result {
            debug!("ClickManager: flush_clicks failed: {}", e);
        }

        self.flush_lock.store(false, Ordering::SeqCst);
        debug!("ClickManager: flush completed");
    }
}
