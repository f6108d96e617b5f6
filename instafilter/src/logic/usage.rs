//! Persisted count of filter changes and the review-prompt threshold.

use crate::config;
use anyhow::Result;
use log::warn;

pub trait UsageStore {
    fn load(&self) -> u32;
    fn store(&mut self, count: u32) -> Result<()>;
}

/// Keeps the counter in the global config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigUsageStore;

impl UsageStore for ConfigUsageStore {
    fn load(&self) -> u32 {
        config::all().usage.filter_count
    }

    fn store(&mut self, count: u32) -> Result<()> {
        let mut all = config::all();
        all.usage.filter_count = count;
        config::save(all)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryUsageStore {
    count: u32,
}

impl MemoryUsageStore {
    pub fn new(count: u32) -> Self {
        Self { count }
    }
}

impl UsageStore for MemoryUsageStore {
    fn load(&self) -> u32 {
        self.count
    }

    fn store(&mut self, count: u32) -> Result<()> {
        self.count = count;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct UsageCounter<S> {
    store: S,
    review_threshold: u32,
}

impl<S: UsageStore> UsageCounter<S> {
    pub fn new(store: S, review_threshold: u32) -> Self {
        Self {
            store,
            review_threshold,
        }
    }

    pub fn count(&self) -> u32 {
        self.store.load()
    }

    /// Adds one filter change and persists it. A failed write is logged and
    /// the in-memory count is still returned.
    pub fn record_filter_change(&mut self) -> u32 {
        let count = self.store.load().saturating_add(1);
        if let Err(e) = self.store.store(count) {
            warn!("save filter count failed: {e:?}");
        }
        count
    }

    pub fn is_review_due(&self, count: u32) -> bool {
        count >= self.review_threshold
    }
}
