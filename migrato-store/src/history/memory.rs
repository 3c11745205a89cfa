use async_trait::async_trait;
use chrono::{DateTime, Utc};
use migrato_core::HistorySnapshot;
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

use crate::{error::Result, history::History};

/// History kept in memory. Unavailable until [`MemoryHistory::ready`].
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory(Arc<RwLock<Option<HashMap<String, DateTime<Utc>>>>>);

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&self) {
        self.0.write().get_or_insert_with(HashMap::new);
    }

    pub fn unavailable(&self) {
        *self.0.write() = None;
    }

    /// Records a migration as applied, making the history available.
    pub fn apply(&self, name: impl Into<String>, at: DateTime<Utc>) {
        self.0
            .write()
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), at);
    }

    pub fn revert(&self, name: &str) -> bool {
        self.0
            .write()
            .as_mut()
            .map(|applied| applied.remove(name).is_some())
            .unwrap_or(false)
    }
}

#[async_trait]
impl History for MemoryHistory {
    async fn snapshot(&self) -> Result<Option<HistorySnapshot>> {
        Ok(self.0.read().as_ref().map(|applied| {
            applied
                .iter()
                .map(|(name, at)| (name.to_owned(), *at))
                .collect()
        }))
    }
}
