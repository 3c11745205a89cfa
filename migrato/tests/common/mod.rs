#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use migrato::{
    Catalog, DataSet, History, HistorySnapshot, MemoryCatalog, MemoryHistory, StoreError, Tree,
};
use parking_lot::Mutex;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

pub const APP: &str = "app/migrations";

pub fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
}

/// `app/migrations` with two migrations, the first one applied.
pub fn fixtures() -> (MemoryCatalog, MemoryHistory) {
    let catalog = MemoryCatalog::new();
    catalog.insert(APP, "m_001_create_users");
    catalog.insert(APP, "m_002_add_email");

    let history = MemoryHistory::new();
    history.apply("m_001_create_users", t1());

    (catalog, history)
}

pub fn leaf_names(tree: &Tree) -> Vec<String> {
    tree.leaves().map(|leaf| leaf.name.to_owned()).collect()
}

/// Keeps every tree handed to the renderer.
#[derive(Clone, Default)]
pub struct Rendered(pub Arc<Mutex<Vec<Tree>>>);

impl Rendered {
    pub fn renderer(&self) -> impl FnMut(&Tree) + Send + 'static {
        let trees = self.0.clone();
        move |tree: &Tree| trees.lock().push(tree.clone())
    }

    pub fn count(&self) -> usize {
        self.0.lock().len()
    }

    pub fn last(&self) -> Option<Tree> {
        self.0.lock().last().cloned()
    }
}

/// Catalog that takes its time and counts scans.
#[derive(Clone)]
pub struct SlowCatalog {
    pub inner: MemoryCatalog,
    pub scans: Arc<AtomicUsize>,
    delay: Duration,
}

impl SlowCatalog {
    pub fn new(inner: MemoryCatalog, delay: Duration) -> Self {
        Self {
            inner,
            scans: Arc::new(AtomicUsize::new(0)),
            delay,
        }
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for SlowCatalog {
    async fn scan(&self) -> DataSet {
        self.scans.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.scan().await
    }
}

#[derive(Clone)]
pub struct FailingHistory;

#[async_trait]
impl History for FailingHistory {
    async fn snapshot(&self) -> Result<Option<HistorySnapshot>, StoreError> {
        Err(StoreError::Any(anyhow::anyhow!("connection refused")))
    }
}
