use async_trait::async_trait;
use migrato_core::{DataSet, MigrationEntry};
use parking_lot::RwLock;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use crate::catalog::Catalog;

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog(Arc<RwLock<BTreeMap<String, BTreeSet<String>>>>);

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_location(&self, location: impl Into<String>) {
        self.0.write().entry(location.into()).or_default();
    }

    pub fn insert(&self, location: impl Into<String>, name: impl Into<String>) {
        self.0
            .write()
            .entry(location.into())
            .or_default()
            .insert(name.into());
    }

    pub fn remove(&self, location: &str, name: &str) -> bool {
        self.0
            .write()
            .get_mut(location)
            .map(|names| names.remove(name))
            .unwrap_or(false)
    }

    pub fn remove_location(&self, location: &str) -> bool {
        self.0.write().remove(location).is_some()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn scan(&self) -> DataSet {
        let locations = self.0.read();
        let mut data = DataSet::new();

        for (location, names) in locations.iter() {
            let group = data.location(location.to_owned());
            for name in names {
                group.insert(MigrationEntry::new(location.to_owned(), name.to_owned()));
            }
        }

        data
    }
}
