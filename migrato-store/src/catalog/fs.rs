use async_trait::async_trait;
use migrato_core::{DataSet, MigrationEntry};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    error::{Result, StoreError},
};

#[derive(Debug, Clone)]
struct Location {
    key: String,
    root: PathBuf,
}

/// Catalog reading migration files from directories.
///
/// Each configured root is listed without recursion. Hidden files are
/// skipped and the migration name is the file stem.
#[derive(Debug, Clone, Default)]
pub struct FsCatalog {
    locations: Vec<Location>,
    extensions: Vec<String>,
}

impl FsCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root keyed by its path.
    pub fn path(self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let key = root.display().to_string();

        self.location(key, root)
    }

    pub fn location(mut self, key: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.locations.push(Location {
            key: key.into(),
            root: root.into(),
        });
        self
    }

    /// Restricts the scan to files with this extension (case-insensitive).
    /// Without any extension every file is a migration.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extensions
            .push(extension.trim_start_matches('.').to_lowercase());
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    async fn read_location(&self, location: &Location) -> Result<Vec<String>> {
        let unreadable =
            |e: std::io::Error| StoreError::UnreadableLocation(location.key.to_owned(), e);

        let mut dir = tokio::fs::read_dir(&location.root)
            .await
            .map_err(unreadable)?;

        let mut names = Vec::new();

        while let Some(entry) = dir.next_entry().await.map_err(unreadable)? {
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(e) => {
                    debug!("skip {}: {e}", entry.path().display());
                    continue;
                }
            };

            if !file_type.is_file() {
                continue;
            }

            let path = entry.path();
            if !self.accepts(&path) {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            if stem.is_empty() || stem.starts_with('.') {
                continue;
            }

            names.push(stem.to_owned());
        }

        Ok(names)
    }
}

#[async_trait]
impl Catalog for FsCatalog {
    async fn scan(&self) -> DataSet {
        let mut data = DataSet::new();

        for location in self.locations.iter() {
            let names = match self.read_location(location).await {
                Ok(names) => names,
                Err(e) => {
                    warn!("{e}");
                    continue;
                }
            };

            debug!("{} migrations found in {}", names.len(), location.key);

            let group = data.location(location.key.to_owned());
            for name in names {
                if !group.insert(MigrationEntry::new(location.key.to_owned(), name.to_owned())) {
                    debug!("duplicate migration {name} in {}", location.key);
                }
            }
        }

        data
    }
}
