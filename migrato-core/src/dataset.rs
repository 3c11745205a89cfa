use chrono::{DateTime, Utc};
use std::collections::{btree_map, BTreeMap, HashMap};

use crate::MigrationEntry;

/// Entries of a single location, keyed by migration name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationGroup(BTreeMap<String, MigrationEntry>);

impl LocationGroup {
    /// Inserts an entry unless one with the same name already exists.
    /// Returns `false` when the entry was a duplicate.
    pub fn insert(&mut self, entry: MigrationEntry) -> bool {
        match self.0.entry(entry.name.to_owned()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&MigrationEntry> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MigrationEntry> {
        self.0.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MigrationEntry> {
        self.0.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MigrationEntry> {
        self.0.values_mut()
    }
}

/// Scanned migrations grouped by location key.
///
/// Equality is structural: two data sets are equal when every location maps
/// to equal entries, statuses and timestamps included. Insertion order never
/// matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataSet(BTreeMap<String, LocationGroup>);

impl DataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a location even if no migration is found in it.
    pub fn location(&mut self, key: impl Into<String>) -> &mut LocationGroup {
        self.0.entry(key.into()).or_default()
    }

    /// Adds an entry to its location. The first entry wins on duplicate names.
    pub fn insert(&mut self, entry: MigrationEntry) -> bool {
        self.location(entry.location.to_owned()).insert(entry)
    }

    pub fn with(mut self, entry: MigrationEntry) -> Self {
        self.insert(entry);
        self
    }

    pub fn get(&self, location: &str, name: &str) -> Option<&MigrationEntry> {
        self.0.get(location).and_then(|group| group.get(name))
    }

    pub fn get_mut(&mut self, location: &str, name: &str) -> Option<&mut MigrationEntry> {
        self.0.get_mut(location).and_then(|group| group.get_mut(name))
    }

    pub fn group(&self, location: &str) -> Option<&LocationGroup> {
        self.0.get(location)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&String, &LocationGroup)> {
        self.0.iter()
    }

    pub fn entries(&self) -> impl Iterator<Item = &MigrationEntry> {
        self.0.values().flat_map(|group| group.iter())
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut MigrationEntry> {
        self.0.values_mut().flat_map(|group| group.iter_mut())
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<MigrationEntry> for DataSet {
    fn from_iter<T: IntoIterator<Item = MigrationEntry>>(iter: T) -> Self {
        let mut data = DataSet::new();
        for entry in iter {
            data.insert(entry);
        }

        data
    }
}

/// Applied migrations by name, as read from history for a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySnapshot(HashMap<String, DateTime<Utc>>);

impl HistorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, applied_at: DateTime<Utc>) {
        self.0.insert(name.into(), applied_at);
    }

    pub fn with(mut self, name: impl Into<String>, applied_at: DateTime<Utc>) -> Self {
        self.insert(name, applied_at);
        self
    }

    pub fn get(&self, name: &str) -> Option<DateTime<Utc>> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, DateTime<Utc>)> for HistorySnapshot {
    fn from_iter<T: IntoIterator<Item = (N, DateTime<Utc>)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, at)| (name.into(), at))
                .collect(),
        )
    }
}
