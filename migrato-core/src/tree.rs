//! Presentation-independent view model of the migration panel.
//!
//! The tree has a fixed depth: an unnamed root, one [`LocationNode`] per
//! location and one [`LeafNode`] per migration. Check, selection and
//! expansion flags live on the nodes and survive for as long as the nodes do,
//! which is why [`crate::sync`] avoids rebuilding whenever it can.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::{MigrationEntry, Status};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub location: String,
    pub name: String,
    pub label: String,
    pub status: Status,
    pub applied_at: Option<DateTime<Utc>>,
    pub checked: bool,
    pub selected: bool,
}

impl LeafNode {
    pub(crate) fn from_entry(entry: &MigrationEntry) -> Self {
        Self {
            location: entry.location.to_owned(),
            name: entry.name.to_owned(),
            label: entry.label(),
            status: entry.status,
            applied_at: entry.applied_at,
            checked: false,
            selected: false,
        }
    }

    pub(crate) fn refresh(&mut self, entry: &MigrationEntry) {
        self.label = entry.label();
        self.status = entry.status;
        self.applied_at = entry.applied_at;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationNode {
    pub key: String,
    pub label: String,
    pub checked: bool,
    pub expanded: bool,
    pub leaves: Vec<LeafNode>,
}

impl LocationNode {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        let key = key.into();

        Self {
            label: key.to_owned(),
            key,
            checked: false,
            expanded: false,
            leaves: Vec::new(),
        }
    }

    pub fn leaf(&self, name: &str) -> Option<&LeafNode> {
        self.leaves.iter().find(|leaf| leaf.name == name)
    }
}

/// Plain `{ label, checked, children }` shape handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub label: String,
    pub checked: bool,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub(crate) locations: Vec<LocationNode>,
    pub(crate) revision: u64,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented by every rebuild, untouched otherwise.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn locations(&self) -> &[LocationNode] {
        &self.locations
    }

    pub fn location(&self, key: &str) -> Option<&LocationNode> {
        self.locations.iter().find(|node| node.key == key)
    }

    pub fn leaf(&self, location: &str, name: &str) -> Option<&LeafNode> {
        self.location(location).and_then(|node| node.leaf(name))
    }

    pub fn leaves(&self) -> impl Iterator<Item = &LeafNode> {
        self.locations.iter().flat_map(|node| node.leaves.iter())
    }

    /// Number of location nodes.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Checks or unchecks a leaf. Returns `false` if it does not exist.
    pub fn set_checked(&mut self, location: &str, name: &str, checked: bool) -> bool {
        let Some(node) = self.location_mut(location) else {
            return false;
        };

        let Some(leaf) = node.leaves.iter_mut().find(|leaf| leaf.name == name) else {
            return false;
        };

        leaf.checked = checked;
        node.checked = !node.leaves.is_empty() && node.leaves.iter().all(|leaf| leaf.checked);

        true
    }

    /// Checks or unchecks a location and all of its leaves.
    pub fn set_location_checked(&mut self, location: &str, checked: bool) -> bool {
        let Some(node) = self.location_mut(location) else {
            return false;
        };

        node.checked = checked;
        for leaf in node.leaves.iter_mut() {
            leaf.checked = checked;
        }

        true
    }

    /// Selects a single leaf, clearing any previous selection.
    pub fn select(&mut self, location: &str, name: &str) -> bool {
        if self.leaf(location, name).is_none() {
            return false;
        }

        for node in self.locations.iter_mut() {
            for leaf in node.leaves.iter_mut() {
                leaf.selected = node.key == location && leaf.name == name;
            }
        }

        true
    }

    pub fn clear_selection(&mut self) {
        for leaf in self.locations.iter_mut().flat_map(|node| node.leaves.iter_mut()) {
            leaf.selected = false;
        }
    }

    pub fn set_expanded(&mut self, location: &str, expanded: bool) -> bool {
        match self.location_mut(location) {
            Some(node) => {
                node.expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Checked leaves in display order.
    pub fn checked(&self) -> Vec<&LeafNode> {
        self.leaves().filter(|leaf| leaf.checked).collect()
    }

    pub fn selected(&self) -> Option<&LeafNode> {
        self.leaves().find(|leaf| leaf.selected)
    }

    /// Exports the tree for a renderer, starting at the unnamed root.
    pub fn nodes(&self) -> Node {
        Node {
            label: String::new(),
            checked: !self.locations.is_empty() && self.locations.iter().all(|node| node.checked),
            children: self
                .locations
                .iter()
                .map(|node| Node {
                    label: node.label.to_owned(),
                    checked: node.checked,
                    children: node
                        .leaves
                        .iter()
                        .map(|leaf| Node {
                            label: leaf.label.to_owned(),
                            checked: leaf.checked,
                            children: Vec::new(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub(crate) fn location_mut(&mut self, key: &str) -> Option<&mut LocationNode> {
        self.locations.iter_mut().find(|node| node.key == key)
    }

    pub(crate) fn leaf_mut(&mut self, location: &str, name: &str) -> Option<&mut LeafNode> {
        self.location_mut(location)
            .and_then(|node| node.leaves.iter_mut().find(|leaf| leaf.name == name))
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.locations.iter() {
            writeln!(f, "{} {}", mark(node.checked), node.label)?;

            for leaf in node.leaves.iter() {
                writeln!(f, "  {} {}", mark(leaf.checked), leaf.label)?;
            }
        }

        Ok(())
    }
}

fn mark(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}
