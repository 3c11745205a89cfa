//! Tree synchronization.
//!
//! A pass either rebuilds the whole tree or leaves it exactly as it is.
//! Structural equality of consecutive data sets is what decides: when nothing
//! the user could see has changed, no node is touched, so checks, selection
//! and expansion survive polling refreshes.

use parse_display::Display;

use crate::{DataSet, LeafNode, LocationNode, SortOrder, Status, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "kebab-case")]
pub enum RebuildReason {
    /// Caller asked for it.
    Forced,
    /// No previous data set.
    Initial,
    /// Data set differs from the previous one.
    Changed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Rebuilt {
        reason: RebuildReason,
        locations: usize,
        leaves: usize,
    },
    Unchanged,
}

impl UpdateOutcome {
    pub fn is_rebuilt(&self) -> bool {
        matches!(self, UpdateOutcome::Rebuilt { .. })
    }
}

/// Brings `tree` in line with `next`.
///
/// Rebuilds when `force` is set, when there is no `previous` data set or when
/// `previous != next`. A rebuild creates one location node per key in
/// ascending key order, sorts leaves with `order` and resets every flag.
pub fn update(
    tree: &mut Tree,
    previous: Option<&DataSet>,
    next: &DataSet,
    order: SortOrder,
    force: bool,
) -> UpdateOutcome {
    let reason = match previous {
        _ if force => RebuildReason::Forced,
        None => RebuildReason::Initial,
        Some(previous) if previous != next => RebuildReason::Changed,
        Some(_) => return UpdateOutcome::Unchanged,
    };

    rebuild(tree, next, order);

    UpdateOutcome::Rebuilt {
        reason,
        locations: tree.locations.len(),
        leaves: tree.leaves().count(),
    }
}

fn rebuild(tree: &mut Tree, data: &DataSet, order: SortOrder) {
    tree.locations = data
        .groups()
        .map(|(key, group)| {
            let mut entries = group.iter().collect::<Vec<_>>();
            order.sort(&mut entries);

            let mut node = LocationNode::new(key.to_owned());
            node.leaves = entries.into_iter().map(LeafNode::from_entry).collect();
            node
        })
        .collect();

    tree.revision += 1;
}

/// Owns the tree and the data set it was last built from.
#[derive(Debug, Default)]
pub struct Synchronizer {
    tree: Tree,
    previous: Option<DataSet>,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access for user interaction (checks, selection, expansion).
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Data set the tree currently reflects.
    pub fn data_set(&self) -> Option<&DataSet> {
        self.previous.as_ref()
    }

    pub fn update(&mut self, next: DataSet, order: SortOrder, force: bool) -> UpdateOutcome {
        let outcome = update(&mut self.tree, self.previous.as_ref(), &next, order, force);

        if outcome.is_rebuilt() {
            self.previous = Some(next);
        }

        outcome
    }

    /// Records an execution failure reported for a migration.
    ///
    /// The leaf is relabelled in place and keeps its flags. The next
    /// reconciliation resets the status unless history says otherwise.
    pub fn mark_failed(&mut self, location: &str, name: &str) -> bool {
        let Some(entry) = self
            .previous
            .as_mut()
            .and_then(|data| data.get_mut(location, name))
        else {
            return false;
        };

        if entry.status == Status::Failed {
            return true;
        }

        entry.mark_failed();

        if let Some(leaf) = self.tree.leaf_mut(location, name) {
            leaf.refresh(entry);
        }

        true
    }
}
