use chrono::{DateTime, Utc};
use parse_display::{Display, FromStr};
use serde::{Deserialize, Serialize};

/// Applied state of a migration for one reconciliation pass.
///
/// `Failed` is never produced by reconciliation. It is set by whatever runs
/// migrations (see [`crate::Synchronizer::mark_failed`]) and lasts until the
/// next pass.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, FromStr, Serialize, Deserialize,
)]
#[display(style = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    NotApplied,
    Applied,
    Failed,
}

/// A migration file discovered in a location.
///
/// Identity is `(location, name)`. Only the reconciler and the execution
/// callback touch `status` and `applied_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationEntry {
    pub name: String,
    pub location: String,
    pub status: Status,
    pub applied_at: Option<DateTime<Utc>>,
}

impl MigrationEntry {
    pub fn new(location: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            status: Status::NotApplied,
            applied_at: None,
        }
    }

    pub fn applied(mut self, at: DateTime<Utc>) -> Self {
        self.mark_applied(at);
        self
    }

    pub fn failed(mut self) -> Self {
        self.mark_failed();
        self
    }

    pub fn mark_applied(&mut self, at: DateTime<Utc>) {
        self.status = Status::Applied;
        self.applied_at = Some(at);
    }

    pub fn mark_not_applied(&mut self) {
        self.status = Status::NotApplied;
        self.applied_at = None;
    }

    pub fn mark_failed(&mut self) {
        self.status = Status::Failed;
        self.applied_at = None;
    }

    pub fn is_applied(&self) -> bool {
        self.status == Status::Applied
    }

    /// Display label used by the tree leaves.
    pub fn label(&self) -> String {
        match (self.status, self.applied_at) {
            (Status::Applied, Some(at)) => {
                format!("{} ({})", self.name, at.format("%Y-%m-%d %H:%M:%S"))
            }
            (Status::Failed, _) => format!("{} (failed)", self.name),
            _ => self.name.to_owned(),
        }
    }
}
