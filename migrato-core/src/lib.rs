//! Core types for tracking migration status.
//!
//! This crate is runtime free. It takes the migrations found in a project and
//! the applied history, works out the status of each migration and keeps a
//! view model in sync with the result.
//!
//! # Flow
//!
//! ```rust,ignore
//! let data = reconcile::merge(scanned, &history);
//! let outcome = synchronizer.update(data, SortOrder::NewestFirst, false);
//! ```
//!
//! # Modules
//!
//! - [`reconcile`] - Status assignment from history
//! - [`sync`] - Rebuild-or-keep decision for the tree
//! - [`tree`] - The view model itself

#![forbid(unsafe_code)]

mod dataset;
mod entry;
mod order;
pub mod reconcile;
pub mod sync;
pub mod tree;

pub use dataset::*;
pub use entry::*;
pub use order::*;
pub use sync::{RebuildReason, Synchronizer, UpdateOutcome};
pub use tree::{LeafNode, LocationNode, Node, Tree};
