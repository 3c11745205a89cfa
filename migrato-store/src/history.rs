use async_trait::async_trait;
use dyn_clone::DynClone;
use migrato_core::HistorySnapshot;

use crate::error::Result;

mod memory;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
mod sql;

pub use memory::*;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub use sql::*;

/// Read-only view of the applied migrations.
///
/// `Ok(None)` means the history cannot be consulted right now (database not
/// ready, table missing). It is not the same as "nothing applied": callers
/// keep the statuses they already have.
#[async_trait]
pub trait History: DynClone + Send + Sync {
    async fn snapshot(&self) -> Result<Option<HistorySnapshot>>;
}

dyn_clone::clone_trait_object!(History);
