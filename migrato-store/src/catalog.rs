use async_trait::async_trait;
use dyn_clone::DynClone;
use migrato_core::DataSet;

mod fs;
mod memory;

pub use fs::*;
pub use memory::*;

/// Source of migration files, grouped by location.
///
/// `scan` never fails as a whole. A location that cannot be read is logged
/// and left out of the result. Nothing is cached between calls.
#[async_trait]
pub trait Catalog: DynClone + Send + Sync {
    async fn scan(&self) -> DataSet;
}

dyn_clone::clone_trait_object!(Catalog);
