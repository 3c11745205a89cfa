//! Keeps a migration panel in sync with a project.
//!
//! A [`Panel`] scans migration files with a [`Catalog`], reads applied
//! migrations from a [`History`], reconciles both and maintains a [`Tree`]
//! that only gets rebuilt when something visible changed.
//!
//! # Example
//!
//! ```rust,ignore
//! let catalog = FsCatalog::new()
//!     .location("app", "./migrations")
//!     .extension("php");
//! let history = SqliteHistory::from(pool);
//!
//! let (panel, task) = Panel::new(catalog, history)
//!     .config(ConfigBuilder::new().newest_first(true).build())
//!     .renderer(|tree: &Tree| println!("{tree}"))
//!     .start();
//!
//! panel.activate().await?;
//! ```
//!
//! # Features
//!
//! - **`sqlite`** (default) - [`SqliteHistory`]
//! - **`postgres`** - [`PgHistory`]

#![forbid(unsafe_code)]

mod config;
mod error;
mod handle;
mod panel;

pub use config::*;
pub use error::*;
pub use handle::PanelHandle;
pub use panel::{Panel, Renderer, Trigger};

pub use migrato_core::*;
pub use migrato_store::{
    Catalog, FsCatalog, History, MemoryCatalog, MemoryHistory, StoreError,
};

#[cfg(feature = "postgres")]
pub use migrato_store::PgHistory;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub use migrato_store::{SqlHistory, DEFAULT_TABLE};
#[cfg(feature = "sqlite")]
pub use migrato_store::SqliteHistory;
