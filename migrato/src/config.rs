//! Panel configuration.
//!
//! The orchestrator only reads these values. Persisting them (the "newest
//! first" toggle in particular) is the host's business.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use migrato_core::SortOrder;

/// Default capacity of the command channel feeding the panel task.
///
/// Refresh requests beyond this are dropped by
/// [`crate::PanelHandle::request_refresh`] since one is already queued.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Show the most recent migration at the top of each location.
    pub newest_first: bool,

    /// Refresh periodically when set.
    pub poll_interval: Option<Duration>,

    pub channel_capacity: usize,
}

impl Config {
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_newest_first(self.newest_first)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            newest_first: false,
            poll_interval: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn newest_first(mut self, newest_first: bool) -> Self {
        self.config.newest_first = newest_first;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = Some(interval);
        self
    }

    /// Capacity of the command channel, at least 1.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity.max(1);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
