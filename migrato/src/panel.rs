use futures_util::future::join;
use migrato_core::{reconcile, DataSet, SortOrder, Synchronizer, Tree, UpdateOutcome};
use migrato_store::{Catalog, History};
use parse_display::Display;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Receives the tree after every rebuild or in-place change.
pub trait Renderer: Send + 'static {
    fn render(&mut self, tree: &Tree);
}

impl<F: FnMut(&Tree) + Send + 'static> Renderer for F {
    fn render(&mut self, tree: &Tree) {
        self(tree)
    }
}

/// Why a pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "kebab-case")]
pub enum Trigger {
    /// The panel became visible. Only the first one forces a rebuild.
    Activate,
    /// Explicit or periodic refresh.
    Refresh,
    /// A migration run just finished.
    Executed,
}

/// Wires catalog, history and synchronizer together.
///
/// A panel is driven from one place at a time: either directly through
/// `&mut self`, or from its own task after [`Panel::start`].
pub struct Panel {
    catalog: Box<dyn Catalog>,
    history: Box<dyn History>,
    renderer: Box<dyn Renderer>,
    synchronizer: Synchronizer,
    order: SortOrder,
    activated: bool,
    pub(crate) config: Config,
}

impl Panel {
    pub fn new<C: Catalog + 'static, H: History + 'static>(catalog: C, history: H) -> Self {
        let config = Config::default();

        Self {
            catalog: Box::new(catalog),
            history: Box::new(history),
            renderer: Box::new(|_: &Tree| {}),
            synchronizer: Synchronizer::new(),
            order: config.sort_order(),
            activated: false,
            config,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.order = config.sort_order();
        self.config = config;
        self
    }

    pub fn renderer<R: Renderer>(mut self, renderer: R) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn tree(&self) -> &Tree {
        self.synchronizer.tree()
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        self.synchronizer.tree_mut()
    }

    pub fn data_set(&self) -> Option<&DataSet> {
        self.synchronizer.data_set()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub async fn trigger(&mut self, trigger: Trigger) -> UpdateOutcome {
        let force = trigger == Trigger::Activate && !self.activated;
        if trigger == Trigger::Activate {
            self.activated = true;
        }

        debug!("{trigger} pass, force = {force}");

        self.update(force).await
    }

    pub async fn activate(&mut self) -> UpdateOutcome {
        self.trigger(Trigger::Activate).await
    }

    pub async fn refresh(&mut self) -> UpdateOutcome {
        self.trigger(Trigger::Refresh).await
    }

    /// Changes the leaf order. A different order forces a rebuild since the
    /// data itself is unchanged. Besides the first activation, this is the
    /// only pass that runs forced.
    pub async fn set_order(&mut self, order: SortOrder) -> UpdateOutcome {
        if order == self.order {
            return UpdateOutcome::Unchanged;
        }

        info!("sort order changed to {order}");
        self.order = order;

        self.update(true).await
    }

    /// Reports an execution failure for a migration shown in the tree.
    pub fn mark_failed(&mut self, location: &str, name: &str) -> bool {
        if !self.synchronizer.mark_failed(location, name) {
            warn!("cannot mark {location}/{name} as failed, not in the tree");
            return false;
        }

        self.renderer.render(self.synchronizer.tree());

        true
    }

    pub fn set_checked(&mut self, location: &str, name: &str, checked: bool) -> bool {
        if !self
            .synchronizer
            .tree_mut()
            .set_checked(location, name, checked)
        {
            return false;
        }

        self.renderer.render(self.synchronizer.tree());

        true
    }

    /// Scans, reconciles and synchronizes the tree once.
    ///
    /// When history is unavailable the statuses of the current tree are kept.
    pub async fn update(&mut self, force: bool) -> UpdateOutcome {
        let (scanned, history) = join(self.catalog.scan(), self.history.snapshot()).await;

        let data = match history {
            Ok(Some(history)) => reconcile::merge(scanned, &history),
            Ok(None) => {
                debug!("history unavailable, keeping previous statuses");
                reconcile::retain(scanned, self.synchronizer.data_set())
            }
            Err(e) => {
                warn!("history unavailable: {e}");
                reconcile::retain(scanned, self.synchronizer.data_set())
            }
        };

        let outcome = self.synchronizer.update(data, self.order, force);

        match outcome {
            UpdateOutcome::Rebuilt {
                reason,
                locations,
                leaves,
            } => {
                info!("tree rebuilt ({reason}): {locations} locations, {leaves} migrations");
                self.renderer.render(self.synchronizer.tree());
            }
            UpdateOutcome::Unchanged => debug!("tree unchanged"),
        }

        outcome
    }
}
