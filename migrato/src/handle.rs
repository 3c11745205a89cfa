use migrato_core::{SortOrder, UpdateOutcome};
use std::collections::VecDeque;
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        oneshot,
    },
    task::JoinHandle,
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    error::{PanelError, Result},
    panel::{Panel, Trigger},
};

type Ack<T> = Option<oneshot::Sender<T>>;

enum Command {
    Update(Trigger, Ack<UpdateOutcome>),
    SetOrder(SortOrder, Ack<UpdateOutcome>),
    MarkFailed {
        location: String,
        name: String,
        ack: Ack<bool>,
    },
    Check {
        location: String,
        name: String,
        checked: bool,
        ack: Ack<bool>,
    },
    Shutdown,
}

/// Sends commands to a started [`Panel`].
///
/// Every command is handled by the panel task in arrival order. Update
/// requests queued behind a running pass are merged into a single pass.
#[derive(Debug, Clone)]
pub struct PanelHandle {
    tx: mpsc::Sender<Command>,
}

impl PanelHandle {
    pub async fn activate(&self) -> Result<UpdateOutcome> {
        self.update(Trigger::Activate).await
    }

    pub async fn refresh(&self) -> Result<UpdateOutcome> {
        self.update(Trigger::Refresh).await
    }

    /// Post-execution callback.
    pub async fn executed(&self) -> Result<UpdateOutcome> {
        self.update(Trigger::Executed).await
    }

    /// Queues a refresh without waiting for it. A full queue already holds
    /// pending work, so the request is dropped.
    pub fn request_refresh(&self) -> Result<()> {
        match self.tx.try_send(Command::Update(Trigger::Refresh, None)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                debug!("refresh dropped, panel queue is full");
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(PanelError::Closed),
        }
    }

    pub async fn set_order(&self, order: SortOrder) -> Result<UpdateOutcome> {
        let (ack, rx) = oneshot::channel();
        self.tx.send(Command::SetOrder(order, Some(ack))).await?;

        Ok(rx.await?)
    }

    pub async fn mark_failed(
        &self,
        location: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<bool> {
        let (ack, rx) = oneshot::channel();
        self.tx
            .send(Command::MarkFailed {
                location: location.into(),
                name: name.into(),
                ack: Some(ack),
            })
            .await?;

        Ok(rx.await?)
    }

    pub async fn check(
        &self,
        location: impl Into<String>,
        name: impl Into<String>,
        checked: bool,
    ) -> Result<bool> {
        let (ack, rx) = oneshot::channel();
        self.tx
            .send(Command::Check {
                location: location.into(),
                name: name.into(),
                checked,
                ack: Some(ack),
            })
            .await?;

        Ok(rx.await?)
    }

    /// Stops the panel task once the commands queued before this one are done.
    pub async fn shutdown(&self) -> Result<()> {
        self.tx.send(Command::Shutdown).await?;

        Ok(())
    }

    async fn update(&self, trigger: Trigger) -> Result<UpdateOutcome> {
        let (ack, rx) = oneshot::channel();
        self.tx.send(Command::Update(trigger, Some(ack))).await?;

        Ok(rx.await?)
    }
}

impl Panel {
    /// Moves the panel into its own task.
    ///
    /// The task ends on [`PanelHandle::shutdown`] or when every handle is
    /// dropped, and gives the panel back through the join handle.
    pub fn start(self) -> (PanelHandle, JoinHandle<Panel>) {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));

        let interval = self.config.poll_interval.map(|period| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        let task = tokio::spawn(run(self, rx, interval));

        (PanelHandle { tx }, task)
    }
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn run(
    mut panel: Panel,
    mut rx: mpsc::Receiver<Command>,
    mut interval: Option<Interval>,
) -> Panel {
    info!("migration panel started");

    let mut queue = VecDeque::new();

    loop {
        let command = tokio::select! {
            command = rx.recv() => command,
            _ = tick(&mut interval) => Some(Command::Update(Trigger::Refresh, None)),
        };

        let Some(command) = command else {
            break;
        };

        queue.push_back(command);
        while let Ok(command) = rx.try_recv() {
            queue.push_back(command);
        }

        if !drain(&mut panel, &mut queue).await {
            break;
        }
    }

    info!("migration panel stopped");

    panel
}

/// Handles queued commands in order. Returns `false` on shutdown.
async fn drain(panel: &mut Panel, queue: &mut VecDeque<Command>) -> bool {
    while let Some(command) = queue.pop_front() {
        match command {
            Command::Update(trigger, ack) => {
                let mut triggers = vec![trigger];
                let mut acks = vec![ack];

                while let Some(Command::Update(..)) = queue.front() {
                    if let Some(Command::Update(trigger, ack)) = queue.pop_front() {
                        triggers.push(trigger);
                        acks.push(ack);
                    }
                }

                if triggers.len() > 1 {
                    debug!("{} update requests merged", triggers.len());
                }

                let trigger = if triggers.contains(&Trigger::Activate) {
                    Trigger::Activate
                } else {
                    trigger
                };

                let outcome = panel.trigger(trigger).await;

                for ack in acks.into_iter().flatten() {
                    let _ = ack.send(outcome);
                }
            }
            Command::SetOrder(order, ack) => {
                let outcome = panel.set_order(order).await;
                if let Some(ack) = ack {
                    let _ = ack.send(outcome);
                }
            }
            Command::MarkFailed {
                location,
                name,
                ack,
            } => {
                let marked = panel.mark_failed(&location, &name);
                if let Some(ack) = ack {
                    let _ = ack.send(marked);
                }
            }
            Command::Check {
                location,
                name,
                checked,
                ack,
            } => {
                let found = panel.set_checked(&location, &name, checked);
                if let Some(ack) = ack {
                    let _ = ack.send(found);
                }
            }
            Command::Shutdown => return false,
        }
    }

    true
}
