use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use tether_core::PanelAction;

use crate::contracts::PanelBackend;
use crate::contracts::UNREACHABLE_MESSAGE;

/// A result crossing back from an engine task, tagged with the generation
/// it was produced under. Results from a stopped generation are discarded
/// at drain time instead of mutating a panel that no longer wants them.
pub(crate) struct Envelope<R> {
    pub generation: u64,
    pub action: PanelAction<R>,
}

/// Owns the poll loop for one visible panel. Started when the panel opens,
/// stopped (task aborted, generation bumped) when it closes; the fetch task
/// never outlives the panel's interest in its results.
pub struct FetchController<R> {
    generation: u64,
    rx: UnboundedReceiver<Envelope<R>>,
    refresh: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl<R: Send + 'static> FetchController<R> {
    /// Start polling. The first cycle runs immediately; afterwards the
    /// loop fires on the fixed interval forever, retrying through failures
    /// without backoff.
    pub fn start(backend: Arc<dyn PanelBackend<R>>, interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let refresh = Arc::new(Notify::new());
        let generation = 1;
        let task = tokio::spawn(poll_loop(
            backend,
            interval,
            tx,
            generation,
            Arc::clone(&refresh),
        ));
        Self {
            generation,
            rx,
            refresh,
            task: Some(task),
        }
    }

    /// Force one out-of-band fetch now. The interval cadence is not reset;
    /// the next scheduled tick still happens on time.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Actions produced by the poll task since the last drain, in order.
    /// Anything produced under a stopped generation is silently dropped.
    pub fn drain(&mut self) -> Vec<PanelAction<R>> {
        let mut actions = Vec::new();
        while let Ok(envelope) = self.rx.try_recv() {
            if envelope.generation == self.generation {
                actions.push(envelope.action);
            }
        }
        actions
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<R> Drop for FetchController<R> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll_loop<R: Send + 'static>(
    backend: Arc<dyn PanelBackend<R>>,
    interval: Duration,
    tx: UnboundedSender<Envelope<R>>,
    generation: u64,
    refresh: Arc<Notify>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = refresh.notified() => {}
        }

        if tx
            .send(Envelope {
                generation,
                action: PanelAction::FetchStart,
            })
            .is_err()
        {
            break;
        }

        let action = match backend.fetch().await {
            Ok(items) => PanelAction::FetchSuccess(items),
            Err(err) => {
                log::warn!("panel fetch failed: {err}");
                PanelAction::FetchError(UNREACHABLE_MESSAGE.to_string())
            }
        };

        if tx.send(Envelope { generation, action }).is_err() {
            break;
        }
    }
}
