use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use tether_core::reduce;
use tether_core::PanelAction;
use tether_core::PanelEffect;
use tether_core::PanelRecord;
use tether_core::PanelState;

use crate::contracts::ActionRequest;
use crate::contracts::PanelBackend;
use crate::fetch::Envelope;
use crate::fetch::FetchController;

/// How long a success banner stays up before the expiry timer clears it.
/// Error feedback persists until dismissed or superseded.
pub const FEEDBACK_TTL: Duration = Duration::from_millis(2_500);

/// Performs at most one mutating daemon call at a time for one panel.
/// Dispatch while an action is in flight is dropped, never queued; results
/// come back through a generation-guarded channel and are applied to the
/// state exclusively via the reducer.
pub struct ActionExecutor<R> {
    generation: u64,
    tx: UnboundedSender<Envelope<R>>,
    rx: UnboundedReceiver<Envelope<R>>,
    action_task: Option<JoinHandle<()>>,
    expiry_task: Option<JoinHandle<()>>,
}

impl<R: PanelRecord + Send + 'static> ActionExecutor<R> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            generation: 1,
            tx,
            rx,
            action_task: None,
            expiry_task: None,
        }
    }

    /// Start one mutating call. Returns `false` (no state change, no
    /// network call) when the panel is busy.
    pub fn dispatch(
        &mut self,
        state: &mut PanelState<R>,
        backend: &Arc<dyn PanelBackend<R>>,
        request: ActionRequest,
    ) -> bool {
        if state.busy {
            log::debug!("action {} dropped: panel busy", request.action);
            return false;
        }

        reduce(state, PanelAction::ActionStart);

        let tx = self.tx.clone();
        let generation = self.generation;
        let backend = Arc::clone(backend);
        log::debug!("dispatching {} for {}", request.action, request.id);
        self.action_task = Some(tokio::spawn(async move {
            let action = match backend.execute(&request).await {
                Ok(message) => PanelAction::ActionSuccess(message),
                Err(err) => PanelAction::ActionError(err.to_string()),
            };
            let _ = tx.send(Envelope { generation, action });
        }));
        true
    }

    /// Apply any completed results to the state. On success this arms the
    /// feedback expiry timer and, when the panel opted in, nudges the
    /// fetch controller so the mutation shows up before the next tick.
    pub fn drain(
        &mut self,
        state: &mut PanelState<R>,
        fetch: Option<&FetchController<R>>,
    ) -> Vec<PanelEffect> {
        let mut effects = Vec::new();
        loop {
            let Ok(envelope) = self.rx.try_recv() else {
                break;
            };
            if envelope.generation != self.generation {
                continue;
            }
            let succeeded = matches!(envelope.action, PanelAction::ActionSuccess(_));
            effects.extend(reduce(state, envelope.action));
            if succeeded {
                self.arm_feedback_expiry(state.feedback_seq);
                if state.config.refresh_after_action {
                    if let Some(fetch) = fetch {
                        fetch.refresh();
                    }
                }
            }
        }
        effects
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.action_task.take() {
            task.abort();
        }
        if let Some(task) = self.expiry_task.take() {
            task.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    fn arm_feedback_expiry(&mut self, seq: u64) {
        if let Some(task) = self.expiry_task.take() {
            task.abort();
        }
        let tx = self.tx.clone();
        let generation = self.generation;
        self.expiry_task = Some(tokio::spawn(async move {
            tokio::time::sleep(FEEDBACK_TTL).await;
            let _ = tx.send(Envelope {
                generation,
                action: PanelAction::FeedbackExpired { seq },
            });
        }));
    }
}

impl<R: PanelRecord + Send + 'static> Default for ActionExecutor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Drop for ActionExecutor<R> {
    fn drop(&mut self) {
        if let Some(task) = self.action_task.take() {
            task.abort();
        }
        if let Some(task) = self.expiry_task.take() {
            task.abort();
        }
    }
}
