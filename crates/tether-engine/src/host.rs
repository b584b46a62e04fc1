use std::sync::Arc;
use std::time::Duration;

use tether_core::reduce;
use tether_core::PanelAction;
use tether_core::PanelConfig;
use tether_core::PanelEffect;
use tether_core::PanelRecord;
use tether_core::PanelState;

use crate::contracts::ActionRequest;
use crate::contracts::PanelBackend;
use crate::executor::ActionExecutor;
use crate::fetch::FetchController;
use crate::gate::ConfirmationGate;
use crate::gate::GateKey;
use crate::gate::GateOutcome;

/// One open panel: its state value plus the collaborators scoped to its
/// visible lifetime. Opening starts the poll loop; closing aborts every
/// timer and discards the state, so nothing survives a close/reopen cycle.
pub struct PanelHost<R: PanelRecord> {
    pub state: PanelState<R>,
    backend: Arc<dyn PanelBackend<R>>,
    fetch: FetchController<R>,
    executor: ActionExecutor<R>,
}

impl<R: PanelRecord + Send + 'static> PanelHost<R> {
    pub fn open(config: PanelConfig, backend: Arc<dyn PanelBackend<R>>) -> Self {
        let fetch = FetchController::start(
            Arc::clone(&backend),
            Duration::from_millis(config.poll_interval_ms),
        );
        Self {
            state: PanelState::new(config),
            backend,
            fetch,
            executor: ActionExecutor::new(),
        }
    }

    /// Serialize every completed fetch/action result through the reducer.
    /// Called from the event loop on each tick.
    pub fn drain(&mut self) -> Vec<PanelEffect> {
        let mut effects = Vec::new();
        for action in self.fetch.drain() {
            effects.extend(reduce(&mut self.state, action));
        }
        effects.extend(self.executor.drain(&mut self.state, Some(&self.fetch)));
        effects
    }

    /// Apply a user-originated action directly.
    pub fn apply(&mut self, action: PanelAction<R>) -> Vec<PanelEffect> {
        reduce(&mut self.state, action)
    }

    /// Single-flight mutating dispatch; `false` when dropped because the
    /// panel is busy.
    pub fn dispatch(&mut self, request: ActionRequest) -> bool {
        self.executor.dispatch(&mut self.state, &self.backend, request)
    }

    pub fn begin_confirm(&mut self, id: &str) -> bool {
        ConfirmationGate::begin(&mut self.state, id)
    }

    pub fn confirm_key(&mut self, key: GateKey) -> GateOutcome {
        ConfirmationGate::handle_key(&mut self.state, key, &mut self.executor, &self.backend)
    }

    pub fn refresh(&self) {
        self.fetch.refresh();
    }

    /// The panel became invisible: stop the collaborators so no late
    /// result can touch a discarded state, reset, and drop.
    pub fn close(mut self) {
        self.fetch.stop();
        self.executor.stop();
        reduce(&mut self.state, PanelAction::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::DaemonError;
    use crate::test_utils::settle;
    use crate::test_utils::test_config;
    use crate::test_utils::ScriptedBackend;
    use pretty_assertions::assert_eq;
    use tether_core::FetchState;

    #[tokio::test(start_paused = true)]
    async fn open_fetches_and_drain_applies_through_the_reducer() {
        let backend = ScriptedBackend::new().with_fetch(Ok(vec![
            crate::test_utils::TestRecord::new("a"),
            crate::test_utils::TestRecord::new("b"),
        ]));
        let mut host = PanelHost::open(test_config(false), backend.clone_arc());

        settle().await;
        host.drain();

        assert_eq!(host.state.fetch, FetchState::Success);
        assert_eq!(host.state.items.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_error_keeps_stale_items_visible() {
        let backend = ScriptedBackend::new()
            .with_fetch(Ok(vec![crate::test_utils::TestRecord::new("a")]))
            .with_fetch(Err(DaemonError::Unreachable));
        let mut host = PanelHost::open(test_config(false), backend.clone_arc());

        settle().await;
        host.drain();
        assert_eq!(host.state.items.len(), 1);

        tokio::time::sleep(Duration::from_secs(6)).await;
        settle().await;
        host.drain();

        assert_eq!(host.state.fetch, FetchState::Error);
        assert_eq!(host.state.items.len(), 1);
        assert!(host.state.error_message.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn full_confirm_and_execute_flow() {
        let backend = ScriptedBackend::new()
            .with_fetch(Ok(vec![crate::test_utils::TestRecord::new("a")]))
            .with_execute(Ok("Removed a".to_string()));
        let mut host = PanelHost::open(test_config(false), backend.clone_arc());
        settle().await;
        host.drain();

        assert!(host.begin_confirm("a"));
        assert_eq!(host.confirm_key(GateKey::Other), GateOutcome::Ignored);
        assert_eq!(host.confirm_key(GateKey::Accept), GateOutcome::Executed);

        settle().await;
        host.drain();

        assert!(!host.state.busy);
        assert_eq!(
            host.state.feedback.as_ref().map(|f| f.message.as_str()),
            Some("Removed a")
        );
    }
}
