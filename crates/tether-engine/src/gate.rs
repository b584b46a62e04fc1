use std::sync::Arc;

use tether_core::reduce;
use tether_core::PanelAction;
use tether_core::PanelRecord;
use tether_core::PanelState;

use crate::contracts::ActionRequest;
use crate::contracts::PanelBackend;
use crate::executor::ActionExecutor;

/// Keys as the gate sees them: the designated accept key (`Enter`/`y`),
/// the designated cancel key (`Esc`/`n`), and everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKey {
    Accept,
    Cancel,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// No confirmation was pending; the key belongs to normal handling.
    Idle,
    /// The destructive action was handed to the executor.
    Executed,
    Cancelled,
    /// A stray key while confirming: consumed, never forwarded.
    Ignored,
}

/// Two-phase protocol in front of destructive actions. The pending id
/// lives in `PanelState::confirming`; the gate itself holds nothing, so a
/// panel can never have more than one confirmation in flight.
pub struct ConfirmationGate;

impl ConfirmationGate {
    /// Enter `confirming(id)`. Replaces any prior pending confirmation;
    /// refused while busy or when the record is gone.
    pub fn begin<R: PanelRecord>(state: &mut PanelState<R>, id: &str) -> bool {
        reduce(state, PanelAction::ConfirmStart(id.to_string()));
        state.confirming.as_deref() == Some(id)
    }

    /// Route one key while a confirmation may be pending. Accept delegates
    /// the panel's destructive action to the executor and returns to idle
    /// regardless of how that action later resolves; the executor's own
    /// feedback reports the outcome.
    pub fn handle_key<R: PanelRecord + Send + 'static>(
        state: &mut PanelState<R>,
        key: GateKey,
        executor: &mut ActionExecutor<R>,
        backend: &Arc<dyn PanelBackend<R>>,
    ) -> GateOutcome {
        let Some(id) = state.confirming.clone() else {
            return GateOutcome::Idle;
        };

        match key {
            GateKey::Accept => {
                reduce(state, PanelAction::ConfirmCancel);
                match state.config.destructive_action() {
                    Some(action) => {
                        executor.dispatch(state, backend, ActionRequest::new(action, id));
                        GateOutcome::Executed
                    }
                    // A confirmation without a destructive binding cannot
                    // execute anything; treat accept as cancel.
                    None => GateOutcome::Cancelled,
                }
            }
            GateKey::Cancel => {
                reduce(state, PanelAction::ConfirmCancel);
                GateOutcome::Cancelled
            }
            GateKey::Other => GateOutcome::Ignored,
        }
    }
}
