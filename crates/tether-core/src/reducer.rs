use crate::actions::PanelAction;
use crate::actions::PanelEffect;
use crate::filter::section_indices;
use crate::navigator::SectionNavigator;
use crate::navigator::wrap_down;
use crate::navigator::wrap_up;
use crate::state::Feedback;
use crate::state::FeedbackKind;
use crate::state::FetchState;
use crate::state::FocusTarget;
use crate::state::PanelRecord;
use crate::state::PanelState;

/// Applies one action to one panel's state. Total: every action either
/// transitions the state and returns render effects, or is an explicit
/// no-op returning none. Never performs I/O and never panics; filtering is
/// a presentation-time concern, so navigation actions carry the visible
/// length computed by the caller.
pub fn reduce<R: PanelRecord>(
    state: &mut PanelState<R>,
    action: PanelAction<R>,
) -> Vec<PanelEffect> {
    match action {
        PanelAction::FetchStart => {
            state.fetch = FetchState::Loading;
            state.error_message = None;
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::FetchSuccess(items) => {
            state.fetch = FetchState::Success;
            state.error_message = None;
            state.items = items;
            clamp_sections(state);
            reconcile_ids(state);
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::FetchError(message) => {
            // Stale but shown: the last good list stays on screen next to
            // the error banner.
            state.fetch = FetchState::Error;
            state.error_message = Some(message);
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::SelectUp { visible_len } => {
            move_selection(state, visible_len, wrap_up)
        }
        PanelAction::SelectDown { visible_len } => {
            move_selection(state, visible_len, wrap_down)
        }
        PanelAction::SetSearch(query) => {
            state.search_query = query;
            reset_selection(state);
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::EnterSearch => {
            if state.search_active {
                return Vec::new();
            }
            state.search_active = true;
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::ExitSearch => {
            if !state.search_active && state.search_query.is_empty() {
                return Vec::new();
            }
            state.search_active = false;
            state.search_query.clear();
            reset_selection(state);
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::SwitchSection => {
            let nav = SectionNavigator::for_state(state);
            set_focus(state, nav.next_focus(state.focus))
        }
        PanelAction::SwitchSectionBack => {
            let nav = SectionNavigator::for_state(state);
            set_focus(state, nav.prev_focus(state.focus))
        }
        PanelAction::OpenDetail(id) => {
            if !state.config.has_detail || state.record_by_id(&id).is_none() {
                return Vec::new();
            }
            state.detail = Some(id);
            state.focus = FocusTarget::Detail;
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::CloseDetail => {
            if state.detail.is_none() {
                return Vec::new();
            }
            state.detail = None;
            let section = state
                .last_section
                .min(state.sections.len().saturating_sub(1));
            state.focus = FocusTarget::Section(section);
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::ConfirmStart(id) => {
            // Starting a new confirmation replaces any prior one; it never
            // stacks. Refused while an action is in flight or when the
            // target is no longer present.
            if state.busy || state.record_by_id(&id).is_none() {
                return Vec::new();
            }
            state.confirming = Some(id);
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::ConfirmCancel => {
            if state.confirming.take().is_none() {
                return Vec::new();
            }
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::ActionStart => {
            // Single-flight per panel instance: a second dispatch while
            // busy is dropped, not queued.
            if state.busy {
                return Vec::new();
            }
            state.busy = true;
            state.feedback = None;
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::ActionSuccess(message) => {
            state.busy = false;
            state.set_feedback(Feedback::success(message));
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::ActionError(message) => {
            state.busy = false;
            state.set_feedback(Feedback::error(message));
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::FeedbackExpired { seq } => {
            let expired = seq == state.feedback_seq
                && state
                    .feedback
                    .as_ref()
                    .is_some_and(|f| f.kind == FeedbackKind::Success);
            if !expired {
                return Vec::new();
            }
            state.feedback = None;
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::DismissFeedback => {
            if state.feedback.take().is_none() {
                return Vec::new();
            }
            vec![PanelEffect::RequestFrame]
        }
        PanelAction::Reset => {
            *state = PanelState::new(state.config);
            vec![PanelEffect::RequestFrame]
        }
    }
}

fn move_selection<R: PanelRecord>(
    state: &mut PanelState<R>,
    visible_len: usize,
    step: fn(usize, usize) -> usize,
) -> Vec<PanelEffect> {
    let Some(section) = state.focused_section() else {
        return Vec::new();
    };
    if visible_len == 0 {
        return Vec::new();
    }
    let Some(section_state) = state.sections.get_mut(section) else {
        return Vec::new();
    };
    section_state.selected = step(section_state.selected, visible_len);
    vec![PanelEffect::RequestFrame]
}

fn set_focus<R>(state: &mut PanelState<R>, focus: FocusTarget) -> Vec<PanelEffect> {
    if focus == state.focus {
        return Vec::new();
    }
    state.focus = focus;
    if let FocusTarget::Section(idx) = focus {
        state.last_section = idx;
    }
    vec![PanelEffect::RequestFrame]
}

fn reset_selection<R>(state: &mut PanelState<R>) {
    for section in &mut state.sections {
        section.selected = 0;
    }
}

/// Clamp every section's cursor into its (unfiltered) list after a
/// replacement. Empty sections hold 0.
fn clamp_sections<R: PanelRecord>(state: &mut PanelState<R>) {
    for (idx, section) in state.sections.iter_mut().enumerate() {
        let len = section_indices(&state.items, idx).len();
        section.selected = match len {
            0 => 0,
            len => section.selected.min(len - 1),
        };
    }
}

/// Drop `confirming` and `detail` ids that no longer resolve to a record,
/// in the same transition that replaced the list.
fn reconcile_ids<R: PanelRecord>(state: &mut PanelState<R>) {
    let confirming_stale = state
        .confirming
        .as_deref()
        .is_some_and(|id| state.items.iter().all(|record| record.id() != id));
    if confirming_stale {
        state.confirming = None;
    }

    let detail_stale = state
        .detail
        .as_deref()
        .is_some_and(|id| state.items.iter().all(|record| record.id() != id));
    if detail_stale {
        state.detail = None;
        if state.focus == FocusTarget::Detail {
            let section = state
                .last_section
                .min(state.sections.len().saturating_sub(1));
            state.focus = FocusTarget::Section(section);
        }
    }
}

#[cfg(test)]
mod tests;
