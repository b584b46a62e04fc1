use super::*;
use pretty_assertions::assert_eq;

#[test]
fn confirm_start_then_cancel_changes_nothing_else() {
    let mut state = loaded_state();
    let items_before = state.items.clone();
    let busy_before = state.busy;

    run(&mut state, PanelAction::ConfirmStart("b".to_string()));
    assert_eq!(state.confirming.as_deref(), Some("b"));

    run(&mut state, PanelAction::ConfirmCancel);

    assert_eq!(state.confirming, None);
    assert_eq!(state.items, items_before);
    assert_eq!(state.busy, busy_before);
}

#[test]
fn confirm_start_replaces_a_pending_confirmation() {
    let mut state = loaded_state();
    run(&mut state, PanelAction::ConfirmStart("a".to_string()));
    run(&mut state, PanelAction::ConfirmStart("b".to_string()));

    assert_eq!(state.confirming.as_deref(), Some("b"));
}

#[test]
fn confirm_start_refused_while_busy() {
    let mut state = loaded_state();
    run(&mut state, PanelAction::ActionStart);

    run_noop(&mut state, PanelAction::ConfirmStart("a".to_string()));

    assert_eq!(state.confirming, None);
}

#[test]
fn confirm_start_refused_for_unknown_id() {
    let mut state = loaded_state();
    run_noop(&mut state, PanelAction::ConfirmStart("ghost".to_string()));
    assert_eq!(state.confirming, None);
}

#[test]
fn confirming_id_dropped_when_record_disappears() {
    let mut state = loaded_state();
    run(&mut state, PanelAction::ConfirmStart("b".to_string()));

    // The daemon deleted "b" under us; the same transition that replaces
    // the list must drop the stale confirmation.
    run(
        &mut state,
        PanelAction::FetchSuccess(vec![record("a"), record("c")]),
    );

    assert_eq!(state.confirming, None);
}

#[test]
fn confirming_id_survives_when_record_still_present() {
    let mut state = loaded_state();
    run(&mut state, PanelAction::ConfirmStart("b".to_string()));

    run(
        &mut state,
        PanelAction::FetchSuccess(vec![record("b"), record("c")]),
    );

    assert_eq!(state.confirming.as_deref(), Some("b"));
}

#[test]
fn cancel_without_pending_confirmation_is_a_noop() {
    let mut state = loaded_state();
    run_noop(&mut state, PanelAction::ConfirmCancel);
}
