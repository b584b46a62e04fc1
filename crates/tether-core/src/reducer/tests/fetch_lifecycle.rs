use super::*;
use pretty_assertions::assert_eq;

#[test]
fn fetch_start_clears_error_and_marks_loading() {
    let mut state = state();
    state.error_message = Some("old".to_string());

    run(&mut state, PanelAction::FetchStart);

    assert_eq!(state.fetch, FetchState::Loading);
    assert_eq!(state.error_message, None);
}

#[test]
fn fetch_success_replaces_items() {
    let mut state = state();
    run(&mut state, PanelAction::FetchStart);
    run(
        &mut state,
        PanelAction::FetchSuccess(vec![record("a"), record("b")]),
    );

    assert_eq!(state.fetch, FetchState::Success);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.error_message, None);
}

#[test]
fn fetch_error_after_success_keeps_last_good_list() {
    let mut state = state();
    run(&mut state, PanelAction::FetchStart);
    run(
        &mut state,
        PanelAction::FetchSuccess(vec![record("a"), record("b")]),
    );
    let items_before = state.items.clone();

    run(
        &mut state,
        PanelAction::FetchError("Unable to reach daemon".to_string()),
    );

    assert_eq!(state.fetch, FetchState::Error);
    assert_eq!(state.items, items_before);
    assert_eq!(
        state.error_message.as_deref(),
        Some("Unable to reach daemon")
    );
}

#[test]
fn fetch_success_clamps_section_cursors() {
    let mut state = loaded_state();
    state.sections[0].selected = 2;

    run(&mut state, PanelAction::FetchSuccess(vec![record("a")]));
    assert_eq!(state.sections[0].selected, 0);

    run(&mut state, PanelAction::FetchSuccess(Vec::new()));
    assert_eq!(state.sections[0].selected, 0);
}

#[test]
fn fetch_success_clamps_each_section_independently() {
    let mut state = state();
    run(
        &mut state,
        PanelAction::FetchSuccess(vec![
            record_in("a", 0),
            record_in("b", 1),
            record_in("c", 1),
        ]),
    );
    state.sections[0].selected = 0;
    state.sections[1].selected = 1;

    run(
        &mut state,
        PanelAction::FetchSuccess(vec![record_in("a", 0), record_in("b", 1)]),
    );

    assert_eq!(state.sections[0].selected, 0);
    assert_eq!(state.sections[1].selected, 0);
}

#[test]
fn reset_returns_the_zero_value() {
    let mut state = loaded_state();
    state.search_query = "abc".to_string();
    state.busy = true;
    state.confirming = Some("a".to_string());

    run(&mut state, PanelAction::Reset);

    assert_eq!(state.fetch, FetchState::Idle);
    assert!(state.items.is_empty());
    assert!(state.search_query.is_empty());
    assert!(!state.busy);
    assert_eq!(state.confirming, None);
    assert_eq!(state.focus, FocusTarget::Section(0));
}
