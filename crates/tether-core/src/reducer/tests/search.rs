use super::*;
use pretty_assertions::assert_eq;

#[test]
fn set_search_resets_every_section_cursor() {
    let mut state = state();
    run(
        &mut state,
        PanelAction::FetchSuccess(vec![
            record_in("a", 0),
            record_in("b", 0),
            record_in("c", 0),
            record_in("d", 1),
            record_in("e", 1),
        ]),
    );
    state.sections[0].selected = 2;
    state.sections[1].selected = 1;

    run(&mut state, PanelAction::SetSearch("zzz".to_string()));

    assert_eq!(state.sections[0].selected, 0);
    assert_eq!(state.sections[1].selected, 0);
    assert_eq!(state.search_query, "zzz");
}

#[test]
fn set_search_never_filters_items_itself() {
    let mut state = loaded_state();

    run(&mut state, PanelAction::SetSearch("zzz".to_string()));

    // Filtering is derived at presentation time; the stored list is intact.
    assert_eq!(state.items.len(), 3);
}

#[test]
fn enter_search_routes_input_without_touching_the_query() {
    let mut state = loaded_state();
    run(&mut state, PanelAction::EnterSearch);

    assert!(state.search_active);
    assert!(state.search_query.is_empty());

    run_noop(&mut state, PanelAction::EnterSearch);
}

#[test]
fn exit_search_clears_query_and_resets_cursors() {
    let mut state = loaded_state();
    run(&mut state, PanelAction::EnterSearch);
    run(&mut state, PanelAction::SetSearch("b".to_string()));
    state.sections[0].selected = 1;

    run(&mut state, PanelAction::ExitSearch);

    assert!(!state.search_active);
    assert!(state.search_query.is_empty());
    assert_eq!(state.sections[0].selected, 0);
}

#[test]
fn exit_search_when_inactive_and_blank_is_a_noop() {
    let mut state = loaded_state();
    run_noop(&mut state, PanelAction::ExitSearch);
}
