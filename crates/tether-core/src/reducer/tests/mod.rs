pub(super) use super::reduce;
pub(super) use crate::actions::PanelAction;
pub(super) use crate::actions::PanelEffect;
pub(super) use crate::config::ActionBinding;
pub(super) use crate::config::PanelConfig;
pub(super) use crate::state::FeedbackKind;
pub(super) use crate::state::FetchState;
pub(super) use crate::state::FocusTarget;
pub(super) use crate::state::PanelRecord;
pub(super) use crate::state::PanelState;

mod confirmation;
mod fetch_lifecycle;
mod search;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct TestRecord {
    pub id: String,
    pub name: String,
    pub section: usize,
}

impl PanelRecord for TestRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn section(&self) -> usize {
        self.section
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

pub(super) fn record(id: &str) -> TestRecord {
    TestRecord {
        id: id.to_string(),
        name: id.to_string(),
        section: 0,
    }
}

pub(super) fn record_in(id: &str, section: usize) -> TestRecord {
    TestRecord {
        id: id.to_string(),
        name: id.to_string(),
        section,
    }
}

pub(super) const TEST_CONFIG: PanelConfig = PanelConfig {
    name: "test",
    title: "Test",
    sections: &["primary", "secondary"],
    search_fields: &["id", "name"],
    poll_interval_ms: 1_000,
    has_detail: true,
    refresh_after_action: false,
    actions: &[ActionBinding {
        key: 'x',
        action: "remove",
        destructive: true,
    }],
};

pub(super) fn state() -> PanelState<TestRecord> {
    PanelState::new(TEST_CONFIG)
}

/// Seed a state with three section-0 records via a normal fetch cycle.
pub(super) fn loaded_state() -> PanelState<TestRecord> {
    let mut state = state();
    reduce(&mut state, PanelAction::FetchStart);
    reduce(
        &mut state,
        PanelAction::FetchSuccess(vec![record("a"), record("b"), record("c")]),
    );
    state
}

pub(super) fn run(state: &mut PanelState<TestRecord>, action: PanelAction<TestRecord>) {
    let effects = reduce(state, action);
    assert!(matches!(effects.as_slice(), [PanelEffect::RequestFrame]));
}

pub(super) fn run_noop(state: &mut PanelState<TestRecord>, action: PanelAction<TestRecord>) {
    let effects = reduce(state, action);
    assert!(effects.is_empty());
}
