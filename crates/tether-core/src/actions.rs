#![allow(dead_code)]

/// Everything that can happen to a `PanelState`. User input, fetch results
/// and action results all go through this one catalogue so their
/// consumption is serialized by the reducer.
#[derive(Debug, Clone)]
pub enum PanelAction<R> {
    FetchStart,
    FetchSuccess(Vec<R>),
    FetchError(String),

    /// Movement within the focused section. The visible (post-filter)
    /// length is supplied by the caller; the reducer never filters.
    SelectUp { visible_len: usize },
    SelectDown { visible_len: usize },

    SetSearch(String),
    EnterSearch,
    ExitSearch,

    SwitchSection,
    SwitchSectionBack,

    OpenDetail(String),
    CloseDetail,

    ConfirmStart(String),
    ConfirmCancel,

    ActionStart,
    ActionSuccess(String),
    ActionError(String),

    /// Fired by the success-feedback expiry timer. Ignored unless `seq`
    /// still matches the state's feedback sequence.
    FeedbackExpired { seq: u64 },
    DismissFeedback,

    Reset,
}

/// Render hints returned by the reducer. The reducer itself performs no
/// I/O; an empty effect list marks an explicit no-op transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEffect {
    RequestFrame,
}
