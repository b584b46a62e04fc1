#![allow(dead_code)]

use crate::config::PanelConfig;

/// A record mirrored from the daemon. The panel machinery treats records as
/// opaque beyond a stable id, a section assignment, and named text fields
/// for the search filter.
pub trait PanelRecord {
    fn id(&self) -> &str;

    /// Which declared section this record belongs to. Single-section panels
    /// keep the default.
    fn section(&self) -> usize {
        0
    }

    /// Named text field lookup for search. Unknown names are `None`, which
    /// never matches and never errors.
    fn field(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl FetchState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: FeedbackKind::Error,
        }
    }
}

/// Per-section cursor. `selected` is held at 0 for an empty section and is
/// never dereferenced without going through `navigator::clamped_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionState {
    pub name: &'static str,
    pub selected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Section(usize),
    Detail,
}

/// The value held per open panel instance. Created from its `PanelConfig`
/// when the panel becomes visible and dropped whole when it closes; nothing
/// in here survives a close/reopen cycle.
#[derive(Debug, Clone)]
pub struct PanelState<R> {
    pub config: PanelConfig,
    pub fetch: FetchState,
    pub items: Vec<R>,
    pub sections: Vec<SectionState>,
    pub focus: FocusTarget,
    /// Last focused section index, used to restore focus when the detail
    /// view closes.
    pub last_section: usize,
    pub search_query: String,
    pub search_active: bool,
    /// Id of the record pending destructive-action confirmation.
    pub confirming: Option<String>,
    pub busy: bool,
    pub feedback: Option<Feedback>,
    /// Monotonic guard so a stale expiry timer cannot clear a newer message.
    pub feedback_seq: u64,
    pub error_message: Option<String>,
    /// Id of the record opened in the detail pseudo-section.
    pub detail: Option<String>,
}

impl<R> PanelState<R> {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            fetch: FetchState::Idle,
            items: Vec::new(),
            sections: config
                .sections
                .iter()
                .map(|name| SectionState { name, selected: 0 })
                .collect(),
            focus: FocusTarget::Section(0),
            last_section: 0,
            search_query: String::new(),
            search_active: false,
            confirming: None,
            busy: false,
            feedback: None,
            feedback_seq: 0,
            error_message: None,
            detail: None,
        }
    }

    pub fn focused_section(&self) -> Option<usize> {
        match self.focus {
            FocusTarget::Section(idx) => Some(idx),
            FocusTarget::Detail => None,
        }
    }

    pub fn set_feedback(&mut self, feedback: Feedback) {
        self.feedback = Some(feedback);
        self.feedback_seq = self.feedback_seq.wrapping_add(1);
    }
}

impl<R: PanelRecord> PanelState<R> {
    pub fn record_by_id(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|record| record.id() == id)
    }

    pub fn detail_record(&self) -> Option<&R> {
        self.detail.as_deref().and_then(|id| self.record_by_id(id))
    }
}
