//! The five concrete panels: static configuration plus a thin typed
//! wrapper over the generic engine. Everything behavioral lives in
//! tether-core/tether-engine; this module only declares data and routes
//! keys mode by mode.

use std::sync::Arc;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::layout::Rect;
use ratatui::Frame;
use serde::de::DeserializeOwned;
use serde_json::json;

use tether_core::clamped_index;
use tether_core::visible_indices;
use tether_core::ActionBinding;
use tether_core::FocusTarget;
use tether_core::PanelAction;
use tether_core::PanelConfig;
use tether_core::PanelEffect;
use tether_engine::ActionRequest;
use tether_engine::GateKey;
use tether_engine::HttpPanelClient;
use tether_engine::PanelHost;

use crate::prefs;
use crate::prefs::Preferences;
use crate::records::BrowserTabRecord;
use crate::records::DocumentRecord;
use crate::records::IntegrationRecord;
use crate::records::MemoryRecord;
use crate::records::PersonaRecord;
use crate::records::RecordRow;
use crate::ui;

pub const INTEGRATIONS_CONFIG: PanelConfig = PanelConfig {
    name: "integrations",
    title: "Integrations",
    sections: &["connected", "available"],
    search_fields: &["id", "name", "description"],
    poll_interval_ms: 5_000,
    has_detail: true,
    refresh_after_action: true,
    actions: &[
        ActionBinding {
            key: 'c',
            action: "connect",
            destructive: false,
        },
        ActionBinding {
            key: 'd',
            action: "disconnect",
            destructive: false,
        },
        ActionBinding {
            key: 'x',
            action: "remove",
            destructive: true,
        },
    ],
};

pub const MEMORY_CONFIG: PanelConfig = PanelConfig {
    name: "memory",
    title: "Memory",
    sections: &["atoms"],
    search_fields: &["id", "text", "tags"],
    poll_interval_ms: 2_000,
    has_detail: true,
    refresh_after_action: false,
    actions: &[
        ActionBinding {
            key: 'r',
            action: "reindex",
            destructive: false,
        },
        ActionBinding {
            key: 's',
            action: "save",
            destructive: false,
        },
        ActionBinding {
            key: 'x',
            action: "delete",
            destructive: true,
        },
    ],
};

pub const DOCUMENTS_CONFIG: PanelConfig = PanelConfig {
    name: "documents",
    title: "Documents",
    sections: &["indexed"],
    search_fields: &["id", "title", "path"],
    poll_interval_ms: 5_000,
    has_detail: true,
    refresh_after_action: true,
    actions: &[
        ActionBinding {
            key: 'r',
            action: "reindex",
            destructive: false,
        },
        ActionBinding {
            key: 'x',
            action: "remove",
            destructive: true,
        },
    ],
};

pub const BROWSER_CONFIG: PanelConfig = PanelConfig {
    name: "browser",
    title: "Browser",
    sections: &["tabs"],
    search_fields: &["id", "title", "url"],
    poll_interval_ms: 1_000,
    has_detail: true,
    refresh_after_action: true,
    actions: &[
        ActionBinding {
            key: 'u',
            action: "resume",
            destructive: false,
        },
        ActionBinding {
            key: 't',
            action: "retry",
            destructive: false,
        },
        ActionBinding {
            key: 'x',
            action: "close",
            destructive: true,
        },
    ],
};

pub const PERSONA_CONFIG: PanelConfig = PanelConfig {
    name: "persona",
    title: "Persona",
    sections: &["personas"],
    search_fields: &["id", "name", "description"],
    poll_interval_ms: 5_000,
    has_detail: true,
    refresh_after_action: true,
    actions: &[
        ActionBinding {
            key: 'e',
            action: "enable",
            destructive: false,
        },
        ActionBinding {
            key: 'd',
            action: "disable",
            destructive: false,
        },
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Integrations,
    Memory,
    Documents,
    Browser,
    Persona,
}

impl PanelKind {
    pub const ALL: [PanelKind; 5] = [
        Self::Integrations,
        Self::Memory,
        Self::Documents,
        Self::Browser,
        Self::Persona,
    ];

    pub fn config(self) -> PanelConfig {
        match self {
            Self::Integrations => INTEGRATIONS_CONFIG,
            Self::Memory => MEMORY_CONFIG,
            Self::Documents => DOCUMENTS_CONFIG,
            Self::Browser => BROWSER_CONFIG,
            Self::Persona => PERSONA_CONFIG,
        }
    }

    pub fn label(self) -> &'static str {
        self.config().title
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.config().name.eq_ignore_ascii_case(name))
    }
}

/// What a panel key press means for the surrounding shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKeyResult {
    Handled,
    Close,
}

/// Object-safe seam between the typed panel views and the event loop.
pub trait PanelSurface {
    fn kind(&self) -> PanelKind;
    fn drain_events(&mut self) -> Vec<PanelEffect>;
    fn handle_key(&mut self, key: KeyEvent) -> PanelKeyResult;
    fn render(&self, frame: &mut Frame, area: Rect);
    fn close(self: Box<Self>);
}

/// One open panel of a concrete record type.
pub struct PanelView<R: RecordRow> {
    kind: PanelKind,
    host: PanelHost<R>,
    prefs: Preferences,
    reindex_payload: Option<serde_json::Value>,
}

impl<R> PanelView<R>
where
    R: RecordRow + DeserializeOwned + Send + Sync + 'static,
{
    pub fn open(kind: PanelKind, base_url: &str, prefs: Preferences) -> Self {
        let mut config = kind.config();
        if let Some(ms) = prefs.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        let backend = Arc::new(HttpPanelClient::<R>::new(base_url, config.name));
        let reindex_payload = (kind == PanelKind::Documents)
            .then(|| json!({ "mode": prefs.documents_extraction_mode.label() }));
        Self {
            kind,
            host: PanelHost::open(config, backend),
            prefs,
            reindex_payload,
        }
    }

    fn visible_len(&self, section: usize) -> usize {
        let state = &self.host.state;
        visible_indices(
            &state.items,
            section,
            &state.search_query,
            state.config.search_fields,
        )
        .len()
    }

    /// Id of the record under the cursor in the focused section, clamped
    /// against the currently visible (filtered) list on every access.
    fn current_id(&self) -> Option<String> {
        let state = &self.host.state;
        let section = state.focused_section()?;
        let visible = visible_indices(
            &state.items,
            section,
            &state.search_query,
            state.config.search_fields,
        );
        let selected = state.sections.get(section)?.selected;
        let idx = clamped_index(selected, visible.len())?;
        Some(state.items[visible[idx]].id().to_string())
    }

    fn move_selection(&mut self, up: bool) {
        let Some(section) = self.host.state.focused_section() else {
            return;
        };
        let visible_len = self.visible_len(section);
        let action = if up {
            PanelAction::SelectUp { visible_len }
        } else {
            PanelAction::SelectDown { visible_len }
        };
        self.host.apply(action);
    }

    fn handle_confirm_keys(&mut self, key: KeyEvent) -> PanelKeyResult {
        let gate_key = match key.code {
            KeyCode::Enter | KeyCode::Char('y') => GateKey::Accept,
            KeyCode::Esc | KeyCode::Char('n') => GateKey::Cancel,
            _ => GateKey::Other,
        };
        self.host.confirm_key(gate_key);
        PanelKeyResult::Handled
    }

    fn handle_search_keys(&mut self, key: KeyEvent) -> PanelKeyResult {
        match key.code {
            KeyCode::Esc => {
                self.host.apply(PanelAction::ExitSearch);
            }
            KeyCode::Backspace => {
                let mut query = self.host.state.search_query.clone();
                query.pop();
                self.host.apply(PanelAction::SetSearch(query));
            }
            KeyCode::Up => self.move_selection(true),
            KeyCode::Down => self.move_selection(false),
            KeyCode::Tab => {
                self.host.apply(PanelAction::SwitchSection);
            }
            KeyCode::BackTab => {
                self.host.apply(PanelAction::SwitchSectionBack);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut query = self.host.state.search_query.clone();
                query.push(c);
                self.host.apply(PanelAction::SetSearch(query));
            }
            // Enter and anything else: explicit no-op while searching.
            _ => {}
        }
        PanelKeyResult::Handled
    }

    fn handle_detail_keys(&mut self, key: KeyEvent) -> PanelKeyResult {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.host.apply(PanelAction::CloseDetail);
            }
            KeyCode::Tab => {
                self.host.apply(PanelAction::SwitchSection);
            }
            KeyCode::BackTab => {
                self.host.apply(PanelAction::SwitchSectionBack);
            }
            _ => {}
        }
        PanelKeyResult::Handled
    }

    fn handle_browse_keys(&mut self, key: KeyEvent) -> PanelKeyResult {
        match key.code {
            KeyCode::Esc => {
                // Esc backs out one layer at a time: banner, then an open
                // detail pane, then the panel itself; q always closes.
                if self.host.state.feedback.is_some() {
                    self.host.apply(PanelAction::DismissFeedback);
                } else if self.host.state.detail.is_some() {
                    self.host.apply(PanelAction::CloseDetail);
                } else {
                    return PanelKeyResult::Close;
                }
            }
            KeyCode::Char('q') => return PanelKeyResult::Close,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(true),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(false),
            KeyCode::Tab => {
                self.host.apply(PanelAction::SwitchSection);
            }
            KeyCode::BackTab => {
                self.host.apply(PanelAction::SwitchSectionBack);
            }
            KeyCode::Enter => {
                if self.host.state.config.has_detail {
                    if let Some(id) = self.current_id() {
                        self.host.apply(PanelAction::OpenDetail(id));
                    }
                }
            }
            KeyCode::Char('/') => {
                self.host.apply(PanelAction::EnterSearch);
            }
            KeyCode::Char('m') if self.kind == PanelKind::Documents => {
                self.toggle_extraction_mode();
            }
            KeyCode::Char(c) => {
                if let Some(binding) = self.host.state.config.binding_for(c) {
                    self.trigger_action(binding);
                }
            }
            _ => {}
        }
        PanelKeyResult::Handled
    }

    fn trigger_action(&mut self, binding: ActionBinding) {
        let Some(id) = self.current_id() else {
            return;
        };
        if binding.destructive {
            self.host.begin_confirm(&id);
            return;
        }
        let mut request = ActionRequest::new(binding.action, id);
        if binding.action == "reindex" {
            if let Some(payload) = &self.reindex_payload {
                request = request.with_payload(payload.clone());
            }
        }
        self.host.dispatch(request);
    }

    fn toggle_extraction_mode(&mut self) {
        self.prefs.documents_extraction_mode = self.prefs.documents_extraction_mode.toggle();
        self.reindex_payload =
            Some(json!({ "mode": self.prefs.documents_extraction_mode.label() }));
        if let Some(path) = prefs::preferences_path() {
            if let Err(err) = prefs::save_to(&path, &self.prefs) {
                log::warn!("failed to persist preferences: {err}");
            }
        }
    }
}

impl<R> PanelSurface for PanelView<R>
where
    R: RecordRow + DeserializeOwned + Send + Sync + 'static,
{
    fn kind(&self) -> PanelKind {
        self.kind
    }

    fn drain_events(&mut self) -> Vec<PanelEffect> {
        self.host.drain()
    }

    /// Mode priority: a pending confirmation owns the keyboard, then the
    /// search box, then the detail view, then normal browsing.
    fn handle_key(&mut self, key: KeyEvent) -> PanelKeyResult {
        if self.host.state.confirming.is_some() {
            return self.handle_confirm_keys(key);
        }
        if self.host.state.search_active {
            return self.handle_search_keys(key);
        }
        if self.host.state.focus == FocusTarget::Detail {
            return self.handle_detail_keys(key);
        }
        self.handle_browse_keys(key)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        ui::render_panel(frame, area, &self.host.state);
    }

    fn close(self: Box<Self>) {
        self.host.close();
    }
}

pub fn open_panel(
    kind: PanelKind,
    base_url: &str,
    prefs: Preferences,
) -> Box<dyn PanelSurface> {
    match kind {
        PanelKind::Integrations => {
            Box::new(PanelView::<IntegrationRecord>::open(kind, base_url, prefs))
        }
        PanelKind::Memory => Box::new(PanelView::<MemoryRecord>::open(kind, base_url, prefs)),
        PanelKind::Documents => {
            Box::new(PanelView::<DocumentRecord>::open(kind, base_url, prefs))
        }
        PanelKind::Browser => {
            Box::new(PanelView::<BrowserTabRecord>::open(kind, base_url, prefs))
        }
        PanelKind::Persona => Box::new(PanelView::<PersonaRecord>::open(kind, base_url, prefs)),
    }
}
