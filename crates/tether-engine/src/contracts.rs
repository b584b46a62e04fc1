use async_trait::async_trait;
use thiserror::Error;

/// The one user-visible message for any fetch-path transport failure.
pub const UNREACHABLE_MESSAGE: &str = "Unable to reach daemon";

#[derive(Debug, Error)]
pub enum DaemonError {
    /// Transport-level failure: refused connection, timeout, non-2xx on a
    /// list endpoint.
    #[error("Unable to reach daemon")]
    Unreachable,
    /// The daemon answered and said no; the message is surfaced verbatim.
    #[error("{0}")]
    Rejected(String),
    /// The daemon answered with a payload that does not narrow into the
    /// expected shape.
    #[error("invalid daemon response: {0}")]
    InvalidResponse(String),
}

pub type DaemonResult<T> = Result<T, DaemonError>;

/// One mutating call against the daemon, keyed by record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: String,
    pub id: String,
    pub payload: Option<serde_json::Value>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            id: id.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// The daemon collaborator for one panel. Implementations own transport
/// and response narrowing; callers only ever see typed records or a
/// `DaemonError`.
#[async_trait]
pub trait PanelBackend<R>: Send + Sync {
    /// Fetch the full record list for this panel.
    async fn fetch(&self) -> DaemonResult<Vec<R>>;

    /// Execute one mutating action, resolving to a success message.
    async fn execute(&self, request: &ActionRequest) -> DaemonResult<String>;
}
