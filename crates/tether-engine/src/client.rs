use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use tether_core::PanelRecord;

use crate::contracts::ActionRequest;
use crate::contracts::DaemonError;
use crate::contracts::DaemonResult;
use crate::contracts::PanelBackend;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP implementation of `PanelBackend` against the daemon's REST
/// surface: `GET {base}/api/{panel}/list` and
/// `POST {base}/api/{panel}/{action}`.
pub struct HttpPanelClient<R> {
    http: reqwest::Client,
    base_url: String,
    panel: &'static str,
    _marker: PhantomData<fn() -> R>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<R> {
    items: Vec<R>,
}

#[derive(Debug, Deserialize)]
struct ActionEnvelope {
    ok: bool,
    message: Option<String>,
    error: Option<String>,
}

impl<R> HttpPanelClient<R> {
    pub fn new(base_url: impl Into<String>, panel: &'static str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            panel,
            _marker: PhantomData,
        }
    }

    fn list_url(&self) -> String {
        format!("{}/api/{}/list", self.base_url, self.panel)
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, self.panel, action)
    }
}

#[async_trait]
impl<R> PanelBackend<R> for HttpPanelClient<R>
where
    R: PanelRecord + DeserializeOwned + Send + Sync + 'static,
{
    async fn fetch(&self) -> DaemonResult<Vec<R>> {
        let response = self
            .http
            .get(self.list_url())
            .send()
            .await
            .map_err(|_| DaemonError::Unreachable)?;
        if !response.status().is_success() {
            return Err(DaemonError::Unreachable);
        }

        let envelope: ListEnvelope<R> = response
            .json()
            .await
            .map_err(|err| DaemonError::InvalidResponse(err.to_string()))?;
        narrow_items(envelope.items)
    }

    async fn execute(&self, request: &ActionRequest) -> DaemonResult<String> {
        let body = json!({
            "id": request.id,
            "payload": request.payload,
        });
        let response = self
            .http
            .post(self.action_url(&request.action))
            .json(&body)
            .send()
            .await
            .map_err(|_| DaemonError::Unreachable)?;

        let status = response.status();
        let envelope: Option<ActionEnvelope> = response.json().await.ok();

        if !status.is_success() {
            let message = envelope
                .and_then(|e| e.error)
                .unwrap_or_else(|| format!("daemon returned {status}"));
            return Err(DaemonError::Rejected(message));
        }

        match envelope {
            Some(ActionEnvelope { ok: true, message, .. }) => {
                Ok(message.unwrap_or_else(|| "Done".to_string()))
            }
            Some(ActionEnvelope { ok: false, error, .. }) => Err(DaemonError::Rejected(
                error.unwrap_or_else(|| "action rejected".to_string()),
            )),
            None => Err(DaemonError::InvalidResponse(
                "action response was not JSON".to_string(),
            )),
        }
    }
}

/// Narrow untrusted items before anything reaches the reducer: every
/// record must carry a usable id. A malformed batch is a fetch error, not
/// a silently shortened list.
pub fn narrow_items<R: PanelRecord>(items: Vec<R>) -> DaemonResult<Vec<R>> {
    if items.iter().any(|record| record.id().trim().is_empty()) {
        return Err(DaemonError::InvalidResponse(
            "record with empty id".to_string(),
        ));
    }
    Ok(items)
}
