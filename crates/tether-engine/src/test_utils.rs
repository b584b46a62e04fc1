//! Scripted collaborator shared by the engine tests.

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use tether_core::ActionBinding;
use tether_core::PanelConfig;
use tether_core::PanelRecord;

use crate::contracts::ActionRequest;
use crate::contracts::DaemonResult;
use crate::contracts::PanelBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    pub id: String,
    pub name: String,
    pub section: usize,
}

impl TestRecord {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            section: 0,
        }
    }
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

pub fn test_config(refresh_after_action: bool) -> PanelConfig {
    PanelConfig {
        name: "test",
        title: "Test",
        sections: &["main"],
        search_fields: &["id", "name"],
        poll_interval_ms: 5_000,
        has_detail: true,
        refresh_after_action,
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
    }
}

struct Inner {
    fetches: Mutex<VecDeque<DaemonResult<Vec<TestRecord>>>>,
    fetch_calls: AtomicUsize,
    exec_results: Mutex<VecDeque<DaemonResult<String>>>,
    executed: Mutex<Vec<ActionRequest>>,
}

/// A `PanelBackend` that replays a script. Once the fetch script is
/// exhausted, further fetches hang forever, which keeps paused-clock tests
/// from racing ahead through extra poll cycles.
#[derive(Clone)]
pub struct ScriptedBackend {
    inner: Arc<Inner>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                fetches: Mutex::new(VecDeque::new()),
                fetch_calls: AtomicUsize::new(0),
                exec_results: Mutex::new(VecDeque::new()),
                executed: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn with_fetch(self, result: DaemonResult<Vec<TestRecord>>) -> Self {
        self.inner.fetches.lock().unwrap().push_back(result);
        self
    }

    pub fn with_execute(self, result: DaemonResult<String>) -> Self {
        self.inner.exec_results.lock().unwrap().push_back(result);
        self
    }

    pub fn clone_arc(&self) -> Arc<dyn PanelBackend<TestRecord>> {
        Arc::new(self.clone())
    }

    pub fn fetch_calls(&self) -> usize {
        self.inner.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn executed(&self) -> Vec<ActionRequest> {
        self.inner.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PanelBackend<TestRecord> for ScriptedBackend {
    async fn fetch(&self) -> DaemonResult<Vec<TestRecord>> {
        self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.inner.fetches.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }

    async fn execute(&self, request: &ActionRequest) -> DaemonResult<String> {
        self.inner.executed.lock().unwrap().push(request.clone());
        let next = self.inner.exec_results.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => Ok("Done".to_string()),
        }
    }
}

/// Let spawned engine tasks run to their next suspension point.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
