//! Stub sources shared by unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use heft_core::{BundleStats, Resolution};
use heft_registry::StatsSource;

/// Shared log of `label:name@version` entries in call order
pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

/// Source answering from a fixed table and recording every call
pub(crate) struct StubSource {
    label: &'static str,
    responses: HashMap<String, BundleStats>,
    calls: CallLog,
}

impl StubSource {
    pub(crate) fn new(label: &'static str, calls: &CallLog) -> Self {
        Self {
            label,
            responses: HashMap::new(),
            calls: Arc::clone(calls),
        }
    }

    /// Answer `spec` (`name@version`) with `stats`
    pub(crate) fn with(mut self, spec: &str, stats: BundleStats) -> Self {
        self.responses.insert(spec.to_string(), stats);
        self
    }
}

#[async_trait]
impl StatsSource for StubSource {
    fn label(&self) -> &'static str {
        self.label
    }

    async fn fetch(&self, name: &str, version: &str, _cancel: &CancellationToken) -> Resolution {
        let spec = format!("{}@{}", name, version);
        self.calls.lock().unwrap().push(format!("{}:{}", self.label, spec));
        self.responses.get(&spec).cloned().into()
    }
}
