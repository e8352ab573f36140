//! Shared fixtures for unit tests: a recording activator and route
//! contexts wired to `sh`-scripted fake pickers.

use crate::config::HostConfig;
use crate::diagnostics::MemorySink;
use crate::router::RouteContext;
use crate::traits::WindowActivator;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Activator that counts invocations instead of touching a window
/// manager.
#[derive(Default)]
pub(crate) struct RecordingActivator {
    calls: AtomicUsize,
}

impl RecordingActivator {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WindowActivator for RecordingActivator {
    async fn activate(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Config whose picker is `sh -c <script>`. Scripts read the option
/// list from stdin and print the "selection".
pub(crate) fn test_config(picker_script: &str) -> HostConfig {
    let mut config = HostConfig::default();
    config.picker.program = "sh".to_string();
    config.picker.base_args = vec!["-c".to_string(), picker_script.to_string()];
    config
}

/// Full route context around a fake picker, returning the concrete
/// sink and activator for assertions.
pub(crate) fn test_context(
    picker_script: &str,
) -> (RouteContext, Arc<MemorySink>, Arc<RecordingActivator>) {
    let sink = Arc::new(MemorySink::new());
    let activator = Arc::new(RecordingActivator::default());
    let ctx = RouteContext::new(
        Arc::new(test_config(picker_script)),
        activator.clone(),
        sink.clone(),
    );
    (ctx, sink, activator)
}
