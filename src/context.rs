//! Per-test execution context.
//!
//! The test framework owns one `ExecutionContext` per logical test run and
//! swaps it into the client between tests. The context may carry a tracing
//! payload; when it does not, instrumented commands run untouched.

use std::sync::Mutex;

use crate::frame::CommandFrame;
use crate::log::CommandLog;

/// Tracing payload of an execution context.
///
/// The command log is created lazily on the first instrumented call within
/// the owning context, so a context that never runs a command never allocates
/// a tree. The lock is held only across the push/pop instants of a single
/// invocation, never across an await.
#[derive(Debug, Default)]
pub struct TraceState {
    log: Mutex<Option<CommandLog>>,
}

impl TraceState {
    pub(crate) fn with_log<R>(&self, f: impl FnOnce(&mut CommandLog) -> R) -> R {
        let mut guard = self.log.lock().expect("command log lock poisoned");
        f(guard.get_or_insert_with(CommandLog::new))
    }

    /// Snapshot of the recorded tree, or `None` if no command ran yet.
    pub fn command_log(&self) -> Option<CommandFrame> {
        let guard = self.log.lock().expect("command log lock poisoned");
        guard.as_ref().map(CommandLog::frame_tree)
    }
}

/// Externally-owned state for one logical test execution.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    trace: Option<TraceState>,
}

impl ExecutionContext {
    /// Context without a tracing payload; instrumented commands pass through.
    pub fn new() -> Self {
        Self { trace: None }
    }

    /// Context that records every instrumented command into a call tree.
    pub fn with_tracing() -> Self {
        Self {
            trace: Some(TraceState::default()),
        }
    }

    /// The tracing payload, if this context carries one.
    pub fn trace(&self) -> Option<&TraceState> {
        self.trace.as_ref()
    }

    /// Snapshot of the recorded tree: `None` when tracing is disabled or no
    /// instrumented command ran within this context.
    pub fn command_log(&self) -> Option<CommandFrame> {
        self.trace.as_ref().and_then(TraceState::command_log)
    }
}
