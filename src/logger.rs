//! Dispatch trace logging.
//!
//! The machine never writes to a fixed sink. It reports through an injected
//! [`HsmLogger`]; [`TracingLogger`] forwards to `tracing` and is the default,
//! [`RecordingLogger`] keeps the trace in memory.

use crate::core::StatePath;
use std::sync::{Arc, Mutex, PoisonError};

/// Receiver of dispatch traces.
///
/// Called synchronously while a signal is dispatched. Implementations cannot
/// fail: a state change that has been applied is never rolled back.
pub trait HsmLogger: Send + Sync {
    fn log_info(&self, message: &str);

    fn log_debug(&self, message: &str);

    /// Called once per completed transition, after the entry actions ran.
    fn on_state_change(&self, before: &StatePath, after: &StatePath, reason: Option<&str>);
}

/// Forwards dispatch traces to `tracing` under the `hsm` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl HsmLogger for TracingLogger {
    fn log_info(&self, message: &str) {
        tracing::info!(target: "hsm", "{message}");
    }

    fn log_debug(&self, message: &str) {
        tracing::debug!(target: "hsm", "{message}");
    }

    fn on_state_change(&self, before: &StatePath, after: &StatePath, reason: Option<&str>) {
        tracing::info!(
            target: "hsm",
            before = %before,
            after = %after,
            reason = reason.unwrap_or_default(),
            "state change"
        );
    }
}

/// Keeps the dispatch trace in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the machine
/// and read the trace through another.
///
/// ```rust
/// use hsm::{HsmLogger, RecordingLogger, StatePath};
///
/// let logger = RecordingLogger::new();
/// let handle = logger.clone();
/// logger.log_info("'a': will be handled by Top");
/// logger.log_debug("No state change!");
/// assert_eq!(handle.take(), ["'a': will be handled by Top", "> No state change!"]);
/// assert!(handle.lines().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the recorded lines and clear the buffer.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

impl HsmLogger for RecordingLogger {
    fn log_info(&self, message: &str) {
        self.push(message.to_string());
    }

    fn log_debug(&self, message: &str) {
        self.push(format!("> {message}"));
    }

    fn on_state_change(&self, before: &StatePath, after: &StatePath, reason: Option<&str>) {
        let line = match reason {
            Some(why) => format!(">>> {before} ==> {after} ({why})"),
            None => format!(">>> {before} ==> {after}"),
        };
        self.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(name: &str) -> StatePath {
        StatePath::parse(name).unwrap()
    }

    #[test]
    fn state_change_line_includes_reason() {
        let logger = RecordingLogger::new();
        logger.on_state_change(&path("TopA_SubA"), &path("TopA_SubA"), Some("Got b"));
        logger.on_state_change(&path("0_1_1"), &path("0_2_1_1"), None);

        assert_eq!(
            logger.take(),
            [">>> TopA_SubA ==> TopA_SubA (Got b)", ">>> 0_1_1 ==> 0_2_1_1"]
        );
    }

    #[test]
    fn clones_share_the_buffer() {
        let logger = RecordingLogger::new();
        let handle = logger.clone();
        logger.log_info("one");
        handle.log_debug("two");

        assert_eq!(logger.lines(), ["one", "> two"]);
        assert_eq!(handle.take().len(), 2);
        assert!(logger.lines().is_empty());
    }

    #[test]
    fn tracing_logger_does_not_require_a_subscriber() {
        let logger = TracingLogger;
        logger.log_info("info");
        logger.log_debug("debug");
        logger.on_state_change(&path("a"), &path("b"), None);
    }
}
