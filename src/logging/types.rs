//! The [`Log`] trait shared by commands and the link engine.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) routes messages through `tracing`;
/// unit tests substitute a collecting implementation so that engine code can
/// be checked for what it reported without installing a subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
}

/// [`Log`] implementation that keeps every message in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct TestLog {
    messages: std::sync::Mutex<Vec<(&'static str, String)>>,
}

#[cfg(test)]
impl TestLog {
    fn push(&self, level: &'static str, msg: &str) {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((level, msg.to_string()));
    }

    /// All messages in the order they were logged.
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    /// Messages logged at `level` (`"stage"`, `"info"`, `"debug"`, `"warn"`
    /// or `"error"`).
    pub(crate) fn at(&self, level: &str) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}

#[cfg(test)]
impl Log for TestLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
}
