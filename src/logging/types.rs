//! The [`Log`] trait shared by the engine and its collaborators.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards every call to [`tracing`];
/// tests substitute an implementation that records messages so they can
/// assert on what the engine reported.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless `--debug`).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
}
