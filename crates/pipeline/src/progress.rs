//! Status-line capability injected into the pipeline.

/// How a status step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Warning,
    Failed(String),
}

/// A status line that may hold an unflushed, in-place line on the terminal.
/// Anything that writes to shared output must call [`Progress::flush`] first.
pub trait Progress {
    fn start(&self, message: &str);
    fn warn(&self, message: &str);
    fn finish(&self, outcome: StepOutcome);
    fn flush(&self);
}

/// Progress sink for non-interactive runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn finish(&self, _outcome: StepOutcome) {}
    fn flush(&self) {}
}
