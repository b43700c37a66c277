//! Terminal status line backed by an indicatif spinner on stderr.

use std::cell::RefCell;
use std::time::Duration;

use deckhand_pipeline::{Progress, StepOutcome};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Default)]
pub struct StatusLine {
    current: RefCell<Option<ProgressBar>>,
}

impl StatusLine {
    pub fn new() -> Self { Self::default() }

    fn spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
            .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl Progress for StatusLine {
    fn start(&self, message: &str) {
        let mut cur = self.current.borrow_mut();
        if let Some(prev) = cur.take() { prev.finish_and_clear(); }
        *cur = Some(Self::spinner(message));
    }

    fn warn(&self, message: &str) {
        match self.current.borrow().as_ref() {
            Some(pb) => pb.println(format!("⚠️  {}", message)),
            None => eprintln!("⚠️  {}", message),
        }
    }

    fn finish(&self, outcome: StepOutcome) {
        if let Some(pb) = self.current.borrow_mut().take() {
            let msg = pb.message();
            pb.finish_and_clear();
            match outcome {
                StepOutcome::Success => eprintln!("✅ {}", msg),
                StepOutcome::Warning => eprintln!("⚠️  {}", msg),
                StepOutcome::Failed(reason) => eprintln!("❌ {}", reason),
            }
        }
    }

    /// Drop any in-flight spinner so nothing redraws while stdout is written.
    fn flush(&self) {
        if let Some(pb) = self.current.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}
