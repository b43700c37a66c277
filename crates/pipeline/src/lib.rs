//! Deckhand output pipeline.
//!
//! Sequences one run's result through redaction, the optional result store and
//! every requested output descriptor:
//!
//! 1. assign id/initiator
//! 2. redact (unless disabled); failure aborts before any side effect
//! 3. store (optional, best effort); a missing cluster id becomes a report warning
//! 4. flush progress, render + write each descriptor, flush progress
//! 5. return the render error, else the store error, else success

#![forbid(unsafe_code)]

use std::io::Write;

use deckhand_core::{CommandInitiator, CommandResult, DeploymentError, Obfuscator, RedactionGate, Redacted, ValidateResult, MISSING_CLUSTER_ID_WARNING};
use deckhand_persist::ResultStore;
use deckhand_render::{render_command_result_as, render_validate_result_as, structured, RenderError};
use metrics::counter;
use serde::Serialize;
use tracing::{info, warn};

pub mod descriptor;
pub mod error;
pub mod obfuscate;
pub mod progress;
pub mod router;

pub use descriptor::{Destination, OutputDescriptor};
pub use error::{resolve_outcome, PipelineError, Result};
pub use obfuscate::SecretObfuscator;
pub use progress::{NoProgress, Progress, StepOutcome};
pub use router::OutputRouter;

/// Caller-facing output flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// `format[=destination]` descriptors; empty means `text` on stdout.
    pub output: Vec<String>,
    /// Leave per-object diff tables out of text reports.
    pub short: bool,
    /// Skip the redaction stage.
    pub no_obfuscate: bool,
}

pub struct Pipeline<'a> {
    progress: &'a dyn Progress,
    obfuscator: &'a dyn Obfuscator,
    store: Option<&'a dyn ResultStore>,
}

impl<'a> Pipeline<'a> {
    pub fn new(progress: &'a dyn Progress, obfuscator: &'a dyn Obfuscator) -> Self {
        Self { progress, obfuscator, store: None }
    }

    pub fn with_store(mut self, store: &'a dyn ResultStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Redact, optionally persist, then render `cr` to every descriptor in `opts`.
    pub fn output_command_result(&self, stdout: &mut dyn Write, result_id: &str, opts: &OutputOptions, mut cr: CommandResult, write_to_store: bool) -> Result<()> {
        cr.id = result_id.to_string();
        cr.command.initiator = CommandInitiator::CommandLine;

        let mut cr = if opts.no_obfuscate {
            warn!(id = %cr.id, "obfuscation disabled; output may contain sensitive values");
            RedactionGate::exempt(cr)
        } else {
            RedactionGate::redact(self.obfuscator, cr).map_err(|e| {
                counter!("pipeline_errors_total", 1u64);
                PipelineError::Redaction(e)
            })?
        };

        let store_res = match self.store {
            Some(store) if write_to_store => self.persist(store, &mut cr),
            _ => Ok(()),
        };

        self.progress.flush();
        let render_res = OutputRouter::new(stdout).route(&opts.output, |format| Ok(render_command_result_as(&cr, format, opts.short)?));
        self.progress.flush();

        let res = resolve_outcome(render_res, store_res);
        match &res {
            Ok(()) => info!(id = %cr.id, outputs = opts.output.len(), "command result written"),
            Err(e) => {
                counter!("pipeline_errors_total", 1u64);
                warn!(id = %cr.id, error = %e, "command result output failed");
            }
        }
        res
    }

    fn persist(&self, store: &dyn ResultStore, cr: &mut Redacted<CommandResult>) -> Result<()> {
        self.progress.start("Writing command result");
        let mut did_warn = false;
        if !cr.has_cluster_id() {
            // Records re-read from our own YAML may already carry it.
            if !cr.warnings.iter().any(|w| w.message == MISSING_CLUSTER_ID_WARNING) {
                cr.push_warning(DeploymentError::message(MISSING_CLUSTER_ID_WARNING));
            }
            self.progress.warn(MISSING_CLUSTER_ID_WARNING);
            did_warn = true;
        }
        match store.write_command_result(cr) {
            Ok(()) => {
                self.progress.finish(if did_warn { StepOutcome::Warning } else { StepOutcome::Success });
                Ok(())
            }
            Err(e) => {
                warn!(id = %cr.id, error = %e, "result store write failed");
                self.progress.finish(StepOutcome::Failed(format!("Failed to write result to result store: {}", e)));
                Err(PipelineError::Persistence(e))
            }
        }
    }

    /// Render a validation result to every descriptor. Validation results are not redacted.
    pub fn output_validate_result(&self, stdout: &mut dyn Write, result_id: &str, output: &[String], mut vr: ValidateResult) -> Result<()> {
        vr.id = result_id.to_string();
        self.progress.flush();
        let res = OutputRouter::new(stdout).route(output, |format| Ok(render_validate_result_as(&vr, format)?));
        self.progress.flush();
        res
    }

    /// Write `value` as YAML to each destination (`-` or a path; empty means stdout).
    /// With `multi_doc`, `value` must serialize to a list and each element becomes its own document.
    pub fn output_yaml_result<T: Serialize + ?Sized>(&self, stdout: &mut dyn Write, destinations: &[String], value: &T, multi_doc: bool) -> Result<()> {
        self.progress.flush();
        let text = if multi_doc {
            let v = serde_yaml::to_value(value).map_err(RenderError::from)?;
            structured::to_yaml_documents(&v)?
        } else {
            structured::to_yaml(value)?
        };
        let res = OutputRouter::new(stdout).write_all(destinations, &text);
        self.progress.flush();
        res
    }
}
