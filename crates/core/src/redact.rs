//! Redaction gate: the only way to obtain a [`Redacted`] record.
//!
//! Renderers and stores accept `&Redacted<CommandResult>`, so a record cannot reach
//! them without either passing through an [`Obfuscator`] or being explicitly
//! marked as exempt by the caller.

#![forbid(unsafe_code)]

use std::ops::Deref;

use crate::{CommandResult, DeploymentError};

/// Policy that removes sensitive values from a result in place.
pub trait Obfuscator {
    fn obfuscate(&self, cr: &mut CommandResult) -> anyhow::Result<()>;
}

/// A record that went through the redaction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redacted<T>(T);

impl<T> Redacted<T> {
    pub fn into_inner(self) -> T { self.0 }
}

impl<T> Deref for Redacted<T> {
    type Target = T;
    fn deref(&self) -> &T { &self.0 }
}

impl Redacted<CommandResult> {
    /// Pipeline-generated diagnostics carry no user data and may be added after redaction.
    pub fn push_warning(&mut self, warning: DeploymentError) { self.0.warnings.push(warning); }
}

pub struct RedactionGate;

impl RedactionGate {
    /// Run `policy` over the record. On failure the record is dropped so nothing
    /// downstream can observe a partially redacted value.
    pub fn redact<O: Obfuscator + ?Sized>(policy: &O, mut cr: CommandResult) -> anyhow::Result<Redacted<CommandResult>> {
        policy.obfuscate(&mut cr)?;
        Ok(Redacted(cr))
    }

    /// Skip redaction. Only for callers that opted out explicitly.
    pub fn exempt<T>(value: T) -> Redacted<T> { Redacted(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting { calls: Cell<usize>, fail: bool }

    impl Obfuscator for Counting {
        fn obfuscate(&self, cr: &mut CommandResult) -> anyhow::Result<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail { anyhow::bail!("cannot redact {}", cr.id); }
            cr.id = format!("{}-redacted", cr.id);
            Ok(())
        }
    }

    #[test]
    fn redact_runs_policy_once() {
        let policy = Counting { calls: Cell::new(0), fail: false };
        let r = RedactionGate::redact(&policy, CommandResult { id: "x".into(), ..Default::default() }).unwrap();
        assert_eq!(policy.calls.get(), 1);
        assert_eq!(r.id, "x-redacted");
    }

    #[test]
    fn redact_failure_surfaces_error() {
        let policy = Counting { calls: Cell::new(0), fail: true };
        let e = RedactionGate::redact(&policy, CommandResult { id: "x".into(), ..Default::default() }).unwrap_err();
        assert!(e.to_string().contains("cannot redact x"));
    }

    #[test]
    fn push_warning_appends() {
        let mut r = RedactionGate::exempt(CommandResult::default());
        r.push_warning(DeploymentError::message("w"));
        assert_eq!(r.warnings.len(), 1);
    }
}
