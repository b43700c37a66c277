//! Compacted serialization view of a command result.
//!
//! The view borrows the record, serializes the same fields, and adds a derived
//! `summary` block. Deserializing the output as a [`CommandResult`] ignores the
//! summary, so the encoding stays lossless.

#![forbid(unsafe_code)]

use serde::Serialize;

use crate::{ClusterInfo, CommandInfo, CommandResult, DeploymentError, ResultObject};

/// Per-category counters derived from the object list and diagnostics.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub total_objects: usize,
    pub new_objects: usize,
    pub changed_objects: usize,
    pub deleted_objects: usize,
    pub orphan_objects: usize,
    pub applied_hooks: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl ResultSummary {
    pub fn of(cr: &CommandResult) -> Self {
        let mut s = Self { total_objects: cr.objects.len(), warnings: cr.warnings.len(), errors: cr.errors.len(), ..Default::default() };
        for o in &cr.objects {
            if o.new { s.new_objects += 1; }
            if o.is_changed() { s.changed_objects += 1; }
            if o.deleted { s.deleted_objects += 1; }
            if o.orphan { s.orphan_objects += 1; }
            if o.hook { s.applied_hooks += 1; }
        }
        s
    }
}

fn is_empty<T>(v: &&[T]) -> bool { v.is_empty() }

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactedCommandResult<'a> {
    pub id: &'a str,
    pub command: &'a CommandInfo,
    pub cluster_info: &'a ClusterInfo,
    pub summary: ResultSummary,
    #[serde(skip_serializing_if = "is_empty")]
    pub objects: &'a [ResultObject],
    #[serde(skip_serializing_if = "is_empty")]
    pub warnings: &'a [DeploymentError],
    #[serde(skip_serializing_if = "is_empty")]
    pub errors: &'a [DeploymentError],
}

impl<'a> CompactedCommandResult<'a> {
    pub fn new(cr: &'a CommandResult) -> Self {
        Self {
            id: &cr.id,
            command: &cr.command,
            cluster_info: &cr.cluster_info,
            summary: ResultSummary::of(cr),
            objects: &cr.objects,
            warnings: &cr.warnings,
            errors: &cr.errors,
        }
    }
}
