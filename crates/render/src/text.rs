//! Human-readable reports.
//!
//! Sections appear in a fixed order and only when they have content. Every
//! section after the first is preceded by exactly one blank line.

use std::fmt::Write;

use deckhand_core::{Change, CommandResult, DeploymentError, ObjectRef, ValidateResult, ValidateResultEntry};

use crate::classify::classify;
use crate::table::render_table;

fn section(buf: &mut String, header: &str) {
    if !buf.is_empty() { buf.push('\n'); }
    buf.push_str(header);
    buf.push('\n');
}

fn pretty_refs(buf: &mut String, refs: &[&ObjectRef]) {
    for r in refs {
        let _ = writeln!(buf, "  {}", r);
    }
}

fn pretty_errors(buf: &mut String, errors: &[DeploymentError]) {
    for e in errors {
        if e.object_ref.is_empty() {
            let _ = writeln!(buf, "  {}", e.message);
        } else {
            let _ = writeln!(buf, "  {}: {}", e.object_ref, e.message);
        }
    }
}

fn pretty_changes(buf: &mut String, r: &ObjectRef, changes: &[Change]) {
    let _ = writeln!(buf, "Diff for object {}", r);
    buf.push_str(&render_table(("Path", "Diff"), changes.iter().map(|c| (c.json_path.as_str(), c.unified_diff.as_str()))));
}

/// Report for a command result. With `short`, per-object diff tables are left out.
pub fn format_command_result(cr: &CommandResult, short: bool) -> String {
    let mut buf = String::new();
    let cl = classify(&cr.objects);

    if !cl.new.is_empty() {
        section(&mut buf, "New objects:");
        pretty_refs(&mut buf, &cl.new);
    }
    if !cl.changed.is_empty() {
        section(&mut buf, "Changed objects:");
        pretty_refs(&mut buf, &cl.changed);
        if !short {
            for o in cr.objects.iter().filter(|o| o.is_changed()) {
                buf.push('\n');
                pretty_changes(&mut buf, &o.object_ref, &o.changes);
            }
        }
    }
    if !cl.deleted.is_empty() {
        section(&mut buf, "Deleted objects:");
        pretty_refs(&mut buf, &cl.deleted);
    }
    if !cl.hooks.is_empty() {
        section(&mut buf, "Applied hooks:");
        pretty_refs(&mut buf, &cl.hooks);
    }
    if !cl.orphan.is_empty() {
        section(&mut buf, "Orphan objects:");
        pretty_refs(&mut buf, &cl.orphan);
    }
    if !cr.warnings.is_empty() {
        section(&mut buf, "Warnings:");
        pretty_errors(&mut buf, &cr.warnings);
    }
    if !cr.errors.is_empty() {
        section(&mut buf, "Errors:");
        pretty_errors(&mut buf, &cr.errors);
    }
    buf
}

fn pretty_validation_results(buf: &mut String, results: &[ValidateResultEntry]) {
    buf.push_str(&render_table(("Object", "Message"), results.iter().map(|e| (e.object_ref.to_string(), e.message.as_str()))));
}

pub fn format_validate_result(vr: &ValidateResult) -> String {
    let mut buf = String::new();
    if !vr.warnings.is_empty() {
        section(&mut buf, "Validation Warnings:");
        pretty_errors(&mut buf, &vr.warnings);
    }
    if !vr.errors.is_empty() {
        section(&mut buf, "Validation Errors:");
        pretty_errors(&mut buf, &vr.errors);
    }
    if !vr.results.is_empty() {
        section(&mut buf, "Results:");
        pretty_validation_results(&mut buf, &vr.results);
    }
    buf
}
