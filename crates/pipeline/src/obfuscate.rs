//! Default redaction policy: hide Secret payload values in diffs.

use anyhow::{bail, Result};
use deckhand_core::{CommandResult, Obfuscator};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

const MASK: &str = "*****";

static SECRET_DATA_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(data|stringData)(\.|\[|$)").unwrap());

/// Masks every value line of changes under `data`/`stringData` of core `Secret` objects.
/// Diff markers and hunk headers are kept so the report still shows what kind of change happened.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecretObfuscator;

impl Obfuscator for SecretObfuscator {
    fn obfuscate(&self, cr: &mut CommandResult) -> Result<()> {
        let mut masked = 0usize;
        for o in cr.objects.iter_mut().filter(|o| o.object_ref.is_core_kind("Secret")) {
            for c in o.changes.iter_mut() {
                if c.json_path.is_empty() {
                    bail!("change without path on {}; cannot tell whether it holds secret data", o.object_ref);
                }
                if SECRET_DATA_PATH.is_match(&c.json_path) {
                    c.unified_diff = mask_diff(&c.unified_diff);
                    masked += 1;
                }
            }
        }
        debug!(masked, "secret changes obfuscated");
        Ok(())
    }
}

fn mask_diff(diff: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in diff.lines() {
        if line.starts_with("@@") {
            out.push(line.to_string());
        } else if let Some(marker @ ('+' | '-' | ' ')) = line.chars().next() {
            out.push(format!("{}{}", marker, MASK));
        } else {
            out.push(MASK.to_string());
        }
    }
    let mut s = out.join("\n");
    if diff.ends_with('\n') { s.push('\n'); }
    s
}
