//! Deckhand renderers: turn command and validation results into text or YAML.
//!
//! - [`classify`] buckets objects into overlapping display categories
//! - [`table`] lays out two-column tables with a capped value column
//! - [`text`] composes the human-readable report
//! - [`structured`] emits YAML documents
//!
//! [`render_command_result`] and [`render_validate_result`] dispatch on a format name.

#![forbid(unsafe_code)]

use std::str::FromStr;

use deckhand_core::{CommandResult, Redacted, ValidateResult};
use tracing::debug;

pub mod classify;
pub mod structured;
pub mod table;
pub mod text;

pub use classify::{classify, Classification};
pub use table::{render_table, MAX_VALUE_COLUMN_WIDTH};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("serializing YAML: {0}")]
    Serialization(#[from] serde_yaml::Error),
    #[error("object is not a list")]
    NotAList,
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Format { Text, Yaml }

impl FromStr for Format {
    type Err = RenderError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Format::Text),
            "yaml" => Ok(Format::Yaml),
            other => Err(RenderError::InvalidFormat(other.to_string())),
        }
    }
}

/// Render a redacted command result in the named format.
pub fn render_command_result(cr: &Redacted<CommandResult>, format: &str, short: bool) -> Result<String> {
    render_command_result_as(cr, format.parse()?, short)
}

pub fn render_command_result_as(cr: &Redacted<CommandResult>, format: Format, short: bool) -> Result<String> {
    debug!(?format, short, objects = cr.objects.len(), "rendering command result");
    match format {
        Format::Text => Ok(text::format_command_result(cr, short)),
        Format::Yaml => structured::to_yaml(&cr.to_compacted()),
    }
}

/// Render a validation result in the named format.
pub fn render_validate_result(vr: &ValidateResult, format: &str) -> Result<String> {
    render_validate_result_as(vr, format.parse()?)
}

pub fn render_validate_result_as(vr: &ValidateResult, format: Format) -> Result<String> {
    debug!(?format, results = vr.results.len(), "rendering validate result");
    match format {
        Format::Text => Ok(text::format_validate_result(vr)),
        Format::Yaml => structured::to_yaml(vr),
    }
}
