//! `format[=destination]` output descriptors.

use std::path::Path;

use deckhand_render::Format;

use crate::error::Result;

/// Where a rendered artifact goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<'a> {
    Stdout,
    File(&'a Path),
}

impl<'a> Destination<'a> {
    /// `-` (or nothing) is standard output; anything else is a file path.
    pub fn parse(s: Option<&'a str>) -> Self {
        match s {
            None | Some("-") => Destination::Stdout,
            Some(p) => Destination::File(Path::new(p)),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Destination::Stdout => "stdout".to_string(),
            Destination::File(p) => p.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputDescriptor<'a> {
    pub format: Format,
    pub destination: Destination<'a>,
}

impl<'a> OutputDescriptor<'a> {
    /// Only the first `=` separates; the rest belongs to the path.
    pub fn parse(s: &'a str) -> Result<Self> {
        let (format, path) = match s.split_once('=') {
            Some((f, p)) => (f, Some(p)),
            None => (s, None),
        };
        Ok(Self { format: format.parse()?, destination: Destination::parse(path) })
    }
}
