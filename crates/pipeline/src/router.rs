//! Fan rendered artifacts out to stdout and files.

use std::fs::File;
use std::io::Write;

use deckhand_render::Format;
use metrics::counter;
use tracing::debug;

use crate::descriptor::{Destination, OutputDescriptor};
use crate::error::{PipelineError, Result};

/// Writes rendered output to descriptor destinations.
///
/// The stdout handle is shared by every descriptor and never closed here. Files are
/// created (truncating), written once and closed before the next descriptor runs.
pub struct OutputRouter<'w> {
    stdout: &'w mut dyn Write,
}

impl<'w> OutputRouter<'w> {
    pub fn new(stdout: &'w mut dyn Write) -> Self {
        Self { stdout }
    }

    /// Render once per descriptor and write the result to its destination.
    ///
    /// All descriptors are parsed before anything is rendered, so an unknown format
    /// produces no output at all. After that, the first render or write failure stops
    /// the remaining descriptors. An empty list means `text` on stdout.
    pub fn route<F>(&mut self, descriptors: &[String], mut render: F) -> Result<()>
    where
        F: FnMut(Format) -> Result<String>,
    {
        let parsed = if descriptors.is_empty() {
            vec![OutputDescriptor { format: Format::Text, destination: Destination::Stdout }]
        } else {
            descriptors.iter().map(|d| OutputDescriptor::parse(d)).collect::<Result<Vec<_>>>()?
        };
        for d in parsed {
            let rendered = render(d.format)?;
            counter!("pipeline_render_total", 1u64);
            self.write(d.destination, &rendered)?;
        }
        Ok(())
    }

    /// Write already rendered text to each destination. An empty list means stdout.
    pub fn write_all(&mut self, destinations: &[String], text: &str) -> Result<()> {
        if destinations.is_empty() {
            return self.write(Destination::Stdout, text);
        }
        for d in destinations {
            self.write(Destination::parse(Some(d)), text)?;
        }
        Ok(())
    }

    fn write(&mut self, dest: Destination<'_>, text: &str) -> Result<()> {
        debug!(destination = %dest.display_name(), bytes = text.len(), "writing output");
        match dest {
            Destination::Stdout => {
                self.stdout.write_all(text.as_bytes()).and_then(|_| self.stdout.flush()).map_err(|e| PipelineError::write("stdout", e))
            }
            Destination::File(path) => {
                let mut f = File::create(path).map_err(|e| PipelineError::write(path.display().to_string(), e))?;
                f.write_all(text.as_bytes()).map_err(|e| PipelineError::write(path.display().to_string(), e))
            }
        }
    }
}
