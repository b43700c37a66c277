use deckhand_render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("redacting command result: {0:#}")]
    Redaction(anyhow::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("writing output to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("writing command result to result store: {0:#}")]
    Persistence(anyhow::Error),
}

impl PipelineError {
    pub fn write(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Write { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Combine the outcomes of the render/write phase and the store write.
/// A render failure always wins; a store failure only surfaces when rendering succeeded.
pub fn resolve_outcome(render: Result<()>, store: Result<()>) -> Result<()> {
    render?;
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_err() -> PipelineError { PipelineError::Render(RenderError::InvalidFormat("json".into())) }
    fn store_err() -> PipelineError { PipelineError::Persistence(anyhow::anyhow!("db locked")) }

    #[test]
    fn both_ok() {
        assert!(resolve_outcome(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn only_store_failed() {
        assert!(matches!(resolve_outcome(Ok(()), Err(store_err())), Err(PipelineError::Persistence(_))));
    }

    #[test]
    fn only_render_failed() {
        assert!(matches!(resolve_outcome(Err(render_err()), Ok(())), Err(PipelineError::Render(_))));
    }

    #[test]
    fn render_failure_masks_store_failure() {
        assert!(matches!(resolve_outcome(Err(render_err()), Err(store_err())), Err(PipelineError::Render(_))));
    }

    #[test]
    fn messages_name_the_stage() {
        assert_eq!(store_err().to_string(), "writing command result to result store: db locked");
        let w = PipelineError::write("/nope/out.yaml", std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert_eq!(w.to_string(), "writing output to /nope/out.yaml: missing");
    }
}
