use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture: {0}")]
    Parse(#[from] serde_json::Error),
}
