//! Errors raised while training, persisting or loading models

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    /// A persisted artifact is missing, unreadable, corrupt or has the wrong shape
    #[error("model unavailable at {}: {source:#}", path.display())]
    ModelUnavailable {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Dataset generation, fitting or persisting failed
    #[error("model training failed: {0:#}")]
    TrainingFailed(#[source] anyhow::Error),
}

impl ModelError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: anyhow::Error) -> Self {
        ModelError::ModelUnavailable {
            path: path.into(),
            source,
        }
    }
}
