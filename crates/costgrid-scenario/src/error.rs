use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to parse manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
