use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("output directory {0} does not exist, build the site first")]
    MissingOutput(PathBuf),
    #[error("refusing to clean output directory {output}: it overlaps {protected}")]
    UnsafeOutput { output: PathBuf, protected: PathBuf },
    #[error("`{command}` failed: {message}")]
    Git { command: String, message: String },
}

impl ExportError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
