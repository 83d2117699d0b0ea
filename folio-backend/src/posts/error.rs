use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a post file into a [`super::Post`]
#[derive(Debug, Error)]
pub enum PostError {
    #[error("post file not found: {0}")]
    NotFound(PathBuf),

    #[error("error reading {path}: {source}")]
    Content {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message} in {slug}")]
    Metadata { slug: String, message: String },

    #[error("error parsing YAML in {slug}: {source}")]
    Yaml {
        slug: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("error rendering markdown in {slug}: {message}")]
    Render { slug: String, message: String },
}

impl PostError {
    pub fn metadata(slug: &str, message: impl Into<String>) -> Self {
        PostError::Metadata {
            slug: slug.to_string(),
            message: message.into(),
        }
    }

    /// Short machine-friendly kind, used in load reports
    pub fn kind(&self) -> &'static str {
        match self {
            PostError::NotFound(_) => "not_found",
            PostError::Content { .. } => "content",
            PostError::Metadata { .. } => "metadata",
            PostError::Yaml { .. } => "yaml",
            PostError::Render { .. } => "render",
        }
    }
}
