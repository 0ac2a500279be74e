//! Error types for the asset pipeline.
//!
//! Library code returns [`AssetError`]; the CLI wraps it in `anyhow` with
//! additional context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AssetError> = std::result::Result<T, E>;

/// Errors raised while resolving components or building resources.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no bower.json or package.json found at `{}`", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("malformed manifest `{}`", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("main file `{}` is missing", path.display())]
    MissingMainFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to minify `{file}`: {message}")]
    Minify { file: String, message: String },

    #[error("failed to write `{}`", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid glob pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("resource `{0}` was built before it was selected")]
    NotSelected(String),

    #[error("more than one resource writes `{0}`")]
    DuplicateOutput(String),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = AssetError::ManifestNotFound(PathBuf::from("/tmp/lib"));
        assert!(err.to_string().contains("/tmp/lib"));

        let err = AssetError::MissingMainFile {
            path: PathBuf::from("lib/dist/lib.js"),
            source: io::Error::new(ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("lib/dist/lib.js"));
        assert!(std::error::Error::source(&err).is_some());

        let err = AssetError::NotSelected("app.min.js".into());
        assert!(err.to_string().contains("app.min.js"));
    }
}
