//! Error taxonomy of the analysis core.
//!
//! Every variant is fatal for the run: a silently incomplete key set would
//! produce wrong missing/unused reports, so nothing is retried or skipped.

use std::io;

use thiserror::Error;

pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The file extension is not in the recognized set.
    #[error("Unknown extension: {extension} ({file})")]
    UnknownExtension { extension: String, file: String },

    /// Malformed source or catalog document.
    #[error("Failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    /// A catalog leaf that is neither a string nor a nested object.
    #[error("Unknown value type: {found} (for {key} in {file})")]
    InvalidCatalogValue {
        file: String,
        key: String,
        found: &'static str,
    },

    /// The file-list formatter was called without files.
    #[error("Unexpected empty file list")]
    EmptyFileList,

    #[error("Failed to access {file}")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize {file}: {message}")]
    Serialize { file: String, message: String },
}

impl AnalyzerError {
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn io(file: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            file: file.into(),
            source,
        }
    }
}
