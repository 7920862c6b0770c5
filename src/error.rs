//! Error types for the preference persistence boundary.
//!
//! Nothing in the spelling engine can fail. Only the durable store reports
//! errors, and the preference store downgrades those to log lines.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("failed to access preference file: {path}")]
    #[diagnostic(
        code(soup::store::io),
        help("Check that the directory exists and you have read/write permissions.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("preference file is not a JSON object: {path}")]
    #[diagnostic(
        code(soup::store::corrupt),
        help("Delete or fix the file; defaults will be used until it is rewritten.")
    )]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize preference \"{key}\"")]
    #[diagnostic(code(soup::store::serialize))]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("preference store is unavailable: {reason}")]
    #[diagnostic(code(soup::store::unavailable))]
    Unavailable { reason: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
