/// Crate-level error types for cfpath diagnostics.
use std::path::PathBuf;

/// Errors that escape a cfpath operation. Expected absence (a candidate that
/// does not exist, a link that does not resolve) is never one of these; only
/// listing and configuration failures are.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported as cfpath::Error")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An explicitly requested config file does not exist on disk.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing config file.
        path: PathBuf,
    },

    /// A mapping with this logical path is already configured.
    #[error("mapping already exists: `{logical_path}`")]
    DuplicateMapping {
        /// Logical path that is already taken.
        logical_path: String,
    },

    /// A mapping was rejected before being written to config.
    #[error("invalid mapping `{logical_path}`: {reason}")]
    InvalidMapping {
        /// Logical path of the rejected mapping.
        logical_path: String,
        /// Why the mapping was rejected.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of command output failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A directory exists but could not be listed.
    #[error("cannot list {}: {source}", path.display())]
    ListingFailed {
        /// Directory that failed to list.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// A listing was requested for something that is not a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory {
        /// Path that was expected to be a directory.
        path: PathBuf,
    },

    /// A config file could not be parsed for editing.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No configured mapping has this logical path.
    #[error("unknown mapping: `{logical_path}`")]
    UnknownMapping {
        /// Logical path that was not found.
        logical_path: String,
    },
}
