//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for sigsearch application edges.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods at the CLI, config and server layers.
pub type Result<T> = anyhow::Result<T>;

/// Failure to parse a type signature.
///
/// Never surfaced to users: [`crate::signature::parse`] degrades to a fallback
/// variable holding the raw text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at byte {position}")]
    UnexpectedChar { ch: char, position: usize },
    #[error("unexpected token '{found}' at byte {position}")]
    UnexpectedToken { found: String, position: usize },
    #[error("unexpected end of signature")]
    UnexpectedEnd,
    #[error("empty signature")]
    Empty,
    #[error("signature nests deeper than {limit} brackets")]
    TooDeep { limit: usize },
}

/// A directive-listed name has no matching entry.
///
/// The exported-symbol table and the documented list have diverged upstream, so the
/// module cannot be indexed. Other modules of the same package are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("'@docs' lists '{name}' but there is no such entry")]
    UnknownEntry { name: String },
}

/// Malformed `owner/project/version` package identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid package id '{input}': expected owner/project/version")]
pub struct PackageIdError {
    pub input: String,
}

/// Error returned when loading a local documentation dump fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Documentation file not found at the expected path.
    #[error("documentation not found for '{package}' at {}", path.display())]
    NotFound { package: String, path: PathBuf },
    /// The documentation file exists but could not be read.
    #[error("failed to read docs for '{package}' at {}", path.display())]
    Io {
        package: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to read or decode the documentation file.
    #[error("failed to load docs for '{package}': {error}")]
    Malformed { package: String, error: String },
}
