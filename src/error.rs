use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for annix operations
#[derive(Error, Debug)]
pub enum AnnixError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("System rebuild failed: {0}")]
    Apply(#[from] ApplyError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Package search failed: {0}")]
    Search(String),

    #[error("{path:?} already exists")]
    AlreadyExists { path: PathBuf },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Which of the two single-instance control markers was duplicated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Hash,
    AddHere,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Hash => f.write_str("hash marker (#@#)"),
            Marker::AddHere => f.write_str("addhere marker (#@+ / #@+^)"),
        }
    }
}

/// Parse-related errors. Everything else found while parsing is a
/// diagnostic, not an error.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Multiple {marker} found at lines {first} and {second}")]
    DuplicateMarker {
        marker: Marker,
        first: usize,
        second: usize,
    },
}

/// Failures of the external rebuild step
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("No rebuild command configured")]
    NoCommand,

    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: String },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse {path:?}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    UnknownKey { key: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("No configuration directory available on this platform")]
    NoConfigDir,
}

/// Result type alias for annix operations
pub type AnnixResult<T> = Result<T, AnnixError>;

/// Helper trait for attaching context to IO failures
pub trait ErrorContext<T> {
    fn context<C>(self, context: C) -> AnnixResult<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    fn with_context<C, F>(self, f: F) -> AnnixResult<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> ErrorContext<T> for Result<T, io::Error> {
    fn context<C>(self, context: C) -> AnnixResult<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| AnnixError::Io(io::Error::new(e.kind(), format!("{}: {}", context, e))))
    }

    fn with_context<C, F>(self, f: F) -> AnnixResult<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| AnnixError::Io(io::Error::new(e.kind(), format!("{}: {}", f(), e))))
    }
}
