//! Error handling for the kiln application.
//! Defines the error types and result alias used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for kiln operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or unterminated block markup, detected at compile time
    #[error("template syntax error: {0}")]
    TemplateSyntax(String),

    /// A template or expression referenced a key absent from the
    /// configuration mapping
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    /// A template failed to compile or render for a specific destination
    #[error("failed to render '{path}': {source}")]
    Render {
        path: String,
        #[source]
        source: Box<Error>,
    },

    /// The destination tree disagrees with what materialization expects
    /// (a file where a directory is needed, or vice versa)
    #[error("destination conflict at '{path}': {reason}")]
    DestinationConflict { path: String, reason: String },

    /// The source template tree cannot be read
    #[error("template source unavailable: {0}")]
    SourceUnavailable(String),

    /// Invalid answers or configuration supplied by the caller
    #[error("configuration error: {0}")]
    Config(String),

    /// Represents errors raised while initializing the git repository
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

/// Convenience type alias for Results with kiln's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{}", err);
    let mut cause = std::error::Error::source(&err);
    while let Some(err) = cause {
        eprintln!("  caused by: {}", err);
        cause = err.source();
    }
    std::process::exit(1);
}
