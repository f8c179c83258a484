use std::error::Error as StdError;
use std::fmt;

use crate::fs::{BufferMode, OpenMode};

/* # Why a custom error type and not anyhow/eyre/thiserror?

- Better control over error handling
- Callers can pattern match on the exact failure kind
- More transparency into error handling logic
 */

/// Error variants that can occur in nativefs operations.
/// Each variant represents a specific failure with its associated context.
///
/// Variants touching the native layer carry the captured OS error
/// (errno on POSIX, the Win32 last-error on Windows) as `source`.
#[derive(Debug)]
pub enum ErrorKind {
    /// `open` was called on a file that already holds a live handle.
    AlreadyOpen { path: String },

    /// `close` or `seek` was called on a file with no live handle.
    NotOpen { path: String },

    /// The native open call returned no handle.
    OpenFailed {
        path: String,
        mode: OpenMode,
        source: std::io::Error,
    },

    /// A read was attempted on a file not opened for reading.
    NotOpenForRead { path: String },

    /// A write was attempted on a file not opened for writing or appending.
    NotOpenForWrite { path: String },

    /// The native write transferred fewer bytes than requested.
    ShortWrite {
        path: String,
        requested: usize,
        written: usize,
    },

    /// Applying a buffering mode to a live handle failed natively.
    BufferConfigFailed {
        mode: BufferMode,
        size: usize,
        source: std::io::Error,
    },

    /// The path does not fit the platform's native path representation.
    PathTooLong { path: String, limit: usize },

    /// Changing the process working directory failed.
    ChdirFailed {
        path: String,
        source: std::io::Error,
    },

    /// The native unlink/remove call failed.
    RemoveFailed {
        path: String,
        source: std::io::Error,
    },

    /// Catch-all for other errors with a message.
    Message { message: String },
}

/* # Why separate ErrorKind and Error?
This two-layer design provides a clear separation of concerns:
- ErrorKind: structural variants with specific contexts (paths, modes, byte counts)
- Error: wraps ErrorKind with additional runtime context strings

Users can pattern match on ErrorKind for specific handling, while Error
provides ergonomic context attachment for propagation.
*/

/// Error type wrapping [`ErrorKind`] with optional context.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    context: Vec<String>,
}

impl Error {
    /// Creates a new error from an ErrorKind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
        }
    }

    /// Creates a message-only error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Attaches context to an error.
    /// Context is displayed before the error message.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    /// Useful to avoid expensive string construction for successful paths.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Returns a reference to the underlying ErrorKind.
    /// Allows pattern matching on specific error variants.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the innermost error in the chain.
    /// Traverses the error source chain to find the root cause.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::OpenFailed { source, .. }
            | ErrorKind::BufferConfigFailed { source, .. }
            | ErrorKind::ChdirFailed { source, .. }
            | ErrorKind::RemoveFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display context first if present
        for (i, ctx) in self.context.iter().enumerate() {
            if i == 0 {
                write!(f, "{}", ctx)?;
            } else {
                write!(f, ": {}", ctx)?;
            }
        }

        // Add a separator if we have context
        if !self.context.is_empty() {
            write!(f, ": ")?;
        }

        // Display the underlying error kind
        match &self.kind {
            ErrorKind::AlreadyOpen { path } => {
                write!(f, "file '{}' is already open", path)
            }
            ErrorKind::NotOpen { path } => {
                write!(f, "file '{}' is not open", path)
            }
            ErrorKind::OpenFailed { path, mode, source } => {
                write!(f, "could not open '{}' for {}: {}", path, mode, source)
            }
            ErrorKind::NotOpenForRead { path } => {
                write!(f, "file '{}' is not opened for reading", path)
            }
            ErrorKind::NotOpenForWrite { path } => {
                write!(f, "file '{}' is not opened for writing", path)
            }
            ErrorKind::ShortWrite {
                path,
                requested,
                written,
            } => {
                write!(
                    f,
                    "short write to '{}': wrote {} of {} bytes",
                    path, written, requested
                )
            }
            ErrorKind::BufferConfigFailed { mode, size, source } => {
                write!(
                    f,
                    "could not set {} buffering ({} bytes): {}",
                    mode, size, source
                )
            }
            ErrorKind::PathTooLong { path, limit } => {
                write!(
                    f,
                    "path exceeds the platform limit of {} units: '{}'",
                    limit, path
                )
            }
            ErrorKind::ChdirFailed { path, source } => {
                write!(
                    f,
                    "could not change working directory to '{}': {}",
                    path, source
                )
            }
            ErrorKind::RemoveFailed { path, source } => {
                write!(f, "could not remove '{}': {}", path, source)
            }
            ErrorKind::Message { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

/* # Why use Box<Error> in the result type?

Boxing the error reduces the size of the result type, making it more
efficient to return in the common case.
*/

/// Standard result type for nativefs operations.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Builds a boxed message error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::error::Error::message(format!($($arg)*)))
    };
}

/// Extension trait for attaching context to Results.
/// Provides ergonomic error context attachment during error propagation.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    /// Eager evaluation: context is evaluated immediately.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Attaches context using lazy evaluation.
    /// Context is only evaluated if the result is an error.
    /// Prefer this to avoid expensive string formatting in the success path.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}
