//! Per-OS shim exposing one uniform native file operation set.
//!
//! Exactly one platform module is compiled in; both present the same
//! functions over C stdio streams, so the file state machine and the
//! one-shot helpers stay platform-agnostic. All path-bearing calls route
//! through the path codec.

#[cfg(unix)]
mod posix;
#[cfg(unix)]
pub(crate) use posix::*;

#[cfg(windows)]
mod win;
#[cfg(windows)]
pub(crate) use win::*;

/// Raw C stdio stream. Owned exclusively by one [`NativeFile`] while open.
///
/// [`NativeFile`]: crate::fs::NativeFile
pub(crate) type Handle = *mut libc::FILE;

/// Seek origin for [`seek`]. Absolute positioning uses `Set`; size
/// measurement uses `End`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Whence {
    Set,
    End,
}
