/* # Why nativefs?

nativefs gives a host application real filesystem access through raw native
handles with POSIX file-handle semantics, uniformly across operating
systems. Platform differences in path encoding (UTF-8 vs. UTF-16
filenames), buffering constants, volume enumeration and working-directory
handling are hidden behind one contract, so code above this crate never
branches on the OS.
*/

pub mod error;
pub mod fs;
pub mod tracing;

mod fs_tests;

// Re-export commonly used types for convenience
pub use error::{Error, ErrorKind, Result, ResultExt};
pub use fs::{BufferMode, NativeFile, OpenMode, ReadAmount};
