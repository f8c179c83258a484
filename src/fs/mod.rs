//! Native file access behind one behavioral contract.
//!
//! Layering, leaves first: [`codec`] translates UTF-8 paths to the OS
//! representation, [`native`] maps one uniform operation set onto the
//! platform's C runtime, [`file::NativeFile`] owns a handle and enforces the
//! open/read/write state machine, and [`ops`] composes one-shot lifecycles
//! on top. Everything is synchronous; every call blocks until the native
//! call returns.

mod codec;
mod file;
mod native;
pub mod ops;

pub use file::{BufferMode, NativeFile, OpenMode, ReadAmount};
pub use ops::FileInfo;
