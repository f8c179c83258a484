//! Stateless one-shot filesystem helpers.
//!
//! Each path-based helper composes a single [`NativeFile`] lifecycle:
//! open, transfer, close. Working-directory and volume operations pass
//! straight through to the native adapter; the working directory is
//! process-global state, so changing it affects all subsequent
//! relative-path resolution everywhere in the process.

use tracing::instrument;

use crate::error::Result;

use super::file::{NativeFile, OpenMode, ReadAmount};
use super::native;

/// Opens `path` for reading, reads the requested amount and closes it.
#[instrument]
pub fn read(path: &str, amount: ReadAmount) -> Result<(Vec<u8>, u64)> {
    let mut file = NativeFile::new(path);
    file.open(OpenMode::Read)?;
    let result = file.read(amount)?;
    file.close()?;
    Ok(result)
}

/// Reads the whole file and decodes it as (lossy) UTF-8 text.
pub fn read_to_string(path: &str) -> Result<String> {
    let mut file = NativeFile::new(path);
    file.open(OpenMode::Read)?;
    let (text, _) = file.read_to_string(ReadAmount::All)?;
    file.close()?;
    Ok(text)
}

/// Writes `data` to `path`, truncating any existing content.
#[instrument(skip(data))]
pub fn write(path: &str, data: &[u8]) -> Result<u64> {
    let mut file = NativeFile::new(path);
    file.open(OpenMode::Write)?;
    let written = file.write(data)?;
    file.close()?;
    Ok(written)
}

/// Appends `data` to `path`, extending any existing content.
#[instrument(skip(data))]
pub fn append(path: &str, data: &[u8]) -> Result<u64> {
    let mut file = NativeFile::new(path);
    file.open(OpenMode::Append)?;
    let written = file.write(data)?;
    file.close()?;
    Ok(written)
}

/// Removes the file at `path`.
#[instrument]
pub fn remove(path: &str) -> Result<()> {
    native::remove(path)
}

/// The current process working directory as a UTF-8 string.
pub fn working_directory() -> Result<String> {
    native::cwd()
}

/// Changes the process working directory.
#[instrument]
pub fn set_working_directory(path: &str) -> Result<()> {
    native::set_cwd(path)
}

/// All logical volumes: one root on unified-tree systems, one entry per
/// drive letter on multi-root systems.
pub fn volume_list() -> Result<Vec<String>> {
    Ok(native::volumes())
}

/// Metadata returned by [`info`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub size: u64,
    pub is_directory: bool,
}

// The remaining operations are integration points for a directory and
// metadata layer built on top of this crate. This layer only moves bytes
// through native handles and does not implement traversal itself.

/// Hook point for directory listing. Always empty here.
pub fn directory_items(_dir: &str) -> Result<Vec<String>> {
    Ok(Vec::new())
}

/// Hook point for metadata queries. Always reports absence here.
pub fn info(_path: &str) -> Result<Option<FileInfo>> {
    Ok(None)
}

/// Hook point for directory creation.
pub fn create_directory(path: &str) -> Result<()> {
    Err(crate::err!(
        "directory creation is not provided by the native I/O layer: '{}'",
        path
    ))
}

/// Hook point for mounting a virtual overlay. No overlay exists here.
pub fn mount(_path: &str) -> bool {
    false
}

/// Hook point for unmounting a virtual overlay. No overlay exists here.
pub fn unmount(_path: &str) -> bool {
    false
}
