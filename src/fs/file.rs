use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};

use super::native::{self, Handle, Whence};

/// State of a [`NativeFile`]. A file is re-openable indefinitely; `Closed`
/// is the initial state, not a terminal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    #[default]
    Closed,
    Read,
    Write,
    Append,
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpenMode::Closed => "closed",
            OpenMode::Read => "read",
            OpenMode::Write => "write",
            OpenMode::Append => "append",
        };
        write!(f, "{}", name)
    }
}

/// Buffering policy applied to the native stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferMode {
    #[default]
    None,
    Line,
    Full,
}

impl fmt::Display for BufferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferMode::None => "none",
            BufferMode::Line => "line",
            BufferMode::Full => "full",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for BufferMode {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(BufferMode::None),
            "line" => Ok(BufferMode::Line),
            "full" => Ok(BufferMode::Full),
            other => Err(crate::err!("unknown buffer mode '{}'", other)),
        }
    }
}

/// How much a read transfers: everything from the current position to the
/// end of file, or at most the given byte count.
#[derive(Debug, Clone, Copy)]
pub enum ReadAmount {
    All,
    Exact(u64),
}

/* # Why track mode and handle separately?

The handle is present exactly when the mode is not Closed; keeping both lets
callers observe the state machine through `mode()` without exposing the raw
stream, and lets Drop take the handle out while leaving the name intact for
logging.
*/

/// One named on-disk file and, while open, one exclusively-owned native
/// stream.
///
/// All mutation goes through these methods; the buffer configuration is
/// remembered across open/close cycles and reapplied to every fresh handle.
/// `close()` is the primary release path. Dropping a still-open file closes
/// the handle as a safety net.
///
/// A `NativeFile` is not thread-safe; concurrent use of one instance must be
/// serialized by the caller. Two instances naming the same path are
/// independent and left to the OS to reconcile.
#[derive(Debug)]
pub struct NativeFile {
    name: String,
    mode: OpenMode,
    handle: Option<Handle>,
    buffer_mode: BufferMode,
    buffer_size: usize,
}

impl NativeFile {
    /// Creates a closed file for the given path. Touches nothing on disk.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: OpenMode::Closed,
            handle: None,
            buffer_mode: BufferMode::None,
            buffer_size: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// The stored buffer configuration (mode, size).
    pub fn buffer(&self) -> (BufferMode, usize) {
        (self.buffer_mode, self.buffer_size)
    }

    pub fn is_open(&self) -> bool {
        self.mode != OpenMode::Closed
    }

    /// Opens the file in the requested mode.
    ///
    /// Legal only from the closed state; opening an already-open file fails
    /// with `AlreadyOpen` and leaves the live handle untouched. The stored
    /// buffer configuration is applied to the fresh handle; if the native
    /// layer refuses it, the configuration degrades to unbuffered and the
    /// open still succeeds.
    #[instrument(skip(self), fields(path = %self.name))]
    pub fn open(&mut self, mode: OpenMode) -> Result<()> {
        if self.mode != OpenMode::Closed {
            return Err(Box::new(Error::new(ErrorKind::AlreadyOpen {
                path: self.name.clone(),
            })));
        }
        let handle = native::open(&self.name, mode)?;
        if native::set_buffer(handle, self.buffer_mode, self.buffer_size).is_err() {
            debug!(
                mode = %self.buffer_mode,
                size = self.buffer_size,
                "buffer configuration rejected by the native layer, degrading to unbuffered"
            );
            self.buffer_mode = BufferMode::None;
            self.buffer_size = 0;
        }
        self.handle = Some(handle);
        self.mode = mode;
        Ok(())
    }

    /// Releases the native handle and returns to the closed state.
    ///
    /// Closing an already-closed file is a reported error, not a crash.
    #[instrument(skip(self), fields(path = %self.name))]
    pub fn close(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Err(Box::new(Error::new(ErrorKind::NotOpen {
                path: self.name.clone(),
            })));
        };
        // The stream is gone even when fclose reports a flush failure, so
        // the state transition happens unconditionally.
        self.mode = OpenMode::Closed;
        native::close(handle)
            .map_err(|e| crate::err!("error closing '{}': {}", self.name, e))?;
        Ok(())
    }

    /// Stores a buffer configuration and, if a handle is live, applies it
    /// immediately.
    ///
    /// The configuration is stored regardless of open state and reapplied on
    /// every subsequent open. A native refusal on a live handle is reported
    /// as `BufferConfigFailed`, but the intent is kept for the next open and
    /// the handle remains usable.
    pub fn set_buffer(&mut self, mode: BufferMode, size: usize) -> Result<()> {
        let applied = match self.handle {
            Some(handle) => native::set_buffer(handle, mode, size),
            None => Ok(()),
        };
        self.buffer_mode = mode;
        self.buffer_size = size;
        applied.map_err(|source| {
            Box::new(Error::new(ErrorKind::BufferConfigFailed { mode, size, source }))
        })?;
        Ok(())
    }

    /// Best-effort file size in bytes.
    ///
    /// When closed this performs a transient open/measure/close that leaves
    /// the observable state untouched; when open it seeks to the end and
    /// restores the prior position. A file that cannot be opened reads as 0,
    /// deliberately indistinguishable from an empty file, since no portable
    /// stat facility is used here.
    pub fn size(&mut self) -> u64 {
        match self.handle {
            Some(handle) => {
                let position = native::tell(handle).max(0);
                if native::seek(handle, 0, Whence::End).is_err() {
                    return 0;
                }
                let size = native::tell(handle).max(0);
                let _ = native::seek(handle, position, Whence::Set);
                size as u64
            }
            None => {
                let Ok(handle) = native::open(&self.name, OpenMode::Read) else {
                    return 0;
                };
                let size = match native::seek(handle, 0, Whence::End) {
                    Ok(()) => native::tell(handle).max(0),
                    Err(_) => 0,
                };
                let _ = native::close(handle);
                size as u64
            }
        }
    }

    /// Reads up to the requested amount from the current position.
    ///
    /// The transfer length is clamped to the bytes remaining before the end
    /// of file; `ReadAmount::All` reads exactly that remainder. A request at
    /// or past the end yields an empty buffer, not an error. Returns the
    /// bytes together with the count actually transferred.
    #[instrument(skip(self), fields(path = %self.name))]
    pub fn read(&mut self, amount: ReadAmount) -> Result<(Vec<u8>, u64)> {
        if self.mode != OpenMode::Read {
            return Err(Box::new(Error::new(ErrorKind::NotOpenForRead {
                path: self.name.clone(),
            })));
        }
        let Some(handle) = self.handle else {
            return Err(Box::new(Error::new(ErrorKind::NotOpenForRead {
                path: self.name.clone(),
            })));
        };
        let size = self.size();
        let position = native::tell(handle).max(0) as u64;
        let available = size.saturating_sub(position);
        let wanted = match amount {
            ReadAmount::All => available,
            ReadAmount::Exact(count) => count.min(available),
        };
        if wanted == 0 {
            return Ok((Vec::new(), 0));
        }
        let mut buf = vec![0u8; wanted as usize];
        let transferred = native::read(handle, &mut buf);
        buf.truncate(transferred);
        debug!(requested = wanted, transferred, "read from native handle");
        Ok((buf, transferred as u64))
    }

    /// Reads like [`read`](Self::read) and decodes the bytes as (lossy)
    /// UTF-8 text.
    pub fn read_to_string(&mut self, amount: ReadAmount) -> Result<(String, u64)> {
        let (bytes, transferred) = self.read(amount)?;
        Ok((String::from_utf8_lossy(&bytes).into_owned(), transferred))
    }

    /// Writes the whole slice to the current position.
    pub fn write(&mut self, data: &[u8]) -> Result<u64> {
        self.write_len(data, data.len())
    }

    /// Writes a prefix of `data`, clamped to its length.
    ///
    /// Fails with `NotOpenForWrite` unless the file is open for writing or
    /// appending, and with `ShortWrite` if the native layer transfers fewer
    /// bytes than requested.
    #[instrument(skip(self, data), fields(path = %self.name))]
    pub fn write_len(&mut self, data: &[u8], len: usize) -> Result<u64> {
        if !matches!(self.mode, OpenMode::Write | OpenMode::Append) {
            return Err(Box::new(Error::new(ErrorKind::NotOpenForWrite {
                path: self.name.clone(),
            })));
        }
        let Some(handle) = self.handle else {
            return Err(Box::new(Error::new(ErrorKind::NotOpenForWrite {
                path: self.name.clone(),
            })));
        };
        let len = len.min(data.len());
        if len == 0 {
            return Ok(0);
        }
        let written = native::write(handle, &data[..len]);
        if written < len {
            return Err(Box::new(Error::new(ErrorKind::ShortWrite {
                path: self.name.clone(),
                requested: len,
                written,
            })));
        }
        debug!(written, "wrote to native handle");
        Ok(written as u64)
    }

    /// Moves the read/write position to an absolute offset from the start.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        let Some(handle) = self.handle else {
            return Err(Box::new(Error::new(ErrorKind::NotOpen {
                path: self.name.clone(),
            })));
        };
        native::seek(handle, position as i64, Whence::Set)
            .map_err(|e| crate::err!("could not seek to {} in '{}': {}", position, self.name, e))?;
        Ok(())
    }

    /// Current absolute position, or −1 when closed.
    pub fn tell(&self) -> i64 {
        match self.handle {
            Some(handle) => native::tell(handle),
            None => -1,
        }
    }

    /// Forces buffered writes down to the OS. No-op when closed.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(handle) = self.handle {
            native::flush(handle)
                .map_err(|e| crate::err!("could not flush '{}': {}", self.name, e))?;
        }
        Ok(())
    }

    /// True only while open with the native end-of-file indicator set.
    pub fn is_eof(&self) -> bool {
        match self.handle {
            Some(handle) => native::eof(handle),
            None => false,
        }
    }
}

impl Drop for NativeFile {
    fn drop(&mut self) {
        // Deterministic release on every exit path of the owning scope;
        // errors here have nowhere to go and are logged only.
        if let Some(handle) = self.handle.take() {
            debug!(path = %self.name, "closing still-open handle on drop");
            self.mode = OpenMode::Closed;
            let _ = native::close(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_file_is_closed() {
        let file = NativeFile::new("never-touched.txt");
        assert_eq!(file.mode(), OpenMode::Closed);
        assert!(!file.is_open());
        assert_eq!(file.tell(), -1);
        assert!(!file.is_eof());
    }

    #[test]
    fn test_close_without_open_fails() {
        let mut file = NativeFile::new("never-touched.txt");
        let err = file.close().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotOpen { .. }));
    }

    #[test]
    fn test_seek_while_closed_fails() {
        let mut file = NativeFile::new("never-touched.txt");
        let err = file.seek(10).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotOpen { .. }));
    }

    #[test]
    fn test_flush_while_closed_is_noop() {
        let mut file = NativeFile::new("never-touched.txt");
        assert!(file.flush().is_ok());
    }

    #[test]
    fn test_set_buffer_stores_while_closed() {
        let mut file = NativeFile::new("never-touched.txt");
        file.set_buffer(BufferMode::Line, 256).unwrap();
        assert_eq!(file.buffer(), (BufferMode::Line, 256));
    }

    #[test]
    fn test_buffer_mode_parsing() {
        assert_eq!("none".parse::<BufferMode>().unwrap(), BufferMode::None);
        assert_eq!("line".parse::<BufferMode>().unwrap(), BufferMode::Line);
        assert_eq!("full".parse::<BufferMode>().unwrap(), BufferMode::Full);
        assert!("bogus".parse::<BufferMode>().is_err());
    }

    #[test]
    fn test_bogus_buffer_mode_leaves_configuration_unchanged() {
        let mut file = NativeFile::new("never-touched.txt");
        file.set_buffer(BufferMode::Full, 1024).unwrap();
        let parsed = "bogus".parse::<BufferMode>();
        assert!(parsed.is_err());
        assert_eq!(file.buffer(), (BufferMode::Full, 1024));
    }

    #[test]
    fn test_size_of_missing_file_is_zero() {
        let mut file = NativeFile::new("definitely/not/a/real/file.bin");
        assert_eq!(file.size(), 0);
        assert_eq!(file.mode(), OpenMode::Closed);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(OpenMode::Read.to_string(), "read");
        assert_eq!(OpenMode::Append.to_string(), "append");
        assert_eq!(BufferMode::Full.to_string(), "full");
    }
}
