//! POSIX adapter: C stdio through the `libc` crate.

use std::ffi::CStr;
use std::io;
use std::ptr;

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::fs::codec;
use crate::fs::file::{BufferMode, OpenMode};

use super::{Handle, Whence};

fn mode_cstr(mode: OpenMode) -> Result<&'static CStr> {
    // Binary variants throughout; translation modes only exist on Windows
    // but staying explicit keeps both adapters byte-identical in behavior.
    match mode {
        OpenMode::Read => Ok(c"rb"),
        OpenMode::Write => Ok(c"wb"),
        OpenMode::Append => Ok(c"ab"),
        OpenMode::Closed => Err(crate::err!("open requires a read, write or append mode")),
    }
}

pub(crate) fn open(path: &str, mode: OpenMode) -> Result<Handle> {
    let native_path = codec::encode(path)?;
    let native_mode = mode_cstr(mode)?;
    let handle = unsafe { libc::fopen(native_path.as_ptr(), native_mode.as_ptr()) };
    if handle.is_null() {
        return Err(Box::new(Error::new(ErrorKind::OpenFailed {
            path: path.to_string(),
            mode,
            source: io::Error::last_os_error(),
        })));
    }
    debug!(path, %mode, "opened native handle");
    Ok(handle)
}

pub(crate) fn close(handle: Handle) -> io::Result<()> {
    if unsafe { libc::fclose(handle) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub(crate) fn read(handle: Handle, buf: &mut [u8]) -> usize {
    unsafe { libc::fread(buf.as_mut_ptr().cast(), 1, buf.len(), handle) }
}

pub(crate) fn write(handle: Handle, buf: &[u8]) -> usize {
    unsafe { libc::fwrite(buf.as_ptr().cast(), 1, buf.len(), handle) }
}

pub(crate) fn seek(handle: Handle, offset: i64, whence: Whence) -> io::Result<()> {
    let whence = match whence {
        Whence::Set => libc::SEEK_SET,
        Whence::End => libc::SEEK_END,
    };
    if unsafe { libc::fseeko(handle, offset as libc::off_t, whence) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub(crate) fn tell(handle: Handle) -> i64 {
    unsafe { libc::ftello(handle) as i64 }
}

pub(crate) fn flush(handle: Handle) -> io::Result<()> {
    if unsafe { libc::fflush(handle) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub(crate) fn eof(handle: Handle) -> bool {
    unsafe { libc::feof(handle) != 0 }
}

pub(crate) fn set_buffer(handle: Handle, mode: BufferMode, size: usize) -> io::Result<()> {
    // The integer values come from the platform libc headers, not from
    // hard-coded numbers; they differ between OS flavors.
    let native_mode = match mode {
        BufferMode::None => libc::_IONBF,
        BufferMode::Line => libc::_IOLBF,
        BufferMode::Full => libc::_IOFBF,
    };
    if unsafe { libc::setvbuf(handle, ptr::null_mut(), native_mode, size) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub(crate) fn cwd() -> Result<String> {
    let mut buf = vec![0u8; libc::PATH_MAX as usize];
    let result = unsafe { libc::getcwd(buf.as_mut_ptr().cast(), buf.len()) };
    if result.is_null() {
        return Err(crate::err!(
            "could not read the working directory: {}",
            io::Error::last_os_error()
        ));
    }
    let native = unsafe { CStr::from_ptr(buf.as_ptr().cast()) };
    Ok(codec::decode(native))
}

pub(crate) fn set_cwd(path: &str) -> Result<()> {
    let native_path = codec::encode(path)?;
    if unsafe { libc::chdir(native_path.as_ptr()) } != 0 {
        return Err(Box::new(Error::new(ErrorKind::ChdirFailed {
            path: path.to_string(),
            source: io::Error::last_os_error(),
        })));
    }
    debug!(path, "changed working directory");
    Ok(())
}

pub(crate) fn remove(path: &str) -> Result<()> {
    let native_path = codec::encode(path)?;
    if unsafe { libc::remove(native_path.as_ptr()) } != 0 {
        return Err(Box::new(Error::new(ErrorKind::RemoveFailed {
            path: path.to_string(),
            source: io::Error::last_os_error(),
        })));
    }
    Ok(())
}

/// The unified tree has exactly one mountable root.
pub(crate) fn volumes() -> Vec<String> {
    vec!["/".to_string()]
}
