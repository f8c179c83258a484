//! Windows adapter: wide-character CRT stdio plus Win32 volume enumeration.

use std::io;
use std::ptr;

use libc::{FILE, c_char, c_int, c_void};
use tracing::debug;
use windows_sys::Win32::Storage::FileSystem::GetLogicalDrives;

use crate::error::{Error, ErrorKind, Result};
use crate::fs::codec;
use crate::fs::file::{BufferMode, OpenMode};

use super::{Handle, Whence};

// Wide-character CRT entry points. The narrow `fopen` family would route
// filenames through the active ANSI code page and mangle non-ASCII paths,
// so every path-bearing call uses the `_w` variant with UTF-16 arguments.
unsafe extern "C" {
    fn _wfopen(filename: *const u16, mode: *const u16) -> *mut FILE;
    fn fclose(stream: *mut FILE) -> c_int;
    fn fread(buffer: *mut c_void, size: usize, count: usize, stream: *mut FILE) -> usize;
    fn fwrite(buffer: *const c_void, size: usize, count: usize, stream: *mut FILE) -> usize;
    fn _fseeki64(stream: *mut FILE, offset: i64, origin: c_int) -> c_int;
    fn _ftelli64(stream: *mut FILE) -> i64;
    fn fflush(stream: *mut FILE) -> c_int;
    fn feof(stream: *mut FILE) -> c_int;
    fn setvbuf(stream: *mut FILE, buffer: *mut c_char, mode: c_int, size: usize) -> c_int;
    fn _wgetcwd(buffer: *mut u16, maxlen: c_int) -> *mut u16;
    fn _wchdir(dirname: *const u16) -> c_int;
    fn _wremove(path: *const u16) -> c_int;
}

// Values from <corecrt_stdio.h> (universal CRT).
const SEEK_SET: c_int = 0;
const SEEK_END: c_int = 2;
const IOFBF: c_int = 0x0000;
const IONBF: c_int = 0x0004;
const IOLBF: c_int = 0x0040;

fn mode_wstr(mode: OpenMode) -> Result<&'static [u16]> {
    const READ: &[u16] = &[b'r' as u16, b'b' as u16, 0];
    const WRITE: &[u16] = &[b'w' as u16, b'b' as u16, 0];
    const APPEND: &[u16] = &[b'a' as u16, b'b' as u16, 0];
    match mode {
        OpenMode::Read => Ok(READ),
        OpenMode::Write => Ok(WRITE),
        OpenMode::Append => Ok(APPEND),
        OpenMode::Closed => Err(crate::err!("open requires a read, write or append mode")),
    }
}

pub(crate) fn open(path: &str, mode: OpenMode) -> Result<Handle> {
    let native_path = codec::encode(path)?;
    let native_mode = mode_wstr(mode)?;
    let handle = unsafe { _wfopen(native_path.as_ptr(), native_mode.as_ptr()) };
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
    if unsafe { fclose(handle) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub(crate) fn read(handle: Handle, buf: &mut [u8]) -> usize {
    unsafe { fread(buf.as_mut_ptr().cast(), 1, buf.len(), handle) }
}

pub(crate) fn write(handle: Handle, buf: &[u8]) -> usize {
    unsafe { fwrite(buf.as_ptr().cast(), 1, buf.len(), handle) }
}

pub(crate) fn seek(handle: Handle, offset: i64, whence: Whence) -> io::Result<()> {
    let origin = match whence {
        Whence::Set => SEEK_SET,
        Whence::End => SEEK_END,
    };
    if unsafe { _fseeki64(handle, offset, origin) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub(crate) fn tell(handle: Handle) -> i64 {
    unsafe { _ftelli64(handle) }
}

pub(crate) fn flush(handle: Handle) -> io::Result<()> {
    if unsafe { fflush(handle) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub(crate) fn eof(handle: Handle) -> bool {
    unsafe { feof(handle) != 0 }
}

pub(crate) fn set_buffer(handle: Handle, mode: BufferMode, size: usize) -> io::Result<()> {
    let native_mode = match mode {
        BufferMode::None => IONBF,
        BufferMode::Line => IOLBF,
        BufferMode::Full => IOFBF,
    };
    if unsafe { setvbuf(handle, ptr::null_mut(), native_mode, size) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub(crate) fn cwd() -> Result<String> {
    let mut buf = vec![0u16; codec::MAX_PATH];
    let result = unsafe { _wgetcwd(buf.as_mut_ptr(), buf.len() as c_int) };
    if result.is_null() {
        return Err(crate::err!(
            "could not read the working directory: {}",
            io::Error::last_os_error()
        ));
    }
    Ok(codec::decode(&buf))
}

pub(crate) fn set_cwd(path: &str) -> Result<()> {
    let native_path = codec::encode(path)?;
    if unsafe { _wchdir(native_path.as_ptr()) } != 0 {
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
    if unsafe { _wremove(native_path.as_ptr()) } != 0 {
        return Err(Box::new(Error::new(ErrorKind::RemoveFailed {
            path: path.to_string(),
            source: io::Error::last_os_error(),
        })));
    }
    Ok(())
}

/// One entry per drive letter present in the logical-drive bitmask,
/// rendered as `"<Letter>:/"`.
pub(crate) fn volumes() -> Vec<String> {
    let mask = unsafe { GetLogicalDrives() };
    let mut drives = Vec::new();
    for bit in 0u8..26 {
        if mask & (1u32 << bit) != 0 {
            drives.push(format!("{}:/", (b'A' + bit) as char));
        }
    }
    drives
}
