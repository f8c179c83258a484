//! Translation between UTF-8 path strings and the OS-native representation.
//!
//! On POSIX-like systems the native form is a NUL-terminated byte string, so
//! encoding is a pass-through. Windows CRT wide-character entry points take
//! UTF-16, so paths are converted in two passes: the first sizes the buffer,
//! the second fills it, and the terminator is accounted for in both.

#[cfg(unix)]
use std::ffi::{CStr, CString};

#[cfg(windows)]
use crate::error::{Error, ErrorKind};
use crate::error::Result;

/// Maximum native path length in UTF-16 units, terminator included.
#[cfg(windows)]
pub(crate) const MAX_PATH: usize = 260;

#[cfg(unix)]
pub(crate) fn encode(path: &str) -> Result<CString> {
    CString::new(path).map_err(|_| crate::err!("path contains an interior NUL byte: '{}'", path))
}

#[cfg(unix)]
pub(crate) fn decode(native: &CStr) -> String {
    native.to_string_lossy().into_owned()
}

#[cfg(windows)]
pub(crate) fn encode(path: &str) -> Result<Vec<u16>> {
    let units = path.encode_utf16().count();
    if units + 1 > MAX_PATH {
        return Err(Box::new(Error::new(ErrorKind::PathTooLong {
            path: path.to_string(),
            limit: MAX_PATH,
        })));
    }
    let mut wide = Vec::with_capacity(units + 1);
    wide.extend(path.encode_utf16());
    wide.push(0);
    Ok(wide)
}

#[cfg(windows)]
pub(crate) fn decode(native: &[u16]) -> String {
    let end = native.iter().position(|&unit| unit == 0).unwrap_or(native.len());
    String::from_utf16_lossy(&native[..end])
}
