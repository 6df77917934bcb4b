// ── Shared Windows directory ──────────────────────────────────────────────────
//
// Resolves the system-shared Windows installation directory.  On a terminal
// server that is the shared directory rather than a per-session one, which is
// why the query goes through GetSystemWindowsDirectoryW and not
// GetWindowsDirectoryW.
//
// Win32 FFI module; every `unsafe` block MUST carry a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use std::path::PathBuf;

use windows::Win32::System::SystemInformation::GetSystemWindowsDirectoryW;

use crate::error::{last_error, Result, WasherError};

/// Absolute path of the shared Windows installation directory.
///
/// Two queries: a zero-length probe for the required buffer length, then the
/// real read into an exactly-sized buffer.  A written length that does not
/// match the probe means the directory changed between the calls; that
/// surfaces as [`WasherError::Inconsistent`] even though the second call
/// itself "succeeded", so callers never see a half-trustworthy path.
pub fn windows_directory() -> Result<PathBuf> {
    // SAFETY: a None buffer is the documented probe form; the return value
    // is the required length in UTF-16 units including the terminator.
    let required = unsafe { GetSystemWindowsDirectoryW(None) };
    if required == 0 {
        return Err(last_error("GetSystemWindowsDirectoryW"));
    }

    let mut buf = vec![0u16; required as usize];
    // SAFETY: `buf` is writable for `required` units.  On success the return
    // value is the written length excluding the terminator; if the buffer no
    // longer suffices it is the new required length including it.
    let written = unsafe { GetSystemWindowsDirectoryW(Some(&mut buf)) } as usize;
    if written == 0 {
        return Err(last_error("GetSystemWindowsDirectoryW"));
    }
    if written != buf.len() - 1 {
        return Err(WasherError::Inconsistent {
            function: "GetSystemWindowsDirectoryW",
            detail: "wrote a different length than it probed",
        });
    }

    buf.truncate(written);
    Ok(PathBuf::from(OsString::from_wide(&buf)))
}
