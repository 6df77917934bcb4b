// ── Owned file handles ────────────────────────────────────────────────────────
//
// `FileHandle` owns a kernel handle from `CreateFileW` and closes it on drop,
// so every operation releases its handle on every exit path.  All opens in
// this crate go through `open_with` and share two fixed traits:
//   • backup semantics: directories are openable as file-like handles;
//   • open-reparse-point: a symlink is operated on itself, never its target.
//
// This is a Win32 FFI module; every `unsafe` block MUST carry a `// SAFETY:`
// comment per crate policy.

#![allow(unsafe_code)]

use std::ffi::c_void;
use std::fs::File;
use std::os::windows::io::{AsRawHandle, FromRawHandle, IntoRawHandle, RawHandle};
use std::path::Path;

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{CloseHandle, HANDLE},
        Storage::FileSystem::{
            CreateFileW, FileBasicInfo, GetFileInformationByHandleEx,
            SetFileInformationByHandle, FILE_BASIC_INFO, FILE_FLAGS_AND_ATTRIBUTES,
            FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT, FILE_READ_ATTRIBUTES,
            FILE_SHARE_DELETE, FILE_SHARE_MODE, FILE_SHARE_READ, FILE_SHARE_WRITE,
            FILE_WRITE_ATTRIBUTES, OPEN_EXISTING, SYNCHRONIZE,
        },
    },
};

use crate::attrs::FileAttributes;
use crate::error::{Result, WasherError};
use crate::wide;

// ── Open constants ────────────────────────────────────────────────────────────

/// Flags common to every open in this crate: directories allowed, reparse
/// points opened as themselves.
pub(crate) const OPEN_FLAGS: FILE_FLAGS_AND_ATTRIBUTES = FILE_FLAGS_AND_ATTRIBUTES(
    FILE_FLAG_BACKUP_SEMANTICS.0 | FILE_FLAG_OPEN_REPARSE_POINT.0,
);

/// Share mode admitting concurrent readers, writers, and deleters.
pub(crate) const SHARE_ALL: FILE_SHARE_MODE =
    FILE_SHARE_MODE(FILE_SHARE_READ.0 | FILE_SHARE_WRITE.0 | FILE_SHARE_DELETE.0);

// ── FileHandle ────────────────────────────────────────────────────────────────

/// An exclusively owned handle to an open file or directory.
///
/// The handle is closed when the value drops.  Obtain one with
/// [`FileHandle::open`], by converting a [`std::fs::File`], or from a raw
/// handle you already own via [`FromRawHandle`].
#[derive(Debug)]
pub struct FileHandle(HANDLE);

impl FileHandle {
    /// Open `path` for attribute access (read and write attributes), sharing
    /// read/write/delete with other openers.
    ///
    /// Works for directories as well as files, and opens a reparse point
    /// itself rather than its target.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(
            path.as_ref(),
            (FILE_READ_ATTRIBUTES | FILE_WRITE_ATTRIBUTES | SYNCHRONIZE).0,
            SHARE_ALL,
        )
    }

    /// Open an existing file or directory with explicit access and share
    /// modes.  Creation disposition and flags are fixed crate-wide
    /// (open-existing, [`OPEN_FLAGS`]).
    pub(crate) fn open_with(path: &Path, access: u32, share: FILE_SHARE_MODE) -> Result<Self> {
        let wide = wide::null_terminated(path.as_os_str());
        // SAFETY: `wide` is a valid null-terminated UTF-16 string that
        // outlives the call.  A failed open surfaces as Err, so an invalid
        // handle is never wrapped.
        let handle = unsafe {
            CreateFileW(
                PCWSTR(wide.as_ptr()),
                access,
                share,
                None,
                OPEN_EXISTING,
                OPEN_FLAGS,
                None,
            )
        }
        .map_err(|e| WasherError::win32("CreateFileW", e))?;
        Ok(Self(handle))
    }

    /// Query the current attribute bits.
    ///
    /// On failure this returns [`FileAttributes::INVALID`] (all bits set)
    /// rather than an error; the sentinel is part of the interface and is
    /// distinguishable from every real attribute combination.
    pub fn attributes(&self) -> FileAttributes {
        let mut info = FILE_BASIC_INFO::default();
        // SAFETY: `info` is a writable FILE_BASIC_INFO whose size matches the
        // FileBasicInfo class; self.0 is live for the duration of the call.
        let queried = unsafe {
            GetFileInformationByHandleEx(
                self.0,
                FileBasicInfo,
                &mut info as *mut FILE_BASIC_INFO as *mut c_void,
                std::mem::size_of::<FILE_BASIC_INFO>() as u32,
            )
        };
        match queried {
            Ok(()) => FileAttributes::from_bits_retain(info.FileAttributes),
            Err(_) => FileAttributes::INVALID,
        }
    }

    /// Apply an attribute set to the file or directory.
    ///
    /// The request is reduced to [`FileAttributes::SETTABLE`] with
    /// [`FileAttributes::NORMAL`] overlaid (see
    /// [`sanitize`](FileAttributes::sanitize)); the handle must have been
    /// opened with write-attributes access.  The underlying call is atomic
    /// per handle: either the whole computed set applies or nothing does.
    pub fn set_attributes(&self, attrs: FileAttributes) -> Result<()> {
        let info = FILE_BASIC_INFO {
            // Zero timestamps mean "leave unchanged" for this info class.
            FileAttributes: attrs.sanitize().bits(),
            ..Default::default()
        };
        // SAFETY: `info` is a valid FILE_BASIC_INFO whose size matches the
        // FileBasicInfo class; self.0 is live for the duration of the call.
        unsafe {
            SetFileInformationByHandle(
                self.0,
                FileBasicInfo,
                &info as *const FILE_BASIC_INFO as *const c_void,
                std::mem::size_of::<FILE_BASIC_INFO>() as u32,
            )
        }
        .map_err(|e| WasherError::win32("SetFileInformationByHandle", e))
    }

    /// The raw handle, still owned by `self`.
    pub(crate) fn raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        // SAFETY: self.0 came from a successful CreateFileW (or was handed to
        // from_raw_handle under its ownership contract) and has not been
        // closed since.  CloseHandle's result is intentionally discarded;
        // drop has no error channel.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

// SAFETY: a kernel file handle is a process-wide token with no thread
// affinity; the OS serializes operations on it.  Same contract std::fs::File
// relies on for its own Send + Sync.
unsafe impl Send for FileHandle {}
// SAFETY: as above; &FileHandle only exposes OS-serialized operations.
unsafe impl Sync for FileHandle {}

// ── std interop ───────────────────────────────────────────────────────────────

impl From<File> for FileHandle {
    /// Take ownership of an open `std` file's handle.  The `File`'s own
    /// close-on-drop is forfeited; this value closes instead.
    fn from(file: File) -> Self {
        Self(HANDLE(file.into_raw_handle()))
    }
}

impl AsRawHandle for FileHandle {
    fn as_raw_handle(&self) -> RawHandle {
        self.0 .0
    }
}

impl FromRawHandle for FileHandle {
    unsafe fn from_raw_handle(handle: RawHandle) -> Self {
        Self(HANDLE(handle))
    }
}

impl IntoRawHandle for FileHandle {
    fn into_raw_handle(self) -> RawHandle {
        let raw = self.0 .0;
        std::mem::forget(self);
        raw
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_handle_round_trip() {
        let fake = 0x1234_usize as RawHandle;
        // SAFETY (test): the value is never used as a real handle; it is
        // extracted again before any OS call could see it.
        let fh = unsafe { FileHandle::from_raw_handle(fake) };
        assert_eq!(fh.as_raw_handle(), fake);
        assert_eq!(fh.into_raw_handle(), fake);
    }

    #[test]
    fn attributes_on_dead_handle_is_the_sentinel() {
        // SAFETY (test): a null handle is never dereferenced; the query fails
        // and into_raw_handle below keeps drop from closing it.
        let fh = unsafe { FileHandle::from_raw_handle(std::ptr::null_mut()) };
        assert_eq!(fh.attributes(), FileAttributes::INVALID);
        let _ = fh.into_raw_handle();
    }
}
