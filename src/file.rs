// ── Path operations ───────────────────────────────────────────────────────────
//
// Deletion and size queries take a path, open their own handle with exactly
// the access the operation needs, and release it before returning.
//
// Win32 FFI module; every `unsafe` block MUST carry a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::ffi::c_void;
use std::path::Path;

use windows::Win32::{
    Foundation::{BOOLEAN, GENERIC_READ},
    Storage::FileSystem::{
        FileDispositionInfo, FileStandardInfo, GetFileInformationByHandleEx,
        SetFileInformationByHandle, DELETE, FILE_DISPOSITION_INFO, FILE_READ_ATTRIBUTES,
        FILE_SHARE_READ, FILE_STANDARD_INFO, FILE_WRITE_ATTRIBUTES, SYNCHRONIZE,
    },
};

use crate::attrs::FileAttributes;
use crate::error::{Result, WasherError};
use crate::handle::{FileHandle, SHARE_ALL};

// ── Deletion ──────────────────────────────────────────────────────────────────

/// Delete the file at `path`.
///
/// Fails if the file is read-only; use [`force_delete_file`] to override.
/// A reparse point is deleted itself, never its target.
pub fn delete_file(path: impl AsRef<Path>) -> Result<()> {
    delete_with(path.as_ref(), false)
}

/// Delete the file at `path`, clearing a read-only attribute first.
///
/// The clear is best effort; if the deletion then fails, the original
/// attributes are restored (also best effort) so an unsuccessful call does
/// not leave the file writable.  The clear/restore pair is not atomic with
/// the delete; a crash in between can leave the read-only bit off.
pub fn force_delete_file(path: impl AsRef<Path>) -> Result<()> {
    delete_with(path.as_ref(), true)
}

fn delete_with(path: &Path, force: bool) -> Result<()> {
    let file = FileHandle::open_with(
        path,
        (SYNCHRONIZE | DELETE | FILE_READ_ATTRIBUTES | FILE_WRITE_ATTRIBUTES).0,
        SHARE_ALL,
    )?;

    let snapshot = if force {
        let old = file.attributes();
        // A file whose attributes cannot be rewritten may still be deletable,
        // so a failed clear is ignored and the delete attempted anyway.
        let _ = file.set_attributes(old.difference(FileAttributes::READONLY));
        Some(old)
    } else {
        None
    };

    let disposition = FILE_DISPOSITION_INFO {
        DeleteFile: BOOLEAN(1),
    };
    // SAFETY: `disposition` is a valid FILE_DISPOSITION_INFO whose size
    // matches the FileDispositionInfo class; the handle is live.  The file is
    // removed when the last handle to it closes.
    let deleted = unsafe {
        SetFileInformationByHandle(
            file.raw(),
            FileDispositionInfo,
            &disposition as *const FILE_DISPOSITION_INFO as *const c_void,
            std::mem::size_of::<FILE_DISPOSITION_INFO>() as u32,
        )
    }
    .map_err(|e| WasherError::win32("SetFileInformationByHandle", e));

    if deleted.is_err() {
        if let Some(old) = snapshot {
            // Put the original attributes back so a failed forced delete does
            // not leave the file writable.  Best effort again.
            let _ = file.set_attributes(old);
        }
    }

    deleted
}

// ── Size queries ──────────────────────────────────────────────────────────────

/// Bytes of on-disk space allocated for `path` (file or directory).
///
/// The physical, cluster-rounded reservation: usually ≥ the logical size, but
/// smaller for compressed or sparse files.
pub fn allocation_size(path: impl AsRef<Path>) -> Result<u64> {
    Ok(standard_info(path.as_ref())?.AllocationSize as u64)
}

/// Logical size of `path` in bytes: the end-of-file position readers see.
pub fn file_size(path: impl AsRef<Path>) -> Result<u64> {
    Ok(standard_info(path.as_ref())?.EndOfFile as u64)
}

/// Open `path` read-only (shared read) and query its standard info block.
fn standard_info(path: &Path) -> Result<FILE_STANDARD_INFO> {
    let file = FileHandle::open_with(path, GENERIC_READ.0 | SYNCHRONIZE.0, FILE_SHARE_READ)?;
    let mut info = FILE_STANDARD_INFO::default();
    // SAFETY: `info` is a writable FILE_STANDARD_INFO whose size matches the
    // FileStandardInfo class; the handle is live.
    unsafe {
        GetFileInformationByHandleEx(
            file.raw(),
            FileStandardInfo,
            &mut info as *mut FILE_STANDARD_INFO as *mut c_void,
            std::mem::size_of::<FILE_STANDARD_INFO>() as u32,
        )
    }
    .map_err(|e| WasherError::win32("GetFileInformationByHandleEx", e))?;
    Ok(info)
}
