// ── Module resources ──────────────────────────────────────────────────────────
//
// Locating binary resources (version blocks, manifests, icons, …) inside a
// portable-executable image.  The lookup is a straight pass-through:
// FindResourceExW → SizeofResource → LoadResource → LockResource, with no
// allocation or copying; the result aliases the module's mapped image.
//
// Win32 FFI module; every `unsafe` block MUST carry a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::ffi::OsStr;
use std::path::Path;

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{FreeLibrary, GetLastError, SetLastError, ERROR_SUCCESS, HMODULE},
        System::LibraryLoader::{
            FindResourceExW, LoadLibraryExW, LoadResource, LockResource, SizeofResource,
            LOAD_LIBRARY_AS_DATAFILE, LOAD_LIBRARY_AS_IMAGE_RESOURCE,
        },
    },
};

use crate::error::{last_error, Result, WasherError};
use crate::wide;

/// `MAKELANGID(LANG_NEUTRAL, SUBLANG_NEUTRAL)`: take the best
/// language-neutral match the module offers.
const LANG_NEUTRAL_MATCH: u16 = 0;

// ── Module ────────────────────────────────────────────────────────────────────

/// A module loaded for resource access only.
///
/// The image is mapped as a data file: nothing from it is executed and no
/// `DllMain` runs.  Dropping the value frees the mapping, which invalidates
/// every [`ResourceInfo`] found in it.
#[derive(Debug)]
pub struct Module(HMODULE);

impl Module {
    /// Map the executable or DLL at `path` for resource lookup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let wide = wide::null_terminated(path.as_ref().as_os_str());
        // SAFETY: `wide` is a valid null-terminated UTF-16 string that
        // outlives the call; the reserved file-handle parameter is None.
        let module = unsafe {
            LoadLibraryExW(
                PCWSTR(wide.as_ptr()),
                None,
                LOAD_LIBRARY_AS_DATAFILE | LOAD_LIBRARY_AS_IMAGE_RESOURCE,
            )
        }
        .map_err(|e| WasherError::win32("LoadLibraryExW", e))?;
        Ok(Self(module))
    }

    pub(crate) fn raw(&self) -> HMODULE {
        self.0
    }
}

impl Drop for Module {
    fn drop(&mut self) {
        // SAFETY: self.0 came from a successful LoadLibraryExW and has not
        // been freed since.  FreeLibrary's result is intentionally discarded;
        // drop has no error channel.
        unsafe {
            let _ = FreeLibrary(self.0);
        }
    }
}

// ── Resource identifiers ──────────────────────────────────────────────────────

/// A resource type or name: either a string or a small integer id
/// (the `MAKEINTRESOURCE` encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceId<'a> {
    /// A string identifier, e.g. `"MANIFEST"`.
    Name(&'a str),
    /// An integer identifier, e.g. `16` for `RT_VERSION`.
    Id(u16),
}

impl ResourceId<'_> {
    /// Encode for the FFI call.  A string id is written into `storage`, which
    /// must stay alive for as long as the returned pointer is used.
    fn encode(self, storage: &mut Vec<u16>) -> PCWSTR {
        match self {
            // MAKEINTRESOURCE: the id rides in the low word of the pointer.
            Self::Id(id) => PCWSTR(id as usize as *const u16),
            Self::Name(name) => {
                *storage = wide::null_terminated(OsStr::new(name));
                PCWSTR(storage.as_ptr())
            }
        }
    }
}

// ── ResourceInfo ──────────────────────────────────────────────────────────────

/// Location and size of a resource inside a loaded module.
///
/// Non-owning: the pointer aliases memory mapped for the module and stays
/// valid exactly as long as the module stays loaded.  There is nothing to
/// free; dropping this value releases nothing.
#[derive(Debug, Clone, Copy)]
pub struct ResourceInfo {
    data: *const u8,
    size: u32,
}

impl ResourceInfo {
    /// Pointer to the first byte of the resource.
    pub fn as_ptr(&self) -> *const u8 {
        self.data
    }

    /// Resource length in bytes.  Zero-length resources exist and are not an
    /// error.
    pub fn len(&self) -> usize {
        self.size as usize
    }

    /// `true` for a zero-length resource.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// View the resource bytes.
    ///
    /// # Safety
    ///
    /// The module the resource was found in must stay loaded for the whole
    /// lifetime of the returned slice: the owning [`Module`] must not be
    /// dropped before the slice is.  Lookups in the process's own module
    /// (`module = None`) satisfy this trivially.
    pub unsafe fn bytes<'a>(&self) -> &'a [u8] {
        std::slice::from_raw_parts(self.data, self.size as usize)
    }
}

// ── Lookup ────────────────────────────────────────────────────────────────────

/// Locate the best language-neutral match for a resource and report where it
/// lives and how big it is.
///
/// With `module` = `None` the search covers the module that created the
/// calling process, i.e. the executable itself.  A missing resource surfaces
/// as the platform's resource-not-found error; a found but empty resource is
/// a success with length zero.
pub fn find_resource(
    module: Option<&Module>,
    kind: ResourceId<'_>,
    name: ResourceId<'_>,
) -> Result<ResourceInfo> {
    let hmodule = module.map_or(HMODULE::default(), Module::raw);

    let mut kind_buf = Vec::new();
    let mut name_buf = Vec::new();
    let kind_ptr = kind.encode(&mut kind_buf);
    let name_ptr = name.encode(&mut name_buf);

    // SAFETY: writing the thread's last-error slot is always permitted.  The
    // reset makes the sentinel checks below attribute a failure to this
    // lookup rather than to stale state from an earlier call.
    unsafe { SetLastError(ERROR_SUCCESS) };

    // SAFETY: the id pointers are either MAKEINTRESOURCE integers or point
    // into `kind_buf`/`name_buf`, which outlive the call; `hmodule` is null
    // (process module) or kept alive by the `module` borrow.
    let found = unsafe { FindResourceExW(hmodule, kind_ptr, name_ptr, LANG_NEUTRAL_MATCH) };
    if found.is_invalid() {
        return Err(last_error("FindResourceExW"));
    }

    // SAFETY: `found` came from a successful FindResourceExW on `hmodule`.
    let size = unsafe { SizeofResource(hmodule, found) };
    if size == 0 {
        // Zero is both "empty resource" and "failed query"; the slot reset
        // above lets the last-error value tell them apart.
        // SAFETY: reading the last-error slot is always permitted.
        let code = unsafe { GetLastError() };
        if code != ERROR_SUCCESS {
            return Err(WasherError::Win32 {
                function: "SizeofResource",
                code: code.0,
            });
        }
    }

    // SAFETY: as above; LoadResource on a found HRSRC yields the data handle.
    let block = unsafe { LoadResource(hmodule, found) }
        .map_err(|e| WasherError::win32("LoadResource", e))?;

    // SAFETY: `block` is the resource-data handle just returned.
    let data = unsafe { LockResource(block) };
    if data.is_null() {
        return Err(last_error("LockResource"));
    }

    Ok(ResourceInfo {
        data: data as *const u8,
        size,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ids_use_the_makeintresource_encoding() {
        let mut buf = Vec::new();
        let ptr = ResourceId::Id(16).encode(&mut buf);
        assert_eq!(ptr.0 as usize, 16);
        assert!(buf.is_empty());
    }

    #[test]
    fn string_ids_are_null_terminated_utf16() {
        let mut buf = Vec::new();
        let ptr = ResourceId::Name("MANIFEST").encode(&mut buf);
        assert_eq!(ptr.0, buf.as_ptr());
        assert_eq!(buf.len(), "MANIFEST".len() + 1);
        assert_eq!(buf.last(), Some(&0));
    }
}
