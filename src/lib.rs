//! Thin, safe wrappers around Win32 file, resource, and system-directory
//! APIs: resource lookup in executable modules, file-attribute get/set,
//! forced deletion of read-only files, allocated/logical size queries, and
//! the shared Windows directory path.
//!
//! Every operation is stateless and independent: it translates one request
//! into the exact sequence of native calls needed, normalizes the failure
//! into [`WasherError`], and releases any handle it opened before returning.
//! Nothing is cached, pooled, retried, or logged.
//!
//! The crate compiles on every target, but the operational surface exists
//! only on Windows; other targets get the error and attribute types alone.
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn demo() -> washer::Result<()> {
//! use washer::{FileAttributes, FileHandle};
//!
//! let file = FileHandle::open(r"C:\temp\report.txt")?;
//! file.set_attributes(FileAttributes::READONLY)?;
//! assert!(file.attributes().contains(FileAttributes::READONLY));
//! # Ok(())
//! # }
//! ```

// ── Safety policy ─────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except the Win32 FFI modules:
//   • `handle`   – owned kernel handles (CreateFileW / CloseHandle)
//   • `file`     – deletion and size-query FFI
//   • `resource` – module loading and resource lookup FFI
//   • `sysdir`   – shared-Windows-directory FFI
//   • `error`    – the single GetLastError capture in `last_error`
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod attrs;
mod error;

pub use attrs::FileAttributes;
pub use error::{Result, WasherError};

#[cfg(windows)]
mod file;
#[cfg(windows)]
mod handle;
#[cfg(windows)]
mod resource;
#[cfg(windows)]
mod sysdir;
#[cfg(windows)]
mod wide;

#[cfg(windows)]
pub use file::{allocation_size, delete_file, file_size, force_delete_file};
#[cfg(windows)]
pub use handle::FileHandle;
#[cfg(windows)]
pub use resource::{find_resource, Module, ResourceId, ResourceInfo};
#[cfg(windows)]
pub use sysdir::windows_directory;
