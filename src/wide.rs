// ── Wide-string helper ────────────────────────────────────────────────────────
//
// Win32 `W` functions take null-terminated UTF-16.  The conversion lives here
// so every call site hands the FFI a buffer that outlives the call.

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

/// Encode `s` as a null-terminated UTF-16 buffer for a Win32 `W` call.
pub(crate) fn null_terminated(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_gets_terminator() {
        assert_eq!(null_terminated(OsStr::new("abc")), vec![97, 98, 99, 0]);
    }

    #[test]
    fn empty_is_just_the_terminator() {
        assert_eq!(null_terminated(OsStr::new("")), vec![0]);
    }

    #[test]
    fn non_ascii_encodes_as_utf16() {
        assert_eq!(null_terminated(OsStr::new("é")), vec![0x00E9, 0]);
    }
}
