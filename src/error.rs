// ── Central error type ────────────────────────────────────────────────────────
//
// Every fallible operation in washer returns `error::Result<T>`.  No panics in
// library paths; a failure carries the name of the Win32 API that produced it
// so callers can report something more useful than a bare code.

/// Every error that washer can produce.
#[derive(Debug)]
pub enum WasherError {
    /// A Win32 API call reported failure.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A Win32 API call reported success but its output failed a consistency
    /// check (e.g. a written length that no longer matches the probed length).
    Inconsistent {
        /// The name of the function whose output was inconsistent.
        function: &'static str,
        /// What the consistency check found, for display purposes.
        detail: &'static str,
    },
}

impl std::fmt::Display for WasherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::Inconsistent { function, detail } => {
                write!(f, "{function} succeeded but {detail}")
            }
        }
    }
}

impl std::error::Error for WasherError {}

#[cfg(windows)]
impl WasherError {
    /// Wrap a `windows`-crate error together with the API name that raised it.
    ///
    /// For the bindings that already return `windows::core::Result`:
    /// `CreateFileW`, `LoadResource`, and friends.
    pub(crate) fn win32(function: &'static str, source: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function,
            code: source.code().0 as u32,
        }
    }
}

/// Capture the calling thread's last Win32 error code and wrap it.
///
/// Call immediately after a Win32 function that signals failure through a
/// sentinel return value; the last-error slot is thread-local state that any
/// subsequent API call may overwrite.
#[cfg(windows)]
#[allow(unsafe_code)]
pub(crate) fn last_error(function: &'static str) -> WasherError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { windows::Win32::Foundation::GetLastError() };
    WasherError::Win32 {
        function,
        code: code.0,
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WasherError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win32_display_names_function_and_hex_code() {
        let e = WasherError::Win32 {
            function: "CreateFileW",
            code: 2,
        };
        assert_eq!(e.to_string(), "CreateFileW failed (error 0x00000002)");
    }

    #[test]
    fn win32_display_handles_hresult_width() {
        let e = WasherError::Win32 {
            function: "LoadResource",
            code: 0x8007_0002,
        };
        assert_eq!(e.to_string(), "LoadResource failed (error 0x80070002)");
    }

    #[test]
    fn inconsistent_display_names_function_and_detail() {
        let e = WasherError::Inconsistent {
            function: "GetSystemWindowsDirectoryW",
            detail: "wrote a different length than it probed",
        };
        assert_eq!(
            e.to_string(),
            "GetSystemWindowsDirectoryW succeeded but wrote a different length than it probed"
        );
    }
}
