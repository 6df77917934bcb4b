// ── File attributes ───────────────────────────────────────────────────────────
//
// A typed view of the Win32 `FILE_ATTRIBUTE_*` bit space, plus the masking
// rule the attribute accessor applies before writing.  No unsafe here; pure
// data, compiled on every target.

use bitflags::bitflags;

bitflags! {
    /// File or directory attributes as reported by the OS.
    ///
    /// Values mirror the Win32 `FILE_ATTRIBUTE_*` constants bit for bit.
    /// Unknown bits reported by newer filesystems are retained rather than
    /// dropped, so a get/set round-trip never loses information silently.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileAttributes: u32 {
        /// Write-protected; deletion fails until the bit is cleared.
        const READONLY            = 0x0000_0001;
        /// Hidden from ordinary directory listings.
        const HIDDEN              = 0x0000_0002;
        /// Used (or reserved) by the operating system.
        const SYSTEM              = 0x0000_0004;
        /// The object is a directory.
        const DIRECTORY           = 0x0000_0010;
        /// Marked for backup or removal (set on any write).
        const ARCHIVE             = 0x0000_0020;
        /// No other attribute set; only meaningful alone.
        const NORMAL              = 0x0000_0080;
        /// Storage backed for temporary use; the OS avoids flushing.
        const TEMPORARY           = 0x0000_0100;
        /// Sparse file.
        const SPARSE_FILE         = 0x0000_0200;
        /// The object is (or has) a reparse point, e.g. a symlink.
        const REPARSE_POINT       = 0x0000_0400;
        /// Transparently compressed.
        const COMPRESSED          = 0x0000_0800;
        /// Data is physically moved to offline storage.
        const OFFLINE             = 0x0000_1000;
        /// Excluded from content indexing.
        const NOT_CONTENT_INDEXED = 0x0000_2000;
        /// Transparently encrypted.
        const ENCRYPTED           = 0x0000_4000;
        /// Excluded from data-integrity scans.
        const NO_SCRUB_DATA       = 0x0002_0000;
    }
}

impl FileAttributes {
    /// The `INVALID_FILE_ATTRIBUTES` sentinel: every bit set, which no real
    /// attribute combination can be.  Returned by `FileHandle::attributes`
    /// when the query itself fails.
    pub const INVALID: Self = Self::from_bits_retain(u32::MAX);

    /// The subset of attributes `FileHandle::set_attributes` will write:
    /// read-only, hidden, system, archive, temporary, offline,
    /// not-content-indexed, and no-scrub-data.  Everything else (directory,
    /// reparse-point, compression, encryption, …) is controlled by the
    /// filesystem, not by an attribute write.
    pub const SETTABLE: Self = Self::READONLY
        .union(Self::HIDDEN)
        .union(Self::SYSTEM)
        .union(Self::ARCHIVE)
        .union(Self::TEMPORARY)
        .union(Self::OFFLINE)
        .union(Self::NOT_CONTENT_INDEXED)
        .union(Self::NO_SCRUB_DATA);

    /// `false` when this value is the [`INVALID`](Self::INVALID) sentinel.
    pub fn is_valid(self) -> bool {
        self.bits() != Self::INVALID.bits()
    }

    /// Reduce a requested set to what the accessor actually pushes to the OS:
    /// the [`SETTABLE`](Self::SETTABLE) subset with [`NORMAL`](Self::NORMAL)
    /// overlaid.  The OS ignores `NORMAL` whenever any other bit survives, so
    /// the overlay only matters for an otherwise-empty request.
    #[must_use]
    pub fn sanitize(self) -> Self {
        self.intersection(Self::SETTABLE).union(Self::NORMAL)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settable_mask_matches_win32_value() {
        assert_eq!(FileAttributes::SETTABLE.bits(), 0x0002_3127);
    }

    #[test]
    fn sanitize_keeps_allowed_bits() {
        let requested = FileAttributes::READONLY | FileAttributes::ARCHIVE;
        assert_eq!(
            requested.sanitize(),
            FileAttributes::READONLY | FileAttributes::ARCHIVE | FileAttributes::NORMAL
        );
    }

    #[test]
    fn sanitize_drops_disallowed_bits() {
        let requested =
            FileAttributes::DIRECTORY | FileAttributes::ENCRYPTED | FileAttributes::READONLY;
        assert_eq!(
            requested.sanitize(),
            FileAttributes::READONLY | FileAttributes::NORMAL
        );
    }

    #[test]
    fn sanitize_of_empty_is_normal_alone() {
        assert_eq!(
            FileAttributes::empty().sanitize(),
            FileAttributes::NORMAL
        );
    }

    #[test]
    fn sanitize_of_the_sentinel_is_every_settable_bit() {
        // The forced-delete snapshot can be INVALID when the attribute query
        // failed; sanitizing it must stay inside the allow-list.
        assert_eq!(
            FileAttributes::INVALID.sanitize(),
            FileAttributes::SETTABLE | FileAttributes::NORMAL
        );
    }

    #[test]
    fn invalid_sentinel_is_distinguishable() {
        assert!(!FileAttributes::INVALID.is_valid());
        assert!(FileAttributes::empty().is_valid());
        assert!(FileAttributes::all().is_valid());
        // all() covers only the named flags, never the full bit space.
        assert_ne!(FileAttributes::all().bits(), u32::MAX);
    }

    #[test]
    fn unknown_bits_are_retained() {
        let raw = FileAttributes::from_bits_retain(0x0000_8000 | 0x0000_0001);
        assert!(raw.contains(FileAttributes::READONLY));
        assert_eq!(raw.bits(), 0x8001);
    }
}
