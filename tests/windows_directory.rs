// System-directory resolution.

#![cfg(windows)]

use washer::windows_directory;

#[test]
fn resolves_an_existing_absolute_directory() {
    let dir = windows_directory().expect("windows_directory");
    assert!(dir.is_absolute());
    assert!(dir.is_dir());
}

#[test]
fn resolution_is_idempotent() {
    assert_eq!(
        windows_directory().expect("first"),
        windows_directory().expect("second")
    );
}
