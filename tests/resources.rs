// Resource lookup against real system binaries.

#![cfg(windows)]

use washer::{find_resource, windows_directory, Module, ResourceId, WasherError};

/// Every system DLL carries a version-information resource under this type.
const RT_VERSION: u16 = 16;
const VS_VERSION_INFO: u16 = 1;

fn kernel32() -> Module {
    let dll = windows_directory()
        .expect("windows_directory")
        .join("System32")
        .join("kernel32.dll");
    Module::load(dll).expect("load kernel32 as a datafile")
}

#[test]
fn version_resource_is_found_with_its_true_length() {
    let module = kernel32();
    let info = find_resource(
        Some(&module),
        ResourceId::Id(RT_VERSION),
        ResourceId::Id(VS_VERSION_INFO),
    )
    .expect("version resource");

    assert!(!info.as_ptr().is_null());
    assert!(!info.is_empty());

    // SAFETY: `module` stays loaded while the slice is read.
    let bytes = unsafe { info.bytes() };
    assert_eq!(bytes.len(), info.len());
    // A VS_VERSIONINFO block leads with its own byte length.
    let declared = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
    assert!(declared > 0 && declared <= bytes.len());
}

#[test]
fn lookups_are_idempotent() {
    let module = kernel32();
    let first = find_resource(
        Some(&module),
        ResourceId::Id(RT_VERSION),
        ResourceId::Id(VS_VERSION_INFO),
    )
    .expect("first lookup");
    let second = find_resource(
        Some(&module),
        ResourceId::Id(RT_VERSION),
        ResourceId::Id(VS_VERSION_INFO),
    )
    .expect("second lookup");

    assert_eq!(first.as_ptr(), second.as_ptr());
    assert_eq!(first.len(), second.len());
}

#[test]
fn missing_resource_names_the_locator() {
    let module = kernel32();
    let err = find_resource(
        Some(&module),
        ResourceId::Id(RT_VERSION),
        ResourceId::Name("no_such_resource_here"),
    )
    .expect_err("lookup must fail");

    match err {
        WasherError::Win32 { function, code } => {
            assert_eq!(function, "FindResourceExW");
            // ERROR_RESOURCE_TYPE_NOT_FOUND or ERROR_RESOURCE_NAME_NOT_FOUND,
            // depending on how far the loader got.
            assert!(code == 1813 || code == 1814, "unexpected code {code:#x}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn current_module_lookup_fails_cleanly_without_resources() {
    // Test executables embed no version resource; this exercises the
    // current-module path end to end.
    let result = find_resource(None, ResourceId::Id(RT_VERSION), ResourceId::Id(VS_VERSION_INFO));
    assert!(result.is_err());
}
