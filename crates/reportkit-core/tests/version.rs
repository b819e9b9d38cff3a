//! Generator version fallback chain.

use reportkit_core::version::{VersionResolver, VERSION_PLACEHOLDER, VERSION_RESOURCE};
use reportkit_core::UNDEFINED_VERSION;

#[test]
fn nothing_available_resolves_undefined() {
    let dir = tempfile::tempdir().unwrap();
    let version = VersionResolver::default()
        .with_resource_dir(dir.path())
        .with_package_version(None)
        .resolve();
    assert_eq!(version, UNDEFINED_VERSION);
}

#[test]
fn missing_resource_dir_falls_back_to_package() {
    let version = VersionResolver::default()
        .with_resource_dir("/nonexistent/reportkit/resources")
        .with_package_version(Some("2.3.4"))
        .resolve();
    assert_eq!(version, "2.3.4");
}

#[test]
fn whitespace_resource_falls_back_to_package() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(VERSION_RESOURCE), "   \n\t").unwrap();
    let version = VersionResolver::default()
        .with_resource_dir(dir.path())
        .with_package_version(Some("2.3.4"))
        .resolve();
    assert_eq!(version, "2.3.4");
}

#[test]
fn placeholder_resource_falls_back_to_package() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(VERSION_RESOURCE),
        format!("{VERSION_PLACEHOLDER}\n"),
    )
    .unwrap();
    let version = VersionResolver::default()
        .with_resource_dir(dir.path())
        .with_package_version(Some("2.3.4"))
        .resolve();
    assert_eq!(version, "2.3.4");
}

#[test]
fn resource_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(VERSION_RESOURCE), "\n 3.0.0-rc1 \n").unwrap();
    let version = VersionResolver::default()
        .with_resource_dir(dir.path())
        .with_package_version(None)
        .resolve();
    assert_eq!(version, "3.0.0-rc1");
}

#[test]
fn unreadable_resource_is_recovered() {
    let dir = tempfile::tempdir().unwrap();
    // A directory in place of the file makes the read fail.
    std::fs::create_dir(dir.path().join(VERSION_RESOURCE)).unwrap();
    let version = VersionResolver::default()
        .with_resource_dir(dir.path())
        .with_package_version(None)
        .resolve();
    assert_eq!(version, UNDEFINED_VERSION);
}
