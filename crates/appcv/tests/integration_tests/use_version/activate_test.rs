use crate::common::{AppcvTest, binary_name};

#[test]
fn test_use_installed_version() {
    let test = AppcvTest::new();
    test.create_version_dir("5.0.0");
    test.create_version_dir("4.9.0");
    test.set_active_version("4.9.0");

    let output = test.use_version(&["5.0.0"]);

    output.assert_success();
    assert_eq!(output.stdout(), "5.0.0 is now your active version\n");
    assert_eq!(test.active_version().as_deref(), Some("5.0.0"));
}

#[test]
fn test_use_missing_version_installs_it() {
    let mut test = AppcvTest::new();
    let bin = format!("package/bin/{}", binary_name());
    let download = test.mock_tarball_download(
        "5.1.0",
        &[(bin.as_str(), "#!/bin/sh\n"), ("package/package.json", "{}")],
    );

    let output = test.use_version(&["5.1.0"]);

    output.assert_success();
    download.assert();
    assert_eq!(
        output.stdout(),
        "Installing version 5.1.0\n5.1.0 is now your active version\n"
    );
    assert!(test.is_installed("5.1.0"));
    assert!(test.install_dir().join("5.1.0/package/package.json").is_file());
    assert_eq!(test.active_version().as_deref(), Some("5.1.0"));
}

#[test]
fn test_use_force_reinstalls() {
    let mut test = AppcvTest::new();
    let version_dir = test.create_version_dir("5.0.0");
    std::fs::write(version_dir.join("stale.txt"), "old").unwrap();

    let bin = format!("package/bin/{}", binary_name());
    let download = test.mock_tarball_download("5.0.0", &[(bin.as_str(), "#!/bin/sh\n")]);

    let output = test.use_version(&["5.0.0", "--force"]);

    output.assert_success();
    download.assert();
    assert!(test.is_installed("5.0.0"));
    assert!(!version_dir.join("stale.txt").exists());
    assert_eq!(test.active_version().as_deref(), Some("5.0.0"));
}

#[test]
fn test_install_without_binary_is_discarded() {
    let mut test = AppcvTest::new();
    test.set_active_version("4.9.0");
    let _download = test.mock_tarball_download("5.1.0", &[("package/README.md", "hello")]);

    let output = test.use_version(&["5.1.0"]);

    output.assert_failure();
    assert_eq!(output.exit_code(), Some(1));
    assert!(output.stderr().contains("does not contain"), "{}", output.stderr());
    assert!(!test.install_dir().join("5.1.0").exists());
    assert_eq!(test.active_version().as_deref(), Some("4.9.0"));
}

#[test]
fn test_install_of_unknown_version_fails() {
    let mut test = AppcvTest::new();
    let _download = test
        .server
        .mock("GET", "/api/appc/download/0.0.1")
        .with_status(404)
        .create();

    let output = test.use_version(&["0.0.1"]);

    output.assert_failure();
    assert!(
        output
            .stderr()
            .contains("com.appcelerator.install.download.server.response.error"),
        "{}",
        output.stderr()
    );
    assert!(!test.install_dir().join("0.0.1").exists());
    assert_eq!(test.active_version(), None);
}

#[test]
fn test_path_like_version_is_rejected() {
    let test = AppcvTest::new();
    test.create_version_dir("5.0.0");
    test.create_version_dir("4.9.0");
    test.set_active_version("5.0.0");

    for version in [".", "..", ""] {
        let output = test.use_version(&[version, "--force"]);

        output.assert_failure();
        assert_eq!(output.exit_code(), Some(1));
        assert!(output.stderr().contains("Invalid version"), "{}", output.stderr());
    }

    assert!(test.is_installed("5.0.0"));
    assert!(test.is_installed("4.9.0"));
    assert_eq!(test.active_version().as_deref(), Some("5.0.0"));
}

#[test]
fn test_failed_forced_reinstall_keeps_version() {
    let mut test = AppcvTest::new();
    test.create_version_dir("5.0.0");
    test.set_active_version("5.0.0");
    let _download = test
        .server
        .mock("GET", "/api/appc/download/5.0.0")
        .with_status(500)
        .create();

    let output = test.use_version(&["5.0.0", "--force"]);

    output.assert_failure();
    assert!(test.is_installed("5.0.0"));
    assert_eq!(test.active_version().as_deref(), Some("5.0.0"));
}
