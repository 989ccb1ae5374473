use crate::common::{AppcvTest, binary_name};

#[test]
fn test_latest_activates_installed_version() {
    let mut test = AppcvTest::new();
    test.create_version_dir("5.1.0");
    test.create_version_dir("5.0.0");
    test.set_active_version("5.0.0");
    let (latest, list) = test.mock_registry(
        r#"[{"version":"5.1.0"}]"#,
        r#"{"key":"result","result":[{"version":"5.0.0"},{"version":"5.1.0"}]}"#,
    );

    let output = test.use_version(&["latest"]);

    output.assert_success();
    latest.assert();
    list.assert();
    assert_eq!(output.stdout(), "5.1.0 is now your active version\n");
    assert_eq!(test.active_version().as_deref(), Some("5.1.0"));
}

#[test]
fn test_latest_falls_back_to_first_listed_version() {
    let mut test = AppcvTest::new();
    test.create_version_dir("5.0.0");
    test.mock_registry("[]", r#"[{"version":"5.0.0"},{"version":"4.9.0"}]"#);

    let output = test.use_version(&["latest"]);

    output.assert_success();
    assert_eq!(test.active_version().as_deref(), Some("5.0.0"));
}

#[test]
fn test_latest_installs_missing_version() {
    let mut test = AppcvTest::new();
    test.mock_registry(r#"[{"version":"6.0.0"}]"#, r#"[{"version":"6.0.0"}]"#);
    let bin = format!("package/bin/{}", binary_name());
    let download = test.mock_tarball_download("6.0.0", &[(bin.as_str(), "#!/bin/sh\n")]);

    let output = test.use_version(&["latest"]);

    output.assert_success();
    download.assert();
    assert!(test.is_installed("6.0.0"));
    assert_eq!(test.active_version().as_deref(), Some("6.0.0"));
}

#[test]
fn test_latest_without_deployed_versions() {
    let mut test = AppcvTest::new();
    test.create_version_dir("5.0.0");
    test.mock_registry("[]", "[]");

    let output = test.use_version(&["latest"]);

    output.assert_failure();
    assert_eq!(output.exit_code(), Some(1));
    assert_eq!(
        output.stdout(),
        "No versions are currently deployed. Please check back in a few minutes.\n"
    );
    assert_eq!(test.active_version(), None);
}
