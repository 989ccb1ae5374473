use crate::common::AppcvTest;
use insta::assert_snapshot;

/// Points the registry at a reserved TLD that never resolves.
fn offline_test() -> AppcvTest {
    let mut test = AppcvTest::new();
    test.env
        .insert("APPCV_REGISTRY_URL".into(), "http://registry.invalid".into());
    test
}

#[test]
fn test_offline_latest_activates_newest_installed() {
    let test = offline_test();
    test.create_version_dir("1.2.0");
    test.create_version_dir("1.10.0");
    test.create_version_dir("1.1.0");

    let output = test.use_version(&["latest"]);

    output.assert_success();
    assert_eq!(output.stdout(), "1.10.0 is now your active version\n");
    assert!(
        output
            .stderr()
            .contains("com.appcelerator.install.use.download.error"),
        "{}",
        output.stderr()
    );
    assert_eq!(test.active_version().as_deref(), Some("1.10.0"));
}

#[test]
fn test_offline_latest_with_nothing_installed() {
    let test = offline_test();

    let output = test.use_version(&["latest"]);

    output.assert_success();
    assert_eq!(output.stdout(), "");
    assert_eq!(test.active_version(), None);
}

#[test]
fn test_offline_listing() {
    let test = offline_test();
    test.create_version_dir("1.2.0");
    test.create_version_dir("1.1.0");
    test.set_active_version("1.1.0");

    let output = test.use_version(&[]);

    output.assert_success();
    assert_snapshot!(output.normalized_stdout(), @r"
    The following versions are available offline:

      1.2.0  [installed]  (latest)
    * 1.1.0  [installed]
    ");
}

#[test]
fn test_offline_json_listing() {
    let test = offline_test();
    test.create_version_dir("1.2.0");

    let output = test.use_version(&["-o", "json"]);

    output.assert_success();
    let json: serde_json::Value = serde_json::from_str(&output.stdout()).unwrap();
    assert_eq!(json["latest"], "1.2.0");
    assert_eq!(json["versions"][0]["installed"], true);
}

#[test]
fn test_refused_connection_does_not_fall_back() {
    let mut test = AppcvTest::new();
    test.env
        .insert("APPCV_REGISTRY_URL".into(), "http://127.0.0.1:1".into());
    test.create_version_dir("1.2.0");

    let output = test.use_version(&["latest"]);

    output.assert_failure();
    assert!(
        output
            .stderr()
            .contains("com.appcelerator.install.use.download.error"),
        "{}",
        output.stderr()
    );
    assert_eq!(test.active_version(), None);
}
