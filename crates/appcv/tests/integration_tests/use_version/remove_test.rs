use crate::common::AppcvTest;

#[test]
fn test_remove_missing_version() {
    let test = AppcvTest::new();
    test.create_version_dir("5.0.0");

    let output = test.use_version(&["--remove", "4.0.0"]);

    output.assert_success();
    assert_eq!(output.stdout(), "Version 4.0.0 does not exist\n");
    assert!(test.is_installed("5.0.0"));
}

#[test]
fn test_remove_one_forced() {
    let test = AppcvTest::new();
    test.create_version_dir("5.0.0");
    test.create_version_dir("4.9.0");
    test.set_active_version("5.0.0");

    let output = test.use_version(&["-r", "5.0.0", "--force"]);

    output.assert_success();
    assert!(output.stdout().starts_with("Removing version 5.0.0\nRemoved 5.0.0"));
    assert!(!test.install_dir().join("5.0.0").exists());
    assert!(test.is_installed("4.9.0"));
    assert_eq!(test.active_version(), None);
}

#[test]
fn test_remove_one_confirmed() {
    let test = AppcvTest::new();
    test.create_version_dir("5.0.0");

    let output = test.appcv_with_input(&["use", "-r", "5.0.0"], "5.0.0\n");

    output.assert_success();
    assert!(
        output
            .stdout()
            .starts_with("Enter '5.0.0' to confirm removal: Removing version 5.0.0\n"),
        "{}",
        output.stdout()
    );
    assert!(!test.is_installed("5.0.0"));
}

#[test]
fn test_remove_one_not_confirmed() {
    let test = AppcvTest::new();
    test.create_version_dir("5.0.0");

    let output = test.appcv_with_input(&["use", "-r", "5.0.0"], "yes\n");

    output.assert_success();
    assert_eq!(output.stdout(), "Enter '5.0.0' to confirm removal: ");
    assert!(test.is_installed("5.0.0"));
}

#[test]
fn test_remove_all_keeps_active_version() {
    let test = AppcvTest::new();
    for version in ["5.1.0", "5.0.0", "4.9.0"] {
        test.create_version_dir(version);
    }
    test.set_active_version("5.0.0");

    let output = test.appcv_with_input(&["use", "--remove", "all"], "y\n");

    output.assert_success();
    let stdout = output.stdout();
    assert!(
        stdout.starts_with(
            "WARNING! This will permanently remove ALL versions excluding 5.0.0:\n\n  5.1.0\n  4.9.0\n\nEnter 'yes' to confirm removal: "
        ),
        "{stdout}"
    );
    assert!(!test.is_installed("5.1.0"));
    assert!(!test.is_installed("4.9.0"));
    assert!(test.is_installed("5.0.0"));
    assert_eq!(test.active_version().as_deref(), Some("5.0.0"));
}

#[test]
fn test_remove_all_declined() {
    let test = AppcvTest::new();
    test.create_version_dir("5.1.0");
    test.create_version_dir("5.0.0");

    let output = test.appcv_with_input(&["use", "--remove", "all"], "no\n");

    output.assert_success();
    assert!(test.is_installed("5.1.0"));
    assert!(test.is_installed("5.0.0"));
}

#[test]
fn test_remove_matching_pattern() {
    let test = AppcvTest::new();
    for version in ["1.0.0", "2.0.0", "2.1.0", "3.0.0"] {
        test.create_version_dir(version);
    }
    test.set_active_version("2.1.0");

    let output = test.use_version(&["--remove", "regex", r"^2\.", "--force"]);

    output.assert_success();
    assert!(test.is_installed("1.0.0"));
    assert!(!test.is_installed("2.0.0"));
    assert!(!test.is_installed("2.1.0"));
    assert!(test.is_installed("3.0.0"));
    assert_eq!(test.active_version(), None);
}

#[test]
fn test_remove_regex_requires_pattern() {
    let test = AppcvTest::new();
    test.create_version_dir("5.0.0");

    let output = test.use_version(&["--remove", "regex"]);

    output.assert_failure();
    assert_eq!(output.exit_code(), Some(2));
    assert!(test.is_installed("5.0.0"));
}

#[test]
fn test_remove_invalid_pattern() {
    let test = AppcvTest::new();
    test.create_version_dir("5.0.0");

    let output = test.use_version(&["--remove", "regex", "([", "--force"]);

    output.assert_failure();
    assert_eq!(output.exit_code(), Some(1));
    assert!(output.stderr().contains("Invalid version pattern"), "{}", output.stderr());
    assert!(test.is_installed("5.0.0"));
}
