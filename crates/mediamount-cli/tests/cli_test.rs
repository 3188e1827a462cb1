//! Black-box tests of the helper binary.
//!
//! Every case here fails during argument parsing or path validation, so
//! the binary never reaches a privileged step regardless of who runs the
//! tests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;
use std::process::{Command, Output};

fn helper(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mediamount-helper"))
        .args(args)
        .output()
        .expect("helper runs")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn missing_arguments_exit_with_failure() {
    let output = helper(&["mount", "/dev/sdb1"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn no_arguments_exit_with_failure() {
    let output = helper(&[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn unrecognized_action_is_rejected() {
    let output = helper(&["mountx", "/dev/sdb1", "/media/usb"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("mountx"));
}

#[test]
fn help_exits_successfully() {
    let output = helper(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mount"));
    assert!(stdout.contains("eject"));
    assert!(stdout.contains("cleanup"));
}

#[test]
fn mount_of_non_dev_file_is_refused_before_creating_mount_point() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fake = dir.path().join("fake");
    std::fs::write(&fake, b"").expect("write");
    let target = Path::new("/media/mediamount-cli-test-usb");
    let existed = target.exists();

    let output = helper(&[
        "mount",
        fake.to_str().expect("utf-8 path"),
        target.to_str().expect("utf-8 path"),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("refusing to operate"), "{}", stderr(&output));
    assert_eq!(target.exists(), existed);
}

#[test]
fn eject_of_character_device_is_refused() {
    let output = helper(&["eject", "/dev/null", "/media/usb"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not a block device"), "{}", stderr(&output));
}

#[test]
fn cleanup_of_missing_mount_point_fails_to_resolve() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("stale");

    let output = helper(&[
        "cleanup",
        "/dev/sdb1",
        missing.to_str().expect("utf-8 path"),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unable to resolve"), "{}", stderr(&output));
}

#[test]
fn cleanup_outside_media_is_refused() {
    let dir = tempfile::tempdir().expect("tempdir");

    let output = helper(&[
        "cleanup",
        "/dev/sdb1",
        dir.path().to_str().expect("utf-8 path"),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(dir.path().exists());
    assert!(stderr(&output).contains("refusing to operate"), "{}", stderr(&output));
}
