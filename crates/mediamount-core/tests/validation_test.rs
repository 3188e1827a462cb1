//! Argument validation as the dispatcher drives it, through the public API.
//!
//! Nothing here acquires privilege: every case must be rejected (or
//! accepted) before an operation would ask for root.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use mediamount_common::config::HelperConfig;
use mediamount_common::error::HelperError;
use mediamount_common::types::CallerIdentity;
use mediamount_core::PathPolicy;
use mediamount_core::platform::PlatformFamily;

struct Scratch {
    _dir: tempfile::TempDir,
    base: PathBuf,
    policy: PathPolicy,
}

fn scratch() -> Scratch {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().canonicalize().expect("canonical");
    std::fs::create_dir(base.join("dev")).expect("dev");
    std::fs::create_dir(base.join("media")).expect("media");
    let config = HelperConfig {
        device_root: base.join("dev"),
        mount_root: base.join("media"),
        ..HelperConfig::default()
    };
    Scratch {
        policy: PathPolicy::new(&config),
        _dir: dir,
        base,
    }
}

// ── Device argument ──────────────────────────────────────────────────

#[test]
fn mount_of_file_outside_dev_is_policy_violation() {
    let s = scratch();
    let fake = s.base.join("fake");
    std::fs::write(&fake, b"").expect("write");

    let err = PathPolicy::default()
        .validate_device(&fake)
        .expect_err("must be rejected");
    assert!(matches!(err, HelperError::PolicyViolation { .. }), "{err}");
}

#[test]
fn dev_symlink_into_tmp_is_policy_violation() {
    let s = scratch();
    let target = s.base.join("payload");
    std::fs::write(&target, b"").expect("write");
    let link = s.base.join("dev").join("usb0");
    symlink(&target, &link).expect("symlink");

    assert!(matches!(
        s.policy.validate_device(&link),
        Err(HelperError::PolicyViolation { .. })
    ));
}

#[test]
fn character_device_is_rejected() {
    assert!(matches!(
        PathPolicy::default().validate_device(Path::new("/dev/zero")),
        Err(HelperError::NotABlockDevice { .. })
    ));
}

// ── Mount point argument ─────────────────────────────────────────────

#[test]
fn fresh_mount_point_outside_media_is_rejected_without_side_effects() {
    let s = scratch();
    let target = s.base.join("mnt").join("usb");

    assert!(matches!(
        s.policy.resolve_mount_point(&target),
        Err(HelperError::PolicyViolation { .. })
    ));
    assert!(!target.exists());
}

#[test]
fn eject_and_cleanup_require_existing_mount_point() {
    let s = scratch();
    let missing = s.base.join("media").join("gone");

    assert!(matches!(
        s.policy.resolve_existing_mount_point(&missing),
        Err(HelperError::ResolutionError { .. })
    ));
}

#[test]
fn existing_mount_point_escaping_via_symlink_is_rejected() {
    let s = scratch();
    let home = s.base.join("home");
    std::fs::create_dir(&home).expect("mkdir");
    let link = s.base.join("media").join("usb");
    symlink(&home, &link).expect("symlink");

    assert!(matches!(
        s.policy.resolve_existing_mount_point(&link),
        Err(HelperError::PolicyViolation { .. })
    ));
}

#[test]
fn system_mount_root_accepts_fresh_directory_name() {
    let policy = PathPolicy::default();
    let is_plain_dir = Path::new("/media")
        .canonicalize()
        .is_ok_and(|canonical| canonical == Path::new("/media"));
    if !is_plain_dir {
        return;
    }
    let mount_point = policy
        .resolve_mount_point(Path::new("/media/mediamount-test-nonexistent"))
        .expect("valid");
    assert_eq!(
        mount_point.as_path(),
        Path::new("/media/mediamount-test-nonexistent")
    );
}

// ── Platform table ───────────────────────────────────────────────────

#[test]
fn native_platform_never_mounts_with_exec_or_setuid() {
    let options = PlatformFamily::current().mount_options(CallerIdentity::new(1000, 1000));
    assert!(options.contains("noexec"));
    assert!(options.contains("nosuid"));
    assert!(!options.contains("uid=0,"));
}
