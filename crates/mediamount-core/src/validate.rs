//! Canonicalization and whitelisting of caller-supplied paths.
//!
//! Containment is a byte-prefix test of the canonical path against the root
//! including its trailing `/`, so `/mediafoo` is never mistaken for a child
//! of `/media`. Canonicalizing first means `..` and symlinks cannot be used
//! to step outside a root.

use std::fmt;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::FileTypeExt;
use std::path::{Component, Path, PathBuf};

use mediamount_common::config::HelperConfig;
use mediamount_common::error::{HelperError, Result};

/// A canonical path to a block device under the device root.
///
/// Only [`PathPolicy::validate_device`] produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePath(PathBuf);

impl DevicePath {
    /// Borrows the canonical device path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn assumed(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// A mount point under the mount root. Canonical when it already existed
/// at validation time, the raw caller path otherwise.
///
/// Only [`PathPolicy`] produces one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPointPath(PathBuf);

impl MountPointPath {
    /// Borrows the mount point path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Wraps a path the caller has just re-checked against the mount root.
    pub(crate) const fn rechecked(path: PathBuf) -> Self {
        Self(path)
    }

    #[cfg(test)]
    pub(crate) fn assumed(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl fmt::Display for MountPointPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// Root whitelist applied to device and mount-point arguments.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    device_root: PathBuf,
    device_prefix: Vec<u8>,
    mount_root: PathBuf,
    mount_prefix: Vec<u8>,
    shm_segment: Vec<u8>,
}

impl PathPolicy {
    /// Builds the policy from the configured roots.
    #[must_use]
    pub fn new(config: &HelperConfig) -> Self {
        Self {
            device_root: config.device_root.clone(),
            device_prefix: root_prefix(&config.device_root),
            mount_root: config.mount_root.clone(),
            mount_prefix: root_prefix(&config.mount_root),
            shm_segment: config.shm_segment.as_bytes().to_vec(),
        }
    }

    /// Validates a device argument and returns its canonical form.
    ///
    /// # Errors
    ///
    /// - [`HelperError::InvalidArgument`] if the path is shorter than the device root.
    /// - [`HelperError::ResolutionError`] if it cannot be canonicalized.
    /// - [`HelperError::PolicyViolation`] if it resolves outside the device root,
    ///   touches a shared-memory location, or cannot be stat'ed.
    /// - [`HelperError::NotABlockDevice`] if the node is not a block device.
    pub fn validate_device(&self, raw: &Path) -> Result<DevicePath> {
        if raw.as_os_str().len() < self.device_prefix.len() {
            return Err(HelperError::InvalidArgument {
                message: format!("device path {:?} is too short", raw.display().to_string()),
            });
        }

        let canonical = raw.canonicalize().map_err(|source| HelperError::ResolutionError {
            path: raw.to_path_buf(),
            source,
        })?;

        if !has_prefix(&canonical, &self.device_prefix) {
            return Err(HelperError::PolicyViolation {
                path: canonical,
                reason: format!("device node is not under {}", self.device_root.display()),
            });
        }

        if contains_segment(raw, &self.shm_segment) || contains_segment(&canonical, &self.shm_segment)
        {
            return Err(HelperError::PolicyViolation {
                path: canonical,
                reason: "device node is in a shared-memory location".into(),
            });
        }

        let metadata = std::fs::metadata(&canonical).map_err(|e| HelperError::PolicyViolation {
            path: canonical.clone(),
            reason: format!("stat on device node failed: {e}"),
        })?;

        if !metadata.file_type().is_block_device() {
            return Err(HelperError::NotABlockDevice { path: canonical });
        }

        tracing::debug!(device = %canonical.display(), "device validated");
        Ok(DevicePath(canonical))
    }

    /// Validates a mount-point argument that may not exist yet.
    ///
    /// An existing path must canonicalize under the mount root. The raw
    /// string must also start with the mount root, must not contain `..`,
    /// and, when the target is missing, its parent must resolve under
    /// the root so the directory cannot be created elsewhere.
    ///
    /// # Errors
    ///
    /// - [`HelperError::InvalidArgument`] if the path is shorter than the mount root.
    /// - [`HelperError::ResolutionError`] if an existing path cannot be canonicalized.
    /// - [`HelperError::PolicyViolation`] if any containment rule fails.
    pub fn validate_mount_point(&self, raw: &Path) -> Result<MountPointPath> {
        if raw.as_os_str().len() < self.mount_prefix.len() {
            return Err(HelperError::InvalidArgument {
                message: format!("mount point {:?} is too short", raw.display().to_string()),
            });
        }

        let resolved = if raw.symlink_metadata().is_ok() {
            let canonical = raw.canonicalize().map_err(|source| HelperError::ResolutionError {
                path: raw.to_path_buf(),
                source,
            })?;
            if !has_prefix(&canonical, &self.mount_prefix) {
                return Err(self.outside_mount_root(canonical));
            }
            Some(canonical)
        } else {
            None
        };

        if !has_prefix(raw, &self.mount_prefix) {
            return Err(self.outside_mount_root(raw.to_path_buf()));
        }

        if raw.components().any(|c| c == Component::ParentDir) {
            return Err(HelperError::PolicyViolation {
                path: raw.to_path_buf(),
                reason: "mount point must not contain '..'".into(),
            });
        }

        if resolved.is_none() && !self.parent_is_contained(raw) {
            return Err(self.outside_mount_root(raw.to_path_buf()));
        }

        let path = resolved.unwrap_or_else(|| raw.to_path_buf());
        tracing::debug!(mount_point = %path.display(), "mount point validated");
        Ok(MountPointPath(path))
    }

    /// Canonicalizes the argument when it exists, then validates it.
    ///
    /// Used for `mount`, where the mount point is usually created later.
    ///
    /// # Errors
    ///
    /// Same as [`Self::validate_mount_point`].
    pub fn resolve_mount_point(&self, raw: &Path) -> Result<MountPointPath> {
        let candidate = raw.canonicalize().unwrap_or_else(|_| raw.to_path_buf());
        self.validate_mount_point(&candidate)
    }

    /// Canonicalizes an argument that must already exist, then validates it.
    ///
    /// # Errors
    ///
    /// [`HelperError::ResolutionError`] if the mount point does not exist,
    /// otherwise the same as [`Self::validate_mount_point`].
    pub fn resolve_existing_mount_point(&self, raw: &Path) -> Result<MountPointPath> {
        let canonical = raw.canonicalize().map_err(|source| HelperError::ResolutionError {
            path: raw.to_path_buf(),
            source,
        })?;
        self.validate_mount_point(&canonical)
    }

    /// Returns `true` if `path` starts with the mount root prefix.
    #[must_use]
    pub fn is_under_mount_root(&self, path: &Path) -> bool {
        has_prefix(path, &self.mount_prefix)
    }

    /// The configured mount root.
    #[must_use]
    pub fn mount_root(&self) -> &Path {
        &self.mount_root
    }

    fn parent_is_contained(&self, raw: &Path) -> bool {
        let Some(parent) = raw.parent() else {
            return false;
        };
        match parent.canonicalize() {
            Ok(canonical) => {
                let mut bytes = canonical.as_os_str().as_bytes().to_vec();
                if bytes.last() != Some(&b'/') {
                    bytes.push(b'/');
                }
                bytes.starts_with(&self.mount_prefix)
            }
            // mkdir will fail on a missing parent; the post-create check reports it.
            Err(_) => true,
        }
    }

    fn outside_mount_root(&self, path: PathBuf) -> HelperError {
        HelperError::PolicyViolation {
            path,
            reason: format!("mount point is not under {}", self.mount_root.display()),
        }
    }
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self::new(&HelperConfig::default())
    }
}

fn root_prefix(root: &Path) -> Vec<u8> {
    let mut bytes = root.as_os_str().as_bytes().to_vec();
    if bytes.last() != Some(&b'/') {
        bytes.push(b'/');
    }
    bytes
}

fn has_prefix(path: &Path, prefix: &[u8]) -> bool {
    path.as_os_str().as_bytes().starts_with(prefix)
}

fn contains_segment(path: &Path, segment: &[u8]) -> bool {
    !segment.is_empty()
        && path
            .as_os_str()
            .as_bytes()
            .windows(segment.len())
            .any(|window| window == segment)
}
