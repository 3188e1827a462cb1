//! Argument vectors for the system mount, eject and unmount utilities.
//!
//! Each OS family's mount utility accepts a different option set, so the
//! options are a fixed table per family rather than anything negotiated at
//! runtime. Programs are looked up only in the safe `PATH`.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use mediamount_common::constants::SAFE_PATH;
use mediamount_common::types::CallerIdentity;

use crate::validate::{DevicePath, MountPointPath};

/// A program plus a discrete argument vector. Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Starts a command for `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program name as configured.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments, excluding the program name.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Locates the program in the safe `PATH`, ignoring the inherited one.
    #[must_use]
    pub fn resolve(&self) -> Option<PathBuf> {
        which::which_in(&self.program, Some(SAFE_PATH), "/").ok()
    }

    /// Builds a [`Command`] for the resolved program with `PATH` pinned to
    /// the safe list.
    #[must_use]
    pub fn to_command(&self, resolved: &Path) -> Command {
        let mut command = Command::new(resolved);
        let _ = command.args(&self.args).env("PATH", SAFE_PATH);
        command
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Builds the utility invocations the operations run.
pub trait MediaTools {
    /// Invocation that mounts `device` at `mount_point` for `caller`.
    fn mount_command(
        &self,
        device: &DevicePath,
        mount_point: &MountPointPath,
        caller: CallerIdentity,
    ) -> ToolCommand;

    /// Invocation that ejects `device`.
    fn eject_command(&self, device: &DevicePath) -> ToolCommand;

    /// Invocation that detaches whatever is mounted at `mount_point`.
    fn unmount_command(&self, mount_point: &MountPointPath) -> ToolCommand;
}

/// Operating-system families with distinct mount utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    /// util-linux `mount`, `eject`, `umount`.
    Linux,
    /// FreeBSD `mount -t msdosfs`; no `eject`, so ejecting is an unmount.
    FreeBsd,
    /// NetBSD `mount_msdos` and `eject`.
    NetBsd,
}

impl PlatformFamily {
    /// Family of the platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "freebsd") {
            Self::FreeBsd
        } else if cfg!(target_os = "netbsd") {
            Self::NetBsd
        } else {
            Self::Linux
        }
    }

    /// Comma-separated `-o` option string for this family.
    ///
    /// Every family mounts read-write, without exec or setuid, and with
    /// synchronous writes. The caller's ids are embedded where the option
    /// syntax allows it.
    #[must_use]
    pub fn mount_options(self, caller: CallerIdentity) -> String {
        match self {
            Self::Linux => format!(
                "rw,noexec,nosuid,sync,nodev,quiet,shortname=mixed,uid={},gid={},\
                 umask=077,fmask=0177,dmask=0077,utf8,iocharset=iso8859-1",
                caller.uid, caller.gid
            ),
            Self::FreeBsd => format!(
                "rw,noexec,nosuid,sync,-u={},-g={}",
                caller.uid, caller.gid
            ),
            Self::NetBsd => "rw,noexec,nosuid,sync,nodev".to_string(),
        }
    }
}

impl MediaTools for PlatformFamily {
    fn mount_command(
        &self,
        device: &DevicePath,
        mount_point: &MountPointPath,
        caller: CallerIdentity,
    ) -> ToolCommand {
        let options = self.mount_options(caller);
        let base = match self {
            Self::Linux => ToolCommand::new("mount").arg("-t").arg("auto"),
            Self::FreeBsd => ToolCommand::new("mount").arg("-t").arg("msdosfs"),
            Self::NetBsd => ToolCommand::new("mount_msdos")
                .arg("-u")
                .arg(caller.uid.to_string())
                .arg("-g")
                .arg(caller.gid.to_string()),
        };
        base.arg("-o")
            .arg(options)
            .arg(device.as_path())
            .arg(mount_point.as_path())
    }

    fn eject_command(&self, device: &DevicePath) -> ToolCommand {
        match self {
            Self::Linux => ToolCommand::new("eject").arg("-s").arg(device.as_path()),
            Self::FreeBsd => ToolCommand::new("umount").arg(device.as_path()),
            Self::NetBsd => ToolCommand::new("eject").arg(device.as_path()),
        }
    }

    fn unmount_command(&self, mount_point: &MountPointPath) -> ToolCommand {
        match self {
            Self::FreeBsd => ToolCommand::new("umount").arg(mount_point.as_path()),
            Self::Linux | Self::NetBsd => ToolCommand::new("umount")
                .arg("-l")
                .arg(mount_point.as_path()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DevicePath {
        DevicePath::assumed("/dev/sdb1")
    }

    fn mount_point() -> MountPointPath {
        MountPointPath::assumed("/media/usb")
    }

    fn rendered(command: &ToolCommand) -> String {
        command.to_string()
    }

    #[test]
    fn linux_options_carry_caller_ids_and_charsets() {
        let options = PlatformFamily::Linux.mount_options(CallerIdentity::new(1000, 1001));
        assert_eq!(
            options,
            "rw,noexec,nosuid,sync,nodev,quiet,shortname=mixed,uid=1000,gid=1001,\
             umask=077,fmask=0177,dmask=0077,utf8,iocharset=iso8859-1"
        );
    }

    #[test]
    fn every_family_forbids_exec_and_setuid() {
        let caller = CallerIdentity::new(1000, 1000);
        for family in [
            PlatformFamily::Linux,
            PlatformFamily::FreeBsd,
            PlatformFamily::NetBsd,
        ] {
            let options = family.mount_options(caller);
            assert!(options.starts_with("rw,noexec,nosuid,sync"), "{family:?}");
        }
    }

    #[test]
    fn linux_mount_command_is_an_argument_vector() {
        let cmd = PlatformFamily::Linux.mount_command(
            &device(),
            &mount_point(),
            CallerIdentity::new(1000, 1000),
        );
        assert_eq!(cmd.program(), "mount");
        assert_eq!(&cmd.args()[..3], &["-t", "auto", "-o"].map(OsString::from)[..]);
        assert_eq!(cmd.args()[4], OsString::from("/dev/sdb1"));
        assert_eq!(cmd.args()[5], OsString::from("/media/usb"));
        assert_eq!(cmd.args().len(), 6);
    }

    #[test]
    fn freebsd_mount_uses_msdosfs_and_inline_ids() {
        let cmd = PlatformFamily::FreeBsd.mount_command(
            &device(),
            &mount_point(),
            CallerIdentity::new(1001, 20),
        );
        assert_eq!(
            rendered(&cmd),
            "mount -t msdosfs -o rw,noexec,nosuid,sync,-u=1001,-g=20 /dev/sdb1 /media/usb"
        );
    }

    #[test]
    fn netbsd_mount_passes_ids_as_flags() {
        let cmd = PlatformFamily::NetBsd.mount_command(
            &device(),
            &mount_point(),
            CallerIdentity::new(1001, 100),
        );
        assert_eq!(
            rendered(&cmd),
            "mount_msdos -u 1001 -g 100 -o rw,noexec,nosuid,sync,nodev /dev/sdb1 /media/usb"
        );
    }

    #[test]
    fn eject_and_unmount_commands_per_family() {
        assert_eq!(
            rendered(&PlatformFamily::Linux.eject_command(&device())),
            "eject -s /dev/sdb1"
        );
        assert_eq!(
            rendered(&PlatformFamily::FreeBsd.eject_command(&device())),
            "umount /dev/sdb1"
        );
        assert_eq!(
            rendered(&PlatformFamily::Linux.unmount_command(&mount_point())),
            "umount -l /media/usb"
        );
        assert_eq!(
            rendered(&PlatformFamily::FreeBsd.unmount_command(&mount_point())),
            "umount /media/usb"
        );
    }

    #[test]
    fn resolve_ignores_inherited_path() {
        assert!(ToolCommand::new("definitely-not-a-real-tool-7f3a").resolve().is_none());
        assert!(ToolCommand::new("sh").resolve().is_some());
    }

    #[test]
    fn built_command_pins_safe_path() {
        let tool = ToolCommand::new("sh").arg("-c").arg("exit 0");
        let resolved = tool.resolve().expect("sh is installed");
        let command = tool.to_command(&resolved);
        let path = command
            .get_envs()
            .find(|(key, _)| key.to_str() == Some("PATH"))
            .and_then(|(_, value)| value);
        assert_eq!(path, Some(std::ffi::OsStr::new(SAFE_PATH)));
        assert_eq!(command.get_args().count(), 2);
    }
}
