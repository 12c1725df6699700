// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Core type definitions for memfs

use std::time::SystemTime;

/// File type mask of `st_mode`
pub const S_IFMT: u32 = libc::S_IFMT as u32;
/// Directory type bits
pub const S_IFDIR: u32 = libc::S_IFDIR as u32;
/// Regular file type bits
pub const S_IFREG: u32 = libc::S_IFREG as u32;

/// Size reported for every directory, matching a single 4 KiB block.
pub const DIR_SIZE: u64 = 4096;

/// File timestamps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileTimes {
    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,
}

impl FileTimes {
    /// All three timestamps set to the current wall clock.
    pub fn now() -> Self {
        let now = SystemTime::now();
        Self {
            atime: now,
            mtime: now,
            ctime: now,
        }
    }
}

/// Node attributes, the `stat` record of a node.
///
/// Always handed out by value: a copy reflects the node at the moment it was
/// taken and does not follow later mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attributes {
    pub ino: u64,
    /// Type and permission bits (`st_mode`)
    pub mode: u32,
    pub nlink: u32,
    pub uid: u32,
    pub gid: u32,
    /// Device number passed to `mknod`
    pub rdev: u64,
    pub size: u64,
    pub times: FileTimes,
}

impl Attributes {
    pub fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }

    pub fn is_file(&self) -> bool {
        self.mode & S_IFMT == S_IFREG
    }

    /// Permission bits without the file type.
    pub fn perm(&self) -> u32 {
        self.mode & 0o7777
    }
}

/// Owning user and group stamped on new nodes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Owner {
    pub uid: u32,
    pub gid: u32,
}

impl Owner {
    /// Real uid/gid of the running process.
    pub fn current() -> Self {
        Self {
            uid: nix::unistd::getuid().as_raw(),
            gid: nix::unistd::getgid().as_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(mode: u32) -> Attributes {
        Attributes {
            ino: 7,
            mode,
            nlink: 1,
            uid: 1000,
            gid: 1000,
            rdev: 0,
            size: 0,
            times: FileTimes::now(),
        }
    }

    #[test]
    fn type_predicates_follow_mode_bits() {
        assert!(attrs(S_IFDIR | 0o755).is_dir());
        assert!(!attrs(S_IFDIR | 0o755).is_file());
        assert!(attrs(S_IFREG | 0o644).is_file());
        assert_eq!(attrs(S_IFREG | 0o4644).perm(), 0o4644);
    }
}
