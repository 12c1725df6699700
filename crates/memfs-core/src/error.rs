// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the memfs index

use libc::{c_int, EEXIST, EFBIG, EINVAL, EISDIR, ENOENT, ENOSYS, ENOTDIR};

/// Core filesystem error type
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("not a directory")]
    NotADirectory,
    #[error("is a directory")]
    IsADirectory,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("file size limit exceeded")]
    NoSpace,
    #[error("unsupported")]
    Unsupported,
}

impl FsError {
    /// Positive errno the kernel expects for this failure kind.
    pub fn errno(self) -> c_int {
        match self {
            FsError::NotFound => ENOENT,
            FsError::AlreadyExists => EEXIST,
            FsError::NotADirectory => ENOTDIR,
            FsError::IsADirectory => EISDIR,
            FsError::InvalidArgument => EINVAL,
            FsError::NoSpace => EFBIG,
            FsError::Unsupported => ENOSYS,
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;
