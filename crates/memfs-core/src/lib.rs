// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! memfs core: an in-memory tree of directories and regular files.
//!
//! [`Index`] owns the tree and resolves slash-delimited paths to [`Node`]s;
//! each node serves its own attributes, children or bytes under a per-node
//! reader/writer lock. Nothing here knows about the kernel boundary.

pub mod config;
pub mod error;
pub mod index;
pub mod node;
pub mod types;

pub use config::{CachePolicy, FsLimits, IoPolicy, MemFsConfig};
pub use error::{FsError, FsResult};
pub use index::{Index, ROOT_INODE, ROOT_NAME};
pub use node::{Node, NodeRef};
pub use types::{Attributes, FileTimes, Owner, DIR_SIZE, S_IFDIR, S_IFMT, S_IFREG};
