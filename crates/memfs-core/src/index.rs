// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Path resolution, node creation and inode allocation.
//!
//! Lookups take node locks one segment at a time and release the parent before
//! moving on, so a walk may race with insertions elsewhere in the tree: a
//! sibling created mid-walk may or may not be seen. There is no tree-wide
//! lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::config::{FsLimits, MemFsConfig};
use crate::error::{FsError, FsResult};
use crate::node::{Node, NodeRef};
use crate::types::{Attributes, FileTimes, Owner, DIR_SIZE, S_IFDIR, S_IFMT, S_IFREG};

/// Inode number given to the root directory.
pub const ROOT_INODE: u64 = 1;

/// Name of the root node.
pub const ROOT_NAME: &str = "/";

/// One mounted filesystem: the tree, its inode counter and an inode lookup
/// table.
#[derive(Debug)]
pub struct Index {
    root: NodeRef,
    next_inode: AtomicU64,
    // Side table for inode-addressed callers; never locked while a node lock is held.
    inodes: RwLock<HashMap<u64, Weak<Node>>>,
    owner: Owner,
    limits: FsLimits,
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Split at the last `/` into (parent path, final name).
fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    }
}

impl Index {
    /// Create an index owned by the running process's real uid/gid.
    pub fn new(config: &MemFsConfig) -> Self {
        Self::with_owner(config, Owner::current())
    }

    pub fn with_owner(config: &MemFsConfig, owner: Owner) -> Self {
        let next_inode = AtomicU64::new(ROOT_INODE);
        let ino = next_inode.fetch_add(1, Ordering::Relaxed);
        let root = Arc::new(Node::directory(
            ROOT_NAME,
            Attributes {
                ino,
                mode: S_IFDIR | (config.root_mode & 0o7777),
                nlink: 2,
                uid: owner.uid,
                gid: owner.gid,
                rdev: 0,
                size: DIR_SIZE,
                times: FileTimes::now(),
            },
        ));

        let mut inodes = HashMap::new();
        inodes.insert(ino, Arc::downgrade(&root));

        Self {
            root,
            next_inode,
            inodes: RwLock::new(inodes),
            owner,
            limits: config.limits.clone(),
        }
    }

    pub fn root(&self) -> NodeRef {
        Arc::clone(&self.root)
    }

    pub fn limits(&self) -> &FsLimits {
        &self.limits
    }

    /// Hand out the next inode number. Numbers are never reused.
    pub fn alloc_inode(&self) -> u64 {
        self.next_inode.fetch_add(1, Ordering::Relaxed)
    }

    /// Walk `path` from the root. Empty segments are ignored, so `""`, `"/"`
    /// and `"//"` all name the root.
    pub fn resolve(&self, path: &str) -> FsResult<NodeRef> {
        let mut current = Arc::clone(&self.root);
        for segment in segments(path) {
            // `child` holds the parent's read lock only for the map lookup.
            let next = current.child(segment)?;
            current = next;
        }
        Ok(current)
    }

    /// Attribute snapshot of the node at `path`.
    pub fn status(&self, path: &str) -> FsResult<Attributes> {
        self.resolve(path).map(|node| node.attributes())
    }

    /// Create a node at `path`.
    ///
    /// The file type comes from `mode`: `S_IFDIR` makes a directory, `S_IFREG`
    /// (or no type bits at all) a regular file. An existing entry of the same
    /// name is left alone and the call fails with `AlreadyExists`.
    pub fn create_node(&self, path: &str, mode: u32, rdev: u64) -> FsResult<NodeRef> {
        let (parent_path, name) = split_parent(path);
        if name.is_empty() {
            return Err(FsError::AlreadyExists);
        }

        let is_dir = match mode & S_IFMT {
            S_IFDIR => true,
            0 | S_IFREG => false,
            _ => return Err(FsError::Unsupported),
        };
        let mode = if mode & S_IFMT == 0 { mode | S_IFREG } else { mode };

        let parent = self.resolve(parent_path)?;
        let child = parent.insert_child(name, || {
            let attrs = Attributes {
                ino: self.alloc_inode(),
                mode,
                nlink: if is_dir { 2 } else { 1 },
                uid: self.owner.uid,
                gid: self.owner.gid,
                rdev,
                size: if is_dir { DIR_SIZE } else { 0 },
                times: FileTimes::now(),
            };
            if is_dir {
                Node::directory(name, attrs)
            } else {
                Node::file(name, attrs)
            }
        })?;

        let ino = child.attributes().ino;
        self.inodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ino, Arc::downgrade(&child));
        Ok(child)
    }

    /// Node with inode number `ino`, if it is still alive.
    pub fn node_by_inode(&self, ino: u64) -> Option<NodeRef> {
        self.inodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ino)
            .and_then(Weak::upgrade)
    }
}
