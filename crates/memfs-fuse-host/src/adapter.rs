// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! memfs FUSE adapter implementation
//!
//! Maps FUSE operations onto the [`Index`] and byte access on the resolved
//! nodes. Inode-addressed callbacks go through the index's inode table.
//! Callbacks naming a child (lookup, the create family, readdir) need a path,
//! so the adapter also keeps the canonical path of every inode it has handed
//! out; paths never change because entries are never renamed or removed.

#[cfg(not(all(feature = "fuse", target_os = "linux")))]
compile_error!("This module requires the 'fuse' feature on Linux");

use crate::dispatch::{IoDispatcher, worker_count};
use fuser::{
    FUSE_ROOT_ID, FileAttr, FileType, ReplyAttr, ReplyCreate, ReplyData, ReplyDirectory,
    ReplyEmpty, ReplyEntry, ReplyOpen, ReplyWrite, Request, TimeOrNow,
};
use libc::{EBADF, EINVAL, ENAMETOOLONG, ENOENT, ENOMEM, c_int};
use memfs_core::{
    Attributes, FsResult, Index, MemFsConfig, NodeRef, ROOT_NAME, S_IFDIR, S_IFMT, S_IFREG,
};
use memfs_logging::OPS_TARGET;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

/// Maximum single path component length to guard against overly long names
const NAME_MAX: usize = 255;

const BLOCK_SIZE: u32 = 512;

const DEFAULT_MAX_BACKGROUND: u16 = 64;

/// Environment override for the kernel's background request limit.
pub const MAX_BACKGROUND_ENV: &str = "MEMFS_FUSE_MAX_BACKGROUND";

/// Inode, kind and name of one directory listing entry.
type DirEntry = (u64, FileType, String);

/// An open file: holds its node for as long as the kernel keeps the handle.
struct Fd {
    node: NodeRef,
}

/// memfs FUSE filesystem adapter
pub struct MemFsFuse {
    index: Arc<Index>,
    /// TTL for attribute cache responses
    attr_ttl: Duration,
    /// TTL for directory entry cache responses
    entry_ttl: Duration,
    /// Inode to canonical path, filled by lookup and the create family
    paths: HashMap<u64, String>,
    handles: HashMap<u64, Fd>,
    next_fh: u64,
    io: IoDispatcher,
}

impl MemFsFuse {
    pub fn new(index: Arc<Index>, config: &MemFsConfig) -> Self {
        let mut paths = HashMap::new();
        paths.insert(FUSE_ROOT_ID, ROOT_NAME.to_string());

        Self {
            index,
            attr_ttl: Duration::from_millis(u64::from(config.cache.attr_ttl_ms)),
            entry_ttl: Duration::from_millis(u64::from(config.cache.entry_ttl_ms)),
            paths,
            handles: HashMap::new(),
            next_fh: 1,
            io: IoDispatcher::new(worker_count(&config.io)),
        }
    }

    fn max_file_bytes(&self) -> Option<u64> {
        self.index.limits().max_file_bytes
    }

    /// Node for `ino`, or `ENOENT` once nothing in the tree holds it.
    fn node_of(&self, ino: u64) -> Result<NodeRef, c_int> {
        self.index.node_by_inode(ino).ok_or(ENOENT)
    }

    fn path_of(&self, ino: u64) -> Option<&str> {
        self.paths.get(&ino).map(String::as_str)
    }

    fn child_path(&self, parent: u64, name: &OsStr) -> Result<String, c_int> {
        let name = name.to_str().ok_or(EINVAL)?;
        if name.len() > NAME_MAX {
            return Err(ENAMETOOLONG);
        }
        let parent_path = self.path_of(parent).ok_or(ENOENT)?;
        Ok(join_path(parent_path, name))
    }

    fn open_handle(&mut self, node: NodeRef) -> u64 {
        let fh = self.next_fh;
        self.next_fh += 1;
        self.handles.insert(fh, Fd { node });
        fh
    }

    fn handle_node(&self, fh: u64) -> Option<NodeRef> {
        self.handles.get(&fh).map(|fd| Arc::clone(&fd.node))
    }

    fn create_entry(&mut self, path: String, mode: u32, rdev: u64) -> FsResult<(NodeRef, FileAttr)> {
        let node = self.index.create_node(&path, mode, rdev)?;
        let attrs = node.attributes();
        self.paths.insert(attrs.ino, path);
        Ok((node, attr_to_fuse(&attrs)))
    }

    /// `.`, `..`, then the children sorted by name so offsets stay meaningful
    /// between pages of the same listing.
    fn dir_entries(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        let node = self.index.resolve(path)?;
        let mut children = node.children()?;
        children.sort_by(|a, b| a.name().cmp(b.name()));

        let ino = node.attributes().ino;
        let parent_ino = self.index.status(parent_path(path)).map(|a| a.ino).unwrap_or(ino);

        let mut entries = Vec::with_capacity(children.len() + 2);
        entries.push((ino, FileType::Directory, ".".to_string()));
        entries.push((parent_ino, FileType::Directory, "..".to_string()));
        for child in children {
            let attrs = child.attributes();
            entries.push((attrs.ino, file_type(&attrs), child.name().to_string()));
        }
        Ok(entries)
    }
}

/// Offer the entries after `offset` to `add`, which returns `true` once the
/// reply buffer is full. Each entry carries the offset the kernel resumes from.
/// A full buffer ends the page, unless not even its first entry fit (`ENOMEM`).
fn fill_dir_page<F>(entries: &[DirEntry], offset: i64, mut add: F) -> Result<usize, c_int>
where
    F: FnMut(u64, i64, FileType, &str) -> bool,
{
    let skip = usize::try_from(offset).unwrap_or(0);
    let mut added = 0usize;
    for (i, (ino, kind, name)) in entries.iter().enumerate().skip(skip) {
        if add(*ino, (i + 1) as i64, *kind, name) {
            if added == 0 {
                return Err(ENOMEM);
            }
            break;
        }
        added += 1;
    }
    Ok(added)
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn parent_path(path: &str) -> &str {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) | None => ROOT_NAME,
        Some((head, _)) => head,
    }
}

/// Type bits from `mode`, permission bits filtered through `umask`.
fn creation_mode(file_type: u32, mode: u32, umask: u32) -> u32 {
    file_type | (mode & !umask & 0o7777)
}

fn file_type(attrs: &Attributes) -> FileType {
    if attrs.is_dir() {
        FileType::Directory
    } else {
        FileType::RegularFile
    }
}

fn attr_to_fuse(attrs: &Attributes) -> FileAttr {
    FileAttr {
        ino: attrs.ino,
        size: attrs.size,
        blocks: attrs.size.div_ceil(u64::from(BLOCK_SIZE)),
        atime: attrs.times.atime,
        mtime: attrs.times.mtime,
        ctime: attrs.times.ctime,
        crtime: attrs.times.ctime,
        kind: file_type(attrs),
        perm: attrs.perm() as u16,
        nlink: attrs.nlink,
        uid: attrs.uid,
        gid: attrs.gid,
        rdev: attrs.rdev.try_into().unwrap_or(u32::MAX),
        blksize: BLOCK_SIZE,
        flags: 0,
    }
}

fn desired_max_background() -> u16 {
    std::env::var(MAX_BACKGROUND_ENV)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MAX_BACKGROUND)
}

impl fuser::Filesystem for MemFsFuse {
    fn init(&mut self, _req: &Request, config: &mut fuser::KernelConfig) -> Result<(), c_int> {
        let desired = desired_max_background();
        match config.set_max_background(desired) {
            Ok(_) => info!("Configured FUSE max_background={}", desired),
            Err(limit) => {
                let _ = config.set_max_background(limit);
                warn!("Kernel limited max_background to {} (desired {}).", limit, desired);
            }
        }

        info!(
            target: OPS_TARGET,
            max_background = desired,
            io_threads = self.io.worker_count(),
            "init"
        );
        Ok(())
    }

    fn destroy(&mut self) {
        info!(target: OPS_TARGET, open_handles = self.handles.len(), "destroy");
    }

    fn forget(&mut self, _req: &Request, ino: u64, nlookup: u64) {
        info!(target: OPS_TARGET, ino, nlookup, "forget");
        if ino != FUSE_ROOT_ID {
            self.paths.remove(&ino);
        }
    }

    fn lookup(&mut self, _req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
        info!(target: OPS_TARGET, parent, name = ?name, "lookup");
        let path = match self.child_path(parent, name) {
            Ok(path) => path,
            Err(errno) => {
                reply.error(errno);
                return;
            }
        };

        match self.index.status(&path) {
            Ok(attrs) => {
                let fuse_attr = attr_to_fuse(&attrs);
                self.paths.insert(attrs.ino, path);
                reply.entry(&self.entry_ttl, &fuse_attr, 0);
            }
            Err(err) => reply.error(err.errno()),
        }
    }

    fn getattr(&mut self, _req: &Request, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        info!(target: OPS_TARGET, ino, "getattr");
        match self.node_of(ino) {
            Ok(node) => reply.attr(&self.attr_ttl, &attr_to_fuse(&node.attributes())),
            Err(errno) => reply.error(errno),
        }
    }

    fn setattr(
        &mut self,
        _req: &Request,
        ino: u64,
        _mode: Option<u32>,
        _uid: Option<u32>,
        _gid: Option<u32>,
        size: Option<u64>,
        _atime: Option<TimeOrNow>,
        _mtime: Option<TimeOrNow>,
        _ctime: Option<SystemTime>,
        fh: Option<u64>,
        _crtime: Option<SystemTime>,
        _chgtime: Option<SystemTime>,
        _bkuptime: Option<SystemTime>,
        _flags: Option<u32>,
        reply: ReplyAttr,
    ) {
        info!(target: OPS_TARGET, ino, size = ?size, fh = ?fh, "setattr");
        let node = match fh.and_then(|fh| self.handle_node(fh)) {
            Some(node) => node,
            None => match self.node_of(ino) {
                Ok(node) => node,
                Err(errno) => {
                    reply.error(errno);
                    return;
                }
            },
        };

        // Only size changes are applied; everything else is echoed back.
        if let Some(size) = size {
            if let Err(err) = node.truncate(size, self.max_file_bytes()) {
                reply.error(err.errno());
                return;
            }
        }
        reply.attr(&self.attr_ttl, &attr_to_fuse(&node.attributes()));
    }

    fn mknod(
        &mut self,
        _req: &Request,
        parent: u64,
        name: &OsStr,
        mode: u32,
        umask: u32,
        rdev: u32,
        reply: ReplyEntry,
    ) {
        info!(target: OPS_TARGET, parent, name = ?name, mode, rdev, "mknod");
        let path = match self.child_path(parent, name) {
            Ok(path) => path,
            Err(errno) => {
                reply.error(errno);
                return;
            }
        };

        let final_mode = creation_mode(mode & S_IFMT, mode, umask);
        match self.create_entry(path, final_mode, u64::from(rdev)) {
            Ok((_, fuse_attr)) => reply.entry(&self.entry_ttl, &fuse_attr, 0),
            Err(err) => reply.error(err.errno()),
        }
    }

    fn mkdir(
        &mut self,
        _req: &Request,
        parent: u64,
        name: &OsStr,
        mode: u32,
        umask: u32,
        reply: ReplyEntry,
    ) {
        info!(target: OPS_TARGET, parent, name = ?name, mode, "mkdir");
        let path = match self.child_path(parent, name) {
            Ok(path) => path,
            Err(errno) => {
                reply.error(errno);
                return;
            }
        };

        match self.create_entry(path, creation_mode(S_IFDIR, mode, umask), 0) {
            Ok((_, fuse_attr)) => reply.entry(&self.entry_ttl, &fuse_attr, 0),
            Err(err) => reply.error(err.errno()),
        }
    }

    fn create(
        &mut self,
        _req: &Request,
        parent: u64,
        name: &OsStr,
        mode: u32,
        umask: u32,
        flags: i32,
        reply: ReplyCreate,
    ) {
        info!(target: OPS_TARGET, parent, name = ?name, mode, flags, "create");
        let path = match self.child_path(parent, name) {
            Ok(path) => path,
            Err(errno) => {
                reply.error(errno);
                return;
            }
        };

        match self.create_entry(path, creation_mode(S_IFREG, mode, umask), 0) {
            Ok((node, fuse_attr)) => {
                let fh = self.open_handle(node);
                reply.created(&self.entry_ttl, &fuse_attr, 0, fh, 0);
            }
            Err(err) => reply.error(err.errno()),
        }
    }

    fn open(&mut self, _req: &Request, ino: u64, flags: i32, reply: ReplyOpen) {
        info!(target: OPS_TARGET, ino, flags, "open");
        let node = match self.node_of(ino) {
            Ok(node) => node,
            Err(errno) => {
                reply.error(errno);
                return;
            }
        };
        if flags & libc::O_TRUNC != 0 && !node.is_dir() {
            if let Err(err) = node.truncate(0, self.max_file_bytes()) {
                reply.error(err.errno());
                return;
            }
        }

        let fh = self.open_handle(node);
        reply.opened(fh, 0);
    }

    fn read(
        &mut self,
        _req: &Request,
        ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        info!(target: OPS_TARGET, ino, fh, size, offset, "read");
        let Some(node) = self.handle_node(fh) else {
            reply.error(EBADF);
            return;
        };
        let Ok(offset) = u64::try_from(offset) else {
            reply.error(EINVAL);
            return;
        };

        self.io.submit(move || {
            let mut buf = vec![0u8; size as usize];
            match node.read_into(offset, &mut buf) {
                Ok(bytes_read) => reply.data(&buf[..bytes_read]),
                Err(err) => reply.error(err.errno()),
            }
        });
    }

    fn write(
        &mut self,
        _req: &Request,
        ino: u64,
        fh: u64,
        offset: i64,
        data: &[u8],
        _write_flags: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyWrite,
    ) {
        info!(target: OPS_TARGET, ino, fh, size = data.len(), offset, "write");
        let Some(node) = self.handle_node(fh) else {
            reply.error(EBADF);
            return;
        };
        let Ok(offset) = u64::try_from(offset) else {
            reply.error(EINVAL);
            return;
        };

        let data = data.to_vec();
        let max_file_bytes = self.max_file_bytes();
        self.io.submit(move || match node.write_bounded(offset, &data, max_file_bytes) {
            Ok(written) => reply.written(u32::try_from(written).unwrap_or(u32::MAX)),
            Err(err) => reply.error(err.errno()),
        });
    }

    fn release(
        &mut self,
        _req: &Request,
        ino: u64,
        fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        info!(target: OPS_TARGET, ino, fh, "release");
        self.handles.remove(&fh);
        reply.ok();
    }

    fn readdir(
        &mut self,
        _req: &Request,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let Some(path) = self.path_of(ino) else {
            info!(target: OPS_TARGET, ino, offset, "readdir");
            reply.error(ENOENT);
            return;
        };
        info!(target: OPS_TARGET, ino, path, offset, "readdir");

        let entries = match self.dir_entries(path) {
            Ok(entries) => entries,
            Err(err) => {
                reply.error(err.errno());
                return;
            }
        };

        let page = fill_dir_page(&entries, offset, |entry_ino, next, kind, name| {
            reply.add(entry_ino, next, kind, name)
        });
        match page {
            Ok(_) => reply.ok(),
            Err(errno) => reply.error(errno),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memfs_core::{Owner, ROOT_INODE};

    fn adapter() -> MemFsFuse {
        let config = MemFsConfig::default();
        let index = Arc::new(Index::with_owner(&config, Owner { uid: 1000, gid: 1000 }));
        MemFsFuse::new(index, &config)
    }

    #[test]
    fn root_inode_matches_fuse_root() {
        assert_eq!(ROOT_INODE, FUSE_ROOT_ID);
        assert_eq!(adapter().path_of(FUSE_ROOT_ID), Some("/"));
    }

    #[test]
    fn cache_ttls_follow_config() {
        let mut config = MemFsConfig::default();
        config.cache.attr_ttl_ms = 1500;
        config.cache.entry_ttl_ms = 2500;
        let index = Arc::new(Index::new(&config));

        let fuse = MemFsFuse::new(index, &config);
        assert_eq!(fuse.attr_ttl, Duration::from_millis(1500));
        assert_eq!(fuse.entry_ttl, Duration::from_millis(2500));
    }

    #[test]
    fn child_paths_join_under_parent() {
        let mut fuse = adapter();
        assert_eq!(fuse.child_path(FUSE_ROOT_ID, OsStr::new("a")).unwrap(), "/a");

        fuse.create_entry("/a".to_string(), S_IFDIR | 0o755, 0).unwrap();
        let ino = fuse.index.status("/a").unwrap().ino;
        assert_eq!(fuse.child_path(ino, OsStr::new("b")).unwrap(), "/a/b");

        assert_eq!(fuse.child_path(9999, OsStr::new("b")), Err(ENOENT));
        let long = "x".repeat(NAME_MAX + 1);
        assert_eq!(fuse.child_path(FUSE_ROOT_ID, OsStr::new(&long)), Err(ENAMETOOLONG));
    }

    #[test]
    fn created_entries_are_addressable_by_inode() {
        let mut fuse = adapter();
        let (node, attr) = fuse.create_entry("/f".to_string(), S_IFREG | 0o640, 0).unwrap();

        assert_eq!(attr.ino, node.attributes().ino);
        assert_eq!(attr.kind, FileType::RegularFile);
        assert_eq!(attr.perm, 0o640);
        assert_eq!(fuse.path_of(attr.ino), Some("/f"));
    }

    #[test]
    fn duplicate_entry_maps_to_eexist() {
        let mut fuse = adapter();
        fuse.create_entry("/f".to_string(), S_IFREG | 0o644, 0).unwrap();
        let err = fuse.create_entry("/f".to_string(), S_IFREG | 0o644, 0).unwrap_err();
        assert_eq!(err.errno(), libc::EEXIST);
    }

    #[test]
    fn directory_listing_starts_with_dot_entries() {
        let mut fuse = adapter();
        fuse.create_entry("/d".to_string(), S_IFDIR | 0o755, 0).unwrap();
        fuse.create_entry("/d/b".to_string(), S_IFREG | 0o644, 0).unwrap();
        fuse.create_entry("/d/a".to_string(), S_IFDIR | 0o755, 0).unwrap();

        let entries = fuse.dir_entries("/d").unwrap();
        let names: Vec<&str> = entries.iter().map(|(_, _, name)| name.as_str()).collect();
        assert_eq!(names, vec![".", "..", "a", "b"]);

        let d_ino = fuse.index.status("/d").unwrap().ino;
        assert_eq!(entries[0].0, d_ino);
        assert_eq!(entries[1].0, ROOT_INODE);
        assert_eq!(entries[2].1, FileType::Directory);
        assert_eq!(entries[3].1, FileType::RegularFile);
    }

    #[test]
    fn listing_a_file_is_not_a_directory() {
        let mut fuse = adapter();
        fuse.create_entry("/f".to_string(), S_IFREG | 0o644, 0).unwrap();
        let err = fuse.dir_entries("/f").unwrap_err();
        assert_eq!(err.errno(), libc::ENOTDIR);
        assert_eq!(fuse.dir_entries("/missing").unwrap_err().errno(), libc::ENOENT);
    }

    #[test]
    fn open_handles_keep_nodes() {
        let mut fuse = adapter();
        let (node, _) = fuse.create_entry("/f".to_string(), S_IFREG | 0o644, 0).unwrap();
        let fh = fuse.open_handle(node);
        let second = fuse.open_handle(fuse.index.resolve("/f").unwrap());
        assert_ne!(fh, second);

        fuse.handle_node(fh).unwrap().write(0, b"data").unwrap();
        assert_eq!(fuse.handle_node(second).unwrap().read(0, 4).unwrap(), b"data");
        assert!(fuse.handle_node(999).is_none());
    }

    #[test]
    fn mode_and_attr_translation() {
        assert_eq!(creation_mode(S_IFREG, 0o666, 0o022), S_IFREG | 0o644);
        assert_eq!(creation_mode(S_IFDIR, S_IFDIR | 0o777, 0o027), S_IFDIR | 0o750);

        let fuse = adapter();
        let root = attr_to_fuse(&fuse.index.status("/").unwrap());
        assert_eq!(root.kind, FileType::Directory);
        assert_eq!(root.perm, 0o700);
        assert_eq!(root.nlink, 2);
        assert_eq!(root.blocks, 8);
    }

    #[test]
    fn parent_paths() {
        assert_eq!(parent_path("/"), "/");
        assert_eq!(parent_path("/a"), "/");
        assert_eq!(parent_path("/a/b"), "/a");
        assert_eq!(parent_path("/a/b/"), "/a");
    }

    fn listing() -> Vec<DirEntry> {
        vec![
            (1, FileType::Directory, ".".to_string()),
            (1, FileType::Directory, "..".to_string()),
            (2, FileType::Directory, "a".to_string()),
            (3, FileType::RegularFile, "b".to_string()),
            (4, FileType::RegularFile, "c".to_string()),
        ]
    }

    /// Collects what `fill_dir_page` offers, reporting full after `capacity`.
    fn page(offset: i64, capacity: usize) -> (Result<usize, c_int>, Vec<(i64, String)>) {
        let entries = listing();
        let mut accepted = Vec::new();
        let result = fill_dir_page(&entries, offset, |_, next, _, name| {
            if accepted.len() == capacity {
                return true;
            }
            accepted.push((next, name.to_string()));
            false
        });
        (result, accepted)
    }

    #[test]
    fn dir_page_from_start_lists_everything() {
        let (result, accepted) = page(0, 16);
        assert_eq!(result, Ok(5));
        let names: Vec<&str> = accepted.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, vec![".", "..", "a", "b", "c"]);
        let offsets: Vec<i64> = accepted.iter().map(|(o, _)| *o).collect();
        assert_eq!(offsets, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn dir_page_resumes_mid_listing() {
        let (result, accepted) = page(3, 16);
        assert_eq!(result, Ok(2));
        assert_eq!(accepted, vec![(4, "b".to_string()), (5, "c".to_string())]);
    }

    #[test]
    fn dir_page_past_end_is_empty() {
        assert_eq!(page(5, 16), (Ok(0), Vec::new()));
        assert_eq!(page(42, 16), (Ok(0), Vec::new()));
    }

    #[test]
    fn dir_page_with_no_room_for_first_entry_is_enomem() {
        assert_eq!(page(0, 0), (Err(ENOMEM), Vec::new()));
        assert_eq!(page(2, 0).0, Err(ENOMEM));
    }

    #[test]
    fn dir_page_full_after_some_entries_ends_normally() {
        let (result, accepted) = page(0, 2);
        assert_eq!(result, Ok(2));
        assert_eq!(accepted.last(), Some(&(2, "..".to_string())));

        let (result, accepted) = page(2, 2);
        assert_eq!(result, Ok(2));
        assert_eq!(accepted, vec![(3, "a".to_string()), (4, "b".to_string())]);
    }

    #[test]
    fn inode_callbacks_resolve_through_index() {
        let mut fuse = adapter();
        let (node, attr) = fuse.create_entry("/f".to_string(), S_IFREG | 0o644, 0).unwrap();

        assert!(Arc::ptr_eq(&fuse.node_of(attr.ino).unwrap(), &node));
        assert!(Arc::ptr_eq(&fuse.node_of(FUSE_ROOT_ID).unwrap(), &fuse.index.root()));
        assert_eq!(fuse.node_of(9999).unwrap_err(), ENOENT);
    }

    #[test]
    fn file_limit_comes_from_index() {
        let mut config = MemFsConfig::default();
        config.limits.max_file_bytes = Some(8);
        let index = Arc::new(Index::new(&config));
        let fuse = MemFsFuse::new(Arc::clone(&index), &config);

        assert_eq!(fuse.max_file_bytes(), Some(8));
        assert_eq!(adapter().max_file_bytes(), None);
    }
}
