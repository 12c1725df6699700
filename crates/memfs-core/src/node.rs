// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Tree vertices: directories holding children, regular files holding bytes.
//!
//! Every node carries its own reader/writer lock. Nothing here ever takes two
//! node locks at once; callers that walk the tree hand over from parent to
//! child one step at a time (see [`crate::Index::resolve`]).

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use crate::error::{FsError, FsResult};
use crate::types::Attributes;

/// Shared handle to a node. Outstanding handles keep the node alive even if
/// the tree stops referencing it.
pub type NodeRef = Arc<Node>;

#[derive(Debug)]
enum Body {
    Directory { children: HashMap<String, NodeRef> },
    File { content: Vec<u8> },
}

#[derive(Debug)]
struct NodeState {
    attrs: Attributes,
    body: Body,
}

impl NodeState {
    fn bump_link_count(&mut self) {
        self.attrs.nlink = self.attrs.nlink.saturating_add(1);
    }

    fn touch_modified(&mut self) {
        let now = SystemTime::now();
        self.attrs.times.mtime = now;
        self.attrs.times.ctime = now;
    }

    fn content_mut(&mut self) -> FsResult<&mut Vec<u8>> {
        match &mut self.body {
            Body::File { content } => Ok(content),
            Body::Directory { .. } => Err(FsError::IsADirectory),
        }
    }
}

/// Filesystem node
#[derive(Debug)]
pub struct Node {
    name: String,
    state: RwLock<NodeState>,
}

impl Node {
    pub(crate) fn directory(name: impl Into<String>, attrs: Attributes) -> Self {
        Self::with_body(
            name,
            attrs,
            Body::Directory {
                children: HashMap::new(),
            },
        )
    }

    pub(crate) fn file(name: impl Into<String>, attrs: Attributes) -> Self {
        Self::with_body(
            name,
            attrs,
            Body::File {
                content: Vec::new(),
            },
        )
    }

    fn with_body(name: impl Into<String>, attrs: Attributes, body: Body) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(NodeState { attrs, body }),
        }
    }

    // A panic while a guard is held can only happen before any field is
    // touched, so a poisoned lock still guards consistent state.
    fn read_state(&self) -> RwLockReadGuard<'_, NodeState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, NodeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// This node's own path segment (`/` for the root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current attributes.
    pub fn attributes(&self) -> Attributes {
        self.read_state().attrs
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.read_state().body, Body::Directory { .. })
    }

    /// Look up a direct child by name. A regular file has no children, so any
    /// lookup below it is `NotFound`.
    pub(crate) fn child(&self, name: &str) -> FsResult<NodeRef> {
        let state = self.read_state();
        match &state.body {
            Body::Directory { children } => children.get(name).cloned().ok_or(FsError::NotFound),
            Body::File { .. } => Err(FsError::NotFound),
        }
    }

    /// Snapshot of the current children. Later insertions are not reflected;
    /// iterate the returned vector as often as needed.
    pub fn children(&self) -> FsResult<Vec<NodeRef>> {
        let state = self.read_state();
        match &state.body {
            Body::Directory { children } => Ok(children.values().cloned().collect()),
            Body::File { .. } => Err(FsError::NotADirectory),
        }
    }

    /// Names of the current children. `.` and `..` are not included.
    pub fn list_children(&self) -> FsResult<Vec<String>> {
        let state = self.read_state();
        match &state.body {
            Body::Directory { children } => Ok(children.keys().cloned().collect()),
            Body::File { .. } => Err(FsError::NotADirectory),
        }
    }

    /// Insert a child built by `build` under the exclusive lock.
    ///
    /// `build` runs only once the name is known to be free, so a rejected
    /// insertion allocates nothing. A directory child bumps this node's link
    /// count inside the same critical section.
    pub(crate) fn insert_child<F>(&self, name: &str, build: F) -> FsResult<NodeRef>
    where
        F: FnOnce() -> Node,
    {
        let mut state = self.write_state();
        let Body::Directory { children } = &mut state.body else {
            return Err(FsError::NotADirectory);
        };
        if children.contains_key(name) {
            return Err(FsError::AlreadyExists);
        }

        let mut child = build();
        let child_is_dir = matches!(
            child.state.get_mut().unwrap_or_else(PoisonError::into_inner).body,
            Body::Directory { .. }
        );
        let child = Arc::new(child);
        children.insert(name.to_string(), Arc::clone(&child));

        if child_is_dir {
            state.bump_link_count();
        }
        state.touch_modified();
        Ok(child)
    }

    /// Read up to `len` bytes starting at `offset`.
    pub fn read(&self, offset: u64, len: usize) -> FsResult<Vec<u8>> {
        let state = self.read_state();
        let content = match &state.body {
            Body::File { content } => content,
            Body::Directory { .. } => return Err(FsError::IsADirectory),
        };
        Ok(Self::window(content, offset, len).to_vec())
    }

    /// Copy bytes starting at `offset` into `buf`, returning how many were
    /// copied. Zero when `offset` is at or past the end of content.
    pub fn read_into(&self, offset: u64, buf: &mut [u8]) -> FsResult<usize> {
        let state = self.read_state();
        let content = match &state.body {
            Body::File { content } => content,
            Body::Directory { .. } => return Err(FsError::IsADirectory),
        };
        let window = Self::window(content, offset, buf.len());
        buf[..window.len()].copy_from_slice(window);
        Ok(window.len())
    }

    fn window(content: &[u8], offset: u64, len: usize) -> &[u8] {
        let start = match usize::try_from(offset) {
            Ok(start) if start < content.len() => start,
            _ => return &[],
        };
        let end = start + len.min(content.len() - start);
        &content[start..end]
    }

    /// Write `data` at `offset`, growing content as needed. Growth is bounded
    /// only by memory; see [`Node::write_bounded`] for a capped variant.
    pub fn write(&self, offset: u64, data: &[u8]) -> FsResult<usize> {
        self.write_bounded(offset, data, None)
    }

    /// Write `data` at `offset`. Content grows to exactly `offset + data.len()`
    /// when that is past the current end, zero-filling any gap. Fails with
    /// `NoSpace` and leaves content untouched when the new end would exceed
    /// `max_len` or cannot be allocated.
    pub fn write_bounded(&self, offset: u64, data: &[u8], max_len: Option<u64>) -> FsResult<usize> {
        let end = offset
            .checked_add(data.len() as u64)
            .ok_or(FsError::InvalidArgument)?;

        let mut state = self.write_state();
        let content = state.content_mut()?;
        if end > content.len() as u64 && max_len.is_some_and(|max| end > max) {
            return Err(FsError::NoSpace);
        }

        let end = usize::try_from(end).map_err(|_| FsError::NoSpace)?;
        let start = end - data.len();
        if end > content.len() {
            content
                .try_reserve(end - content.len())
                .map_err(|_| FsError::NoSpace)?;
            content.resize(end, 0);
        }
        content[start..end].copy_from_slice(data);

        let size = content.len() as u64;
        state.attrs.size = size;
        state.touch_modified();
        Ok(data.len())
    }

    /// Set content length to `len`, zero-filling on growth. Growth that cannot
    /// be allocated fails with `NoSpace`.
    pub fn truncate(&self, len: u64, max_len: Option<u64>) -> FsResult<()> {
        let mut state = self.write_state();
        let content = state.content_mut()?;
        if len > content.len() as u64 && max_len.is_some_and(|max| len > max) {
            return Err(FsError::NoSpace);
        }
        let len = usize::try_from(len).map_err(|_| FsError::NoSpace)?;
        if len > content.len() {
            content
                .try_reserve(len - content.len())
                .map_err(|_| FsError::NoSpace)?;
        }
        content.resize(len, 0);

        state.attrs.size = len as u64;
        state.touch_modified();
        Ok(())
    }

    /// Add one to `nlink`.
    pub fn increment_link_count(&self) {
        self.write_state().bump_link_count();
    }
}
