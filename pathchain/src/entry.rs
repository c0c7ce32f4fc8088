/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

/// Index of one component within an [`EntryChain`]'s arena. Root is always `0`;
/// the tail is always the highest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryIndex(usize);

impl EntryIndex {
    pub(crate) fn new(idx: usize) -> Self {
        EntryIndex(idx)
    }

    pub(crate) fn as_usize(self) -> usize {
        self.0
    }
}

/// One resolved path component. `parent` is `None` only for root.
#[derive(Debug, Clone)]
pub struct EntryNode {
    pub filename: String,
    pub real_path: PathBuf,
    pub attribute: Option<Metadata>,
    pub parent: Option<EntryIndex>,
}

/// A resolved, `.`/`..`-folded path expressed as a chain of components rooted at `/`.
///
/// Stored as a flat arena (root first, tail last) with parent indices rather than
/// raw back-pointers, since nothing in this chain is ever mutated after construction.
#[derive(Debug, Clone)]
pub struct EntryChain {
    pub(crate) nodes: Vec<EntryNode>,
    received_path: String,
}

impl EntryChain {
    pub(crate) fn new(nodes: Vec<EntryNode>, received_path: String) -> Self {
        assert!(!nodes.is_empty(), "an entry chain always has at least root");
        EntryChain {
            nodes,
            received_path,
        }
    }

    pub fn root_index(&self) -> EntryIndex {
        EntryIndex(0)
    }

    pub fn tail_index(&self) -> EntryIndex {
        EntryIndex(self.nodes.len() - 1)
    }

    pub fn parent_index(&self, idx: EntryIndex) -> Option<EntryIndex> {
        self.nodes[idx.as_usize()].parent
    }

    pub fn is_root(&self, idx: EntryIndex) -> bool {
        self.parent_index(idx).is_none()
    }

    pub fn filename(&self, idx: EntryIndex) -> &str {
        &self.nodes[idx.as_usize()].filename
    }

    pub fn real_path(&self, idx: EntryIndex) -> &Path {
        &self.nodes[idx.as_usize()].real_path
    }

    pub fn attribute(&self, idx: EntryIndex) -> Option<&Metadata> {
        self.nodes[idx.as_usize()].attribute.as_ref()
    }

    pub fn exists(&self, idx: EntryIndex) -> bool {
        self.attribute(idx).is_some()
    }

    pub fn is_file(&self, idx: EntryIndex) -> bool {
        self.attribute(idx).map(|a| a.is_file()).unwrap_or(false)
    }

    pub fn is_directory(&self, idx: EntryIndex) -> bool {
        self.attribute(idx).map(|a| a.is_dir()).unwrap_or(false)
    }

    pub fn is_empty_directory(&self, idx: EntryIndex) -> bool {
        if !self.is_directory(idx) {
            return false;
        }
        fs::read_dir(self.real_path(idx))
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }

    /// Meaningful only for the tail: the path string as the user originally typed it.
    pub fn received_path(&self) -> &str {
        &self.received_path
    }
}

/// True when `a` and `b` are the same resolved path.
pub fn is_same_entry(a: &Path, b: &Path) -> bool {
    a == b
}

/// True when `candidate` is `ancestor` itself or lies beneath it.
///
/// Uses [`Path::starts_with`], which compares whole components, so `/foobar` is
/// correctly *not* considered a subdirectory of `/foo`.
pub fn is_subdirectory(candidate: &Path, ancestor: &Path) -> bool {
    candidate == ancestor || candidate.starts_with(ancestor)
}
