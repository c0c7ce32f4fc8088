/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::entry::{EntryChain, EntryIndex, EntryNode};

/// Turns a raw, possibly relative, possibly `.`/`..`-laden path string into a
/// fully resolved [`EntryChain`] rooted at `/`.
///
/// Resolution is purely syntactic: components are folded right-to-left with a
/// "pending parents to cancel" counter, the same algorithm the original
/// `handle_entries_struct` uses. No symlink is ever followed for the purpose of
/// folding; `stat()` (here `fs::metadata`) is only used to attach existence data
/// to each already-resolved component.
pub fn canonicalize(raw: &str) -> EntryChain {
    let absolute = to_absolute(raw);
    let components: Vec<&str> = absolute.split('/').filter(|s| !s.is_empty()).collect();
    let folded = fold_dot_dot(&components);

    let mut nodes = Vec::with_capacity(folded.len() + 1);
    let root_path = PathBuf::from("/");
    nodes.push(EntryNode {
        filename: "/".to_string(),
        attribute: fs::metadata(&root_path).ok(),
        real_path: root_path,
        parent: None,
    });

    let mut current = PathBuf::from("/");
    for name in &folded {
        let parent_idx = EntryIndex::new(nodes.len() - 1);
        current = if current == Path::new("/") {
            PathBuf::from(format!("/{name}"))
        } else {
            current.join(name)
        };
        nodes.push(EntryNode {
            filename: (*name).to_string(),
            attribute: fs::metadata(&current).ok(),
            real_path: current.clone(),
            parent: Some(parent_idx),
        });
    }

    EntryChain::new(nodes, raw.to_string())
}

fn to_absolute(raw: &str) -> String {
    if raw.starts_with('/') {
        raw.to_string()
    } else {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        format!("{}/{}", cwd.display(), raw)
    }
}

/// Step 3 of the canonicaliser algorithm: walk components right-to-left,
/// dropping `.`, counting `..`, and letting a positive count cancel the next
/// real component instead of keeping it. `..` past root simply runs out of
/// components to cancel; it is never an error.
fn fold_dot_dot<'a>(components: &[&'a str]) -> Vec<&'a str> {
    let mut folded = Vec::with_capacity(components.len());
    let mut pending_cancel = 0usize;
    for component in components.iter().rev() {
        match *component {
            "." => continue,
            ".." => pending_cancel += 1,
            _ => {
                if pending_cancel > 0 {
                    pending_cancel -= 1;
                } else {
                    folded.push(*component);
                }
            }
        }
    }
    folded.reverse();
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_has_single_node() {
        let chain = canonicalize("/");
        assert_eq!(chain.root_index(), chain.tail_index());
        assert_eq!(chain.real_path(chain.tail_index()), Path::new("/"));
    }

    #[test]
    fn dot_dot_folding_matches_direct_path() {
        let folded = canonicalize("/a/./b/../c");
        let direct = canonicalize("/a/c");
        assert_eq!(
            folded.real_path(folded.tail_index()),
            direct.real_path(direct.tail_index())
        );
    }

    #[test]
    fn dot_dot_past_root_stops_at_root() {
        let chain = canonicalize("/../../etc");
        assert_eq!(chain.real_path(chain.tail_index()), Path::new("/etc"));
    }

    #[test]
    fn interior_non_existent_component_does_not_break_the_chain() {
        let chain = canonicalize("/definitely/does/not/exist");
        assert_eq!(chain.real_path(chain.tail_index()), Path::new("/definitely/does/not/exist"));
        assert!(!chain.exists(chain.tail_index()));
    }

    #[test]
    fn tail_keeps_the_raw_received_path() {
        let chain = canonicalize("some/relative/path");
        assert_eq!(chain.received_path(), "some/relative/path");
    }

    #[test]
    fn canonicalisation_is_idempotent() {
        let once = canonicalize("/a/./b/../c");
        let real = once.real_path(once.tail_index()).to_str().unwrap().to_string();
        let twice = canonicalize(&real);
        assert_eq!(
            once.real_path(once.tail_index()),
            twice.real_path(twice.tail_index())
        );
    }

    #[test]
    fn every_entry_reaches_root() {
        let chain = canonicalize("/a/b/c");
        let mut idx = chain.tail_index();
        loop {
            match chain.parent_index(idx) {
                Some(parent) => idx = parent,
                None => break,
            }
        }
        assert_eq!(idx, chain.root_index());
    }

    #[test]
    fn no_interior_entry_keeps_dot_or_dot_dot() {
        let chain = canonicalize("/a/./b/../../c");
        let mut idx = chain.tail_index();
        loop {
            let name = chain.filename(idx);
            assert_ne!(name, ".");
            assert_ne!(name, "..");
            match chain.parent_index(idx) {
                Some(parent) => idx = parent,
                None => break,
            }
        }
    }
}
