/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs;
use std::path::{Path, PathBuf};

use crate::entry::{EntryChain, EntryIndex, EntryNode};
use crate::error::ChainError;

/// Deep-copies `target`'s ancestor spine and appends one fresh tail node named
/// `filename`. The new chain shares no storage with `target`.
pub fn get_joint_entry(filename: &str, target: &EntryChain) -> EntryChain {
    let mut nodes: Vec<EntryNode> = target.nodes.clone();
    let parent_idx = EntryIndex::new(nodes.len() - 1);
    let parent_real_path = nodes[parent_idx.as_usize()].real_path.clone();

    let real_path = if parent_real_path == Path::new("/") {
        PathBuf::from(format!("/{filename}"))
    } else {
        parent_real_path.join(filename)
    };
    let attribute = fs::metadata(&real_path).ok();

    nodes.push(EntryNode {
        filename: filename.to_string(),
        real_path,
        attribute,
        parent: Some(parent_idx),
    });

    let received_path = join_received_path(target.received_path(), filename);
    EntryChain::new(nodes, received_path)
}

fn join_received_path(parent_received: &str, filename: &str) -> String {
    if parent_received.ends_with('/') {
        format!("{parent_received}{filename}")
    } else {
        format!("{parent_received}/{filename}")
    }
}

/// Given a source filename and a target chain, decides the concrete destination
/// used by `cp`/`mv`: the target path itself when it doesn't exist yet (but its
/// parent does), or `target/filename` when the target is an existing directory.
pub fn get_real_destination(filename: &str, target: &EntryChain) -> Result<EntryChain, ChainError> {
    let tail = target.tail_index();
    if !target.exists(tail) {
        match target.parent_index(tail) {
            Some(parent) if target.exists(parent) => Ok(target.clone()),
            _ => Err(ChainError::NotFound),
        }
    } else if !target.is_directory(tail) {
        Err(ChainError::NotADirectory)
    } else {
        Ok(get_joint_entry(filename, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::canonicalize;

    #[test]
    fn joint_entry_shares_the_parents_real_path() {
        let tmp = std::env::temp_dir().join(format!("pathchain-test-{}", std::process::id()));
        fs::create_dir_all(&tmp).unwrap();
        let parent = canonicalize(tmp.to_str().unwrap());
        let joint = get_joint_entry("child.txt", &parent);
        assert_eq!(
            joint.real_path(joint.parent_index(joint.tail_index()).unwrap()),
            parent.real_path(parent.tail_index())
        );
        assert_eq!(joint.real_path(joint.tail_index()), tmp.join("child.txt"));
        fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn destination_is_target_itself_when_parent_exists_but_target_does_not() {
        let tmp = std::env::temp_dir().join(format!("pathchain-test-dst-{}", std::process::id()));
        fs::create_dir_all(&tmp).unwrap();
        let target = canonicalize(tmp.join("newname").to_str().unwrap());
        let destination = get_real_destination("unused", &target).unwrap();
        assert_eq!(destination.real_path(destination.tail_index()), tmp.join("newname"));
        fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn destination_fails_when_target_and_its_parent_are_both_absent() {
        let target = canonicalize("/definitely/missing/parent/name");
        assert!(matches!(
            get_real_destination("name", &target),
            Err(ChainError::NotFound)
        ));
    }

    #[test]
    fn destination_joins_filename_when_target_is_a_directory() {
        let tmp = std::env::temp_dir().join(format!("pathchain-test-dir-{}", std::process::id()));
        fs::create_dir_all(&tmp).unwrap();
        let target = canonicalize(tmp.to_str().unwrap());
        let destination = get_real_destination("source.txt", &target).unwrap();
        assert_eq!(destination.real_path(destination.tail_index()), tmp.join("source.txt"));
        fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn destination_fails_when_target_exists_but_is_not_a_directory() {
        let tmp = std::env::temp_dir().join(format!("pathchain-test-file-{}", std::process::id()));
        fs::write(&tmp, b"x").unwrap();
        let target = canonicalize(tmp.to_str().unwrap());
        assert!(matches!(
            get_real_destination("x", &target),
            Err(ChainError::NotADirectory)
        ));
        fs::remove_file(&tmp).ok();
    }
}
