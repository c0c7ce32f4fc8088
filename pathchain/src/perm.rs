/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::os::unix::fs::PermissionsExt;

use crate::entry::{EntryChain, EntryIndex};
use crate::identity::{classify, current_uid, PermClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    Read,
    Write,
    Execute,
}

fn mode_has(mode: u32, class: PermClass, bit: Bit) -> bool {
    let mask = match (class, bit) {
        (PermClass::User, Bit::Read) => 0o400,
        (PermClass::User, Bit::Write) => 0o200,
        (PermClass::User, Bit::Execute) => 0o100,
        (PermClass::Group, Bit::Read) => 0o040,
        (PermClass::Group, Bit::Write) => 0o020,
        (PermClass::Group, Bit::Execute) => 0o010,
        (PermClass::Other, Bit::Read) => 0o004,
        (PermClass::Other, Bit::Write) => 0o002,
        (PermClass::Other, Bit::Execute) => 0o001,
    };
    mode & mask != 0
}

/// Root bypasses every check. Otherwise classify the caller against the
/// entry's owner/group and look up the matching bit; an entry with no
/// attribute (stat failed, doesn't exist) is never permitted.
fn check_own_bit(chain: &EntryChain, idx: EntryIndex, bit: Bit) -> bool {
    if current_uid() == 0 {
        return true;
    }
    match chain.attribute(idx) {
        Some(attribute) => {
            let class = classify(attribute);
            mode_has(attribute.permissions().mode(), class, bit)
        }
        None => false,
    }
}

/// True when every ancestor directory up to root is readable by the caller.
/// This is the recursive precondition every other query ultimately rests on.
pub fn is_directory_read_permitted(chain: &EntryChain, idx: EntryIndex) -> bool {
    if current_uid() == 0 {
        return true;
    }
    if chain.is_root(idx) {
        return check_own_bit(chain, idx, Bit::Read);
    }
    let parent = chain.parent_index(idx).expect("non-root has a parent");
    check_own_bit(chain, idx, Bit::Read) && is_directory_read_permitted(chain, parent)
}

pub fn is_directory_write_permitted(chain: &EntryChain, idx: EntryIndex) -> bool {
    if current_uid() == 0 {
        return true;
    }
    check_own_bit(chain, idx, Bit::Write) && is_directory_read_permitted(chain, idx)
}

pub fn is_file_read_permitted(chain: &EntryChain, idx: EntryIndex) -> bool {
    if current_uid() == 0 {
        return true;
    }
    let parent = chain.parent_index(idx).expect("a file always has a parent directory");
    check_own_bit(chain, idx, Bit::Read) && is_directory_read_permitted(chain, parent)
}

pub fn is_file_write_permitted(chain: &EntryChain, idx: EntryIndex) -> bool {
    if current_uid() == 0 {
        return true;
    }
    let parent = chain.parent_index(idx).expect("a file always has a parent directory");
    check_own_bit(chain, idx, Bit::Write)
        && is_directory_read_permitted(chain, parent)
        && is_directory_write_permitted(chain, parent)
}

pub fn is_file_execute_permitted(chain: &EntryChain, idx: EntryIndex) -> bool {
    if current_uid() == 0 {
        return true;
    }
    let parent = chain.parent_index(idx).expect("a file always has a parent directory");
    check_own_bit(chain, idx, Bit::Execute) && is_directory_read_permitted(chain, parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::canonicalize;
    use std::fs;

    #[test]
    fn root_uid_bypasses_every_check() {
        if current_uid() != 0 {
            return;
        }
        let chain = canonicalize("/definitely/does/not/exist");
        assert!(is_directory_read_permitted(&chain, chain.tail_index()));
    }

    #[test]
    fn owner_with_full_mode_can_read_and_write() {
        let tmp = std::env::temp_dir().join(format!("pathchain-perm-test-{}", std::process::id()));
        fs::create_dir_all(&tmp).unwrap();
        let file = tmp.join("f.txt");
        fs::write(&file, b"x").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        let chain = canonicalize(file.to_str().unwrap());
        let idx = chain.tail_index();
        if current_uid() == 0 {
            assert!(is_file_write_permitted(&chain, idx));
        } else {
            assert!(is_file_read_permitted(&chain, idx));
        }
        fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn missing_entry_is_never_permitted_for_non_root() {
        if current_uid() == 0 {
            return;
        }
        let chain = canonicalize("/definitely/does/not/exist/at/all");
        assert!(!is_file_read_permitted(&chain, chain.tail_index()));
    }
}
