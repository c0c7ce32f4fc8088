/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

use users::{get_current_gid, get_current_uid, get_group_by_gid, get_user_by_uid};

/// Which side of the owner/group/other split the caller falls into for a given entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermClass {
    User,
    Group,
    Other,
}

pub fn current_uid() -> u32 {
    get_current_uid()
}

/// Classifies the caller against an entry's owning user and group.
///
/// Mirrors the original oracle's lookup exactly, bug included: the entry's
/// *username* is compared against the caller's *group name* in the group
/// branch, rather than the entry's group name. A caller whose own username
/// happens to equal the file owner's username but who is not actually the
/// owner's uid would never reach the group branch, since `User` is checked
/// first by uid; but a caller in the owning group whose own username differs
/// from the name compared here will be misclassified as `Other`.
pub fn classify(attribute: &Metadata) -> PermClass {
    let owner_uid = attribute.uid();
    let owner_gid = attribute.gid();

    if owner_uid == get_current_uid() {
        return PermClass::User;
    }

    let owner_username = get_user_by_uid(owner_uid).map(|u| u.name().to_os_string());
    let caller_groupname = get_group_by_gid(get_current_gid()).map(|g| g.name().to_os_string());

    if owner_username.is_some() && owner_username == caller_groupname {
        return PermClass::Group;
    }

    PermClass::Other
}
