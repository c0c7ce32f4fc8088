/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

pub mod canon;
pub mod destination;
pub mod entry;
pub mod error;
pub mod identity;
pub mod logging;
pub mod mode;
pub mod perm;

pub use canon::canonicalize;
pub use destination::{get_joint_entry, get_real_destination};
pub use entry::{is_same_entry, is_subdirectory, EntryChain, EntryIndex};
pub use error::ChainError;
