/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use thiserror::Error;

/// Errors raised while resolving, classifying, or operating on an [`crate::EntryChain`].
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("No such file or directory")]
    NotFound,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not a directory")]
    NotADirectory,

    #[error("Is a directory")]
    IsADirectory,

    #[error("File exists")]
    AlreadyExists,

    #[error("Directory not empty")]
    NotEmpty,

    #[error("Device or resource busy")]
    Busy,

    #[error("'{0}' and '{1}' are the same file")]
    SameFile(String, String),

    #[error("ambiguous redirect")]
    AmbiguousRedirect,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
