/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use users::{get_current_uid, get_user_by_uid};

/// State that outlives a single command line: the user's home directory,
/// used for tilde expansion, and the single directory commands are looked up
/// in. There is no `PATH` search; a bare `cat` only resolves if a `cat`
/// binary lives directly in `app_home`.
pub struct ShellContext {
    pub home_dir: PathBuf,
    pub app_home: PathBuf,
}

impl ShellContext {
    pub fn load() -> anyhow::Result<Self> {
        let home_dir = get_user_by_uid(get_current_uid())
            .with_context(|| "current user has no passwd entry")?
            .home_dir()
            .to_path_buf();
        let app_home = env::current_dir().with_context(|| "failed to read current directory")?;
        Ok(ShellContext { home_dir, app_home })
    }

    /// Resolves a bare command name to an executable path within `app_home`.
    /// Names containing a `/` are never looked up here; they are used as-is.
    pub fn locate_application(&self, name: &str) -> Option<PathBuf> {
        if name.contains('/') {
            return Some(PathBuf::from(name));
        }
        let candidate = self.app_home.join(name);
        let chain = pathchain::canonicalize(&candidate.display().to_string());
        let tail = chain.tail_index();
        if chain.is_file(tail) && pathchain::perm::is_file_execute_permitted(&chain, tail) {
            Some(candidate)
        } else {
            None
        }
    }

    /// Expands a leading `~` or `~/...` to the caller's home directory.
    ///
    /// `~user` is intentionally left buggy: rather than consulting the user
    /// database for `user`'s actual home directory, it builds `/home/<user>`
    /// unconditionally. This mirrors the original expander exactly.
    pub fn expand_tilde(&self, token: &str) -> String {
        if token == "~" {
            return self.home_dir.display().to_string();
        }
        if let Some(rest) = token.strip_prefix("~/") {
            return self.home_dir.join(rest).display().to_string();
        }
        if let Some(rest) = token.strip_prefix('~') {
            if let Some((user, tail)) = rest.split_once('/') {
                return format!("/home/{user}/{tail}");
            }
            if !rest.is_empty() {
                return format!("/home/{rest}");
            }
        }
        token.to_string()
    }
}
