/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::path::Path;

/// Initializes logging from `log4rs.yml` in the current directory, if present.
///
/// Unlike a long-running daemon, these are one-shot utility binaries meant to
/// work standalone even when no config file ships alongside them, so a
/// missing file is not an error here.
pub fn init() -> anyhow::Result<()> {
    if Path::new("log4rs.yml").exists() {
        log4rs::init_file("log4rs.yml", Default::default())?;
    }
    Ok(())
}
