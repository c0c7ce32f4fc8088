/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::env;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let cwd = env::current_dir().with_context(|| "failed to read current directory")?;
    println!("{}", cwd.display());
    Ok(())
}
