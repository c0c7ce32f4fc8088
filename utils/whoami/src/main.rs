/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use anyhow::Context;
use users::{get_current_uid, get_user_by_uid};

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let user = get_user_by_uid(get_current_uid()).with_context(|| "current user has no passwd entry")?;
    println!("{}", user.name().to_string_lossy());
    Ok(())
}
