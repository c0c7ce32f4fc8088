/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

mod context;
mod executor;
mod parser;
mod reader;

use std::io;

use log::error;

use context::ShellContext;

fn prompt_string() -> String {
    let cwd = std::env::current_dir().unwrap_or_default();
    format!("{}$ ", cwd.display())
}

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let ctx = ShellContext::load()?;

    let stdin = io::stdin();
    let mut locked = stdin.lock();

    loop {
        reader::print_prompt(&prompt_string())?;
        let Some(line) = reader::read_command(&mut locked)? else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        let pipelines = match parser::parse_line(&line) {
            Ok(pipelines) => pipelines,
            Err(err) => {
                eprintln!("shell: {err}");
                continue;
            }
        };

        for pipeline in pipelines {
            if let Err(err) = executor::exec_pipeline(&ctx, &pipeline) {
                error!("{err:#}");
                eprintln!("shell: {err}");
            }
        }
    }

    Ok(())
}
