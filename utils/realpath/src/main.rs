/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use clap::Parser;
use log::warn;
use pathchain::canonicalize;

#[derive(Parser, Debug)]
#[command(version, about = "resolve a path, folding . and .. without touching symlinks", long_about = None)]
struct Args {
    /// fail if any component of path does not exist
    #[arg(short = 'e', long)]
    canonicalize_existing: bool,

    paths: Vec<String>,
}

fn main() {
    pathchain::logging::init().ok();
    let args = Args::parse();

    let mut had_error = false;
    for raw in &args.paths {
        let chain = canonicalize(raw);
        let tail = chain.tail_index();
        if args.canonicalize_existing && !chain.exists(tail) {
            warn!("realpath: {}: No such file or directory", raw);
            eprintln!("realpath: {raw}: No such file or directory");
            had_error = true;
            continue;
        }
        println!("{}", chain.real_path(tail).display());
    }

    if had_error {
        std::process::exit(1);
    }
}
