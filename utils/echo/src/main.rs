/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "print arguments joined by a single space", long_about = None)]
struct Args {
    /// words to print
    words: Vec<String>,
}

fn main() {
    pathchain::logging::init().ok();
    let args = Args::parse();
    println!("{}", args.words.join(" "));
}
