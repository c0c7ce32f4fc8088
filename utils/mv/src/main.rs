/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::bail;
use clap::Parser;
use log::info;
use pathchain::entry::{is_same_entry, is_subdirectory};
use pathchain::{canonicalize, get_real_destination, ChainError};

#[derive(Parser, Debug)]
#[command(version, about = "move (rename) files and directories", long_about = None)]
struct Args {
    /// prompt before overwriting an existing destination
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// never prompt, overriding a preceding -i
    #[arg(short = 'f', long = "force")]
    force: bool,

    source: String,
    destination: String,
}

fn prompt_yes(message: &str) -> bool {
    eprint!("{message} ");
    io::stderr().flush().ok();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes")
}

fn move_entry(source: &Path, destination: &Path) -> anyhow::Result<()> {
    info!("moving '{}' to '{}'", source.display(), destination.display());
    fs::rename(source, destination)?;
    Ok(())
}

fn overwrite_entry(source: &Path, destination: &Path, args: &Args) -> anyhow::Result<()> {
    if args.interactive && !args.force && !prompt_yes(&format!("overwrite '{}'?", destination.display())) {
        return Ok(());
    }
    move_entry(source, destination)
}

/// Refuses to move the current working directory or any of its ancestors.
fn is_busy(source: &Path) -> bool {
    match env::current_dir() {
        Ok(cwd) => is_subdirectory(&cwd, source),
        Err(_) => false,
    }
}

fn operate_entry_once(source: &Path, destination: &Path, args: &Args) -> anyhow::Result<()> {
    if is_same_entry(source, destination) {
        bail!(ChainError::SameFile(
            source.display().to_string(),
            destination.display().to_string()
        ));
    }

    let source_meta = fs::symlink_metadata(source)?;
    if source_meta.is_dir() {
        if is_busy(source) {
            bail!(ChainError::Busy);
        }
        if is_subdirectory(destination, source) {
            bail!(
                "cannot move '{}' to a subdirectory of itself, '{}'",
                source.display(),
                destination.display()
            );
        }
        if destination.exists() {
            if !destination.is_dir() {
                bail!(ChainError::NotADirectory);
            }
            overwrite_entry(source, destination, args)
        } else {
            move_entry(source, destination)
        }
    } else if destination.exists() {
        if destination.is_dir() {
            bail!(ChainError::IsADirectory);
        }
        overwrite_entry(source, destination, args)
    } else {
        move_entry(source, destination)
    }
}

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let args = Args::parse();

    let source_chain = canonicalize(&args.source);
    let source_tail = source_chain.tail_index();
    if !source_chain.exists(source_tail) {
        eprintln!("mv: cannot stat '{}': No such file or directory", args.source);
        std::process::exit(1);
    }

    let target_chain = canonicalize(&args.destination);
    let destination_chain = match get_real_destination(source_chain.filename(source_tail), &target_chain) {
        Ok(chain) => chain,
        Err(err) => {
            eprintln!("mv: cannot move to '{}': {err}", args.destination);
            std::process::exit(1);
        }
    };

    let result = operate_entry_once(
        source_chain.real_path(source_tail),
        destination_chain.real_path(destination_chain.tail_index()),
        &args,
    );
    if let Err(err) = result {
        eprintln!("mv: {err}");
        std::process::exit(1);
    }
    Ok(())
}
