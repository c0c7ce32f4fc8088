/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::env;
use std::fs;
use std::io::{self, Write};

use anyhow::bail;
use clap::Parser;
use log::info;
use pathchain::entry::is_subdirectory;
use pathchain::{canonicalize, ChainError};

#[derive(Parser, Debug)]
#[command(version, about = "remove files or directories", long_about = None)]
struct Args {
    /// remove directories and their contents recursively
    #[arg(short = 'r', short_alias = 'R', long = "recursive")]
    recursive: bool,

    /// remove empty directories
    #[arg(short = 'd', long = "dir")]
    dir: bool,

    /// ignore nonexistent files, never prompt
    #[arg(short = 'f', long = "force")]
    force: bool,

    /// prompt before every removal
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    paths: Vec<String>,
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

fn is_busy(real_path: &std::path::Path) -> bool {
    match env::current_dir() {
        Ok(cwd) => is_subdirectory(&cwd, real_path),
        Err(_) => false,
    }
}

fn remove_directory_recursively(path: &std::path::Path, interactive: bool) -> anyhow::Result<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let child = entry.path();
        if interactive && !prompt_yes(&format!("remove '{}'?", child.display())) {
            continue;
        }
        if child.is_dir() && !child.is_symlink() {
            remove_directory_recursively(&child, interactive)?;
            fs::remove_dir(&child)?;
        } else {
            fs::remove_file(&child)?;
        }
    }
    Ok(())
}

fn remove_directory(real_path: &std::path::Path, args: &Args) -> anyhow::Result<()> {
    if is_busy(real_path) {
        bail!("cannot remove '{}': Device or resource busy", real_path.display());
    }
    let is_empty = fs::read_dir(real_path)?.next().is_none();
    if is_empty {
        if args.interactive && !prompt_yes(&format!("remove directory '{}'?", real_path.display())) {
            return Ok(());
        }
        fs::remove_dir(real_path)?;
        return Ok(());
    }
    if !args.recursive {
        bail!("cannot remove '{}': Is a directory", real_path.display());
    }
    remove_directory_recursively(real_path, args.interactive)?;
    fs::remove_dir(real_path)?;
    Ok(())
}

fn remove_entry(raw: &str, args: &Args) -> anyhow::Result<()> {
    let chain = canonicalize(raw);
    let tail = chain.tail_index();
    if !chain.exists(tail) {
        if args.force {
            return Ok(());
        }
        bail!("cannot remove '{raw}': {}", ChainError::NotFound);
    }

    let real_path = chain.real_path(tail).to_path_buf();
    if chain.is_directory(tail) {
        if !args.recursive && !args.dir {
            bail!("cannot remove '{raw}': Is a directory");
        }
        remove_directory(&real_path, args)
    } else {
        if args.interactive && !prompt_yes(&format!("remove '{raw}'?")) {
            return Ok(());
        }
        info!("removing '{}'", real_path.display());
        fs::remove_file(&real_path)?;
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let args = Args::parse();

    let mut had_error = false;
    for raw in &args.paths {
        if let Err(err) = remove_entry(raw, &args) {
            eprintln!("rm: {err}");
            had_error = true;
        }
    }

    if had_error {
        std::process::exit(1);
    }
    Ok(())
}
