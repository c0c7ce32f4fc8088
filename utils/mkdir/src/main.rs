/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs;
use std::os::unix::fs::PermissionsExt;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use pathchain::canonicalize;
use pathchain::mode::ModeBits;
use pathchain::perm::is_directory_write_permitted;

#[derive(Parser, Debug)]
#[command(version, about = "create directories", long_about = None)]
struct Args {
    /// create intermediate directories as required
    #[arg(short = 'p', long = "parents")]
    parents: bool,

    /// set the mode of created directories (octal, e.g. 755, or rwx letters)
    #[arg(short = 'm', long = "mode")]
    mode: Option<String>,

    directories: Vec<String>,
}

const INTERMEDIATE_MODE: u32 = 0o755;

fn parse_mode(spec: &str) -> anyhow::Result<u32> {
    if spec.bytes().all(|b| b.is_ascii_digit()) {
        Ok(ModeBits::from_octal_str(spec)
            .with_context(|| format!("invalid mode: '{spec}'"))?
            .0)
    } else {
        Ok(ModeBits::from_rwx_str(spec)
            .with_context(|| format!("invalid mode: '{spec}'"))?
            .0)
    }
}

fn make_directory_once(path: &str, mode: u32) -> anyhow::Result<()> {
    let chain = canonicalize(path);
    let tail = chain.tail_index();
    if chain.exists(tail) {
        bail!("cannot create directory '{path}': File exists");
    }
    let parent = chain
        .parent_index(tail)
        .with_context(|| format!("cannot create directory '{path}': No such file or directory"))?;
    if !chain.is_directory(parent) {
        bail!("cannot create directory '{path}': Not a directory");
    }
    if !is_directory_write_permitted(&chain, parent) {
        bail!("cannot create directory '{path}': Permission denied");
    }

    info!("creating directory '{}'", chain.real_path(tail).display());
    fs::create_dir(chain.real_path(tail))
        .with_context(|| format!("cannot create directory '{path}'"))?;
    fs::set_permissions(chain.real_path(tail), fs::Permissions::from_mode(mode))
        .with_context(|| format!("failed to set mode on '{path}'"))
}

/// Creates every missing ancestor at mode 0755, then the final directory at
/// the requested mode via a trailing chmod.
fn make_directory_recursively(path: &str, mode: u32) -> anyhow::Result<()> {
    let chain = canonicalize(path);
    let tail = chain.tail_index();
    if chain.exists(tail) {
        return Ok(());
    }

    let mut missing = Vec::new();
    let mut idx = tail;
    loop {
        if chain.exists(idx) {
            break;
        }
        missing.push(idx);
        match chain.parent_index(idx) {
            Some(parent) => idx = parent,
            None => break,
        }
    }
    missing.reverse();

    for idx in &missing {
        let real = chain.real_path(*idx);
        if !real.exists() {
            fs::create_dir(real).with_context(|| format!("cannot create directory '{}'", real.display()))?;
            fs::set_permissions(real, fs::Permissions::from_mode(INTERMEDIATE_MODE)).ok();
        }
    }

    fs::set_permissions(chain.real_path(tail), fs::Permissions::from_mode(mode))
        .with_context(|| format!("failed to set mode on '{path}'"))
}

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let args = Args::parse();

    let mode = match &args.mode {
        Some(spec) => parse_mode(spec)?,
        None => 0o755,
    };

    let mut had_error = false;
    for dir in &args.directories {
        let result = if args.parents {
            make_directory_recursively(dir, mode)
        } else {
            make_directory_once(dir, mode)
        };
        if let Err(err) = result {
            eprintln!("mkdir: {err}");
            had_error = true;
        }
    }

    if had_error {
        std::process::exit(1);
    }
    Ok(())
}
