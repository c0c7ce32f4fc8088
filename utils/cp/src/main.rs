/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::bail;
use clap::Parser;
use log::info;
use pathchain::entry::{is_same_entry, is_subdirectory};
use pathchain::{canonicalize, get_real_destination, ChainError};

#[derive(Parser, Debug)]
#[command(version, about = "copy files and directories", long_about = None)]
struct Args {
    /// prompt before overwriting an existing destination
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// copy directories recursively
    #[arg(short = 'r', long = "recursively")]
    recursively: bool,

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

fn copy_file(source: &Path, destination: &Path) -> anyhow::Result<()> {
    info!("copying '{}' to '{}'", source.display(), destination.display());
    fs::copy(source, destination)?;
    Ok(())
}

fn overwrite_file(source: &Path, destination: &Path, args: &Args) -> anyhow::Result<()> {
    if args.interactive && !prompt_yes(&format!("overwrite '{}'?", destination.display())) {
        return Ok(());
    }
    copy_file(source, destination)
}

fn copy_empty_directory(destination: &Path) -> anyhow::Result<()> {
    fs::create_dir(destination)?;
    Ok(())
}

fn copy_directory_recursively(source: &Path, destination: &Path, args: &Args) -> anyhow::Result<()> {
    if !destination.exists() {
        fs::create_dir(destination)?;
    }
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let child_source = entry.path();
        let child_destination = destination.join(entry.file_name());
        operate_entry_once(&child_source, &child_destination, args)?;
    }
    let source_meta = fs::symlink_metadata(source)?;
    fs::set_permissions(destination, source_meta.permissions())?;
    Ok(())
}

/// Guards against copying an entry onto itself or a directory into its own
/// subtree before dispatching to the file/directory copy routines.
fn operate_entry_once(source: &Path, destination: &Path, args: &Args) -> anyhow::Result<()> {
    if is_same_entry(source, destination) {
        bail!(ChainError::SameFile(
            source.display().to_string(),
            destination.display().to_string()
        ));
    }

    let source_meta = fs::symlink_metadata(source)?;
    if source_meta.is_dir() {
        if !args.recursively {
            bail!("-r not specified; omitting directory '{}'", source.display());
        }
        if is_subdirectory(destination, source) {
            bail!(
                "cannot copy a directory, '{}', into itself, '{}'",
                source.display(),
                destination.display()
            );
        }
        if destination.exists() {
            if !destination.is_dir() {
                bail!(ChainError::NotADirectory);
            }
            copy_directory_recursively(source, destination, args)
        } else {
            copy_empty_directory(destination)?;
            copy_directory_recursively(source, destination, args)
        }
    } else {
        if destination.is_dir() {
            bail!(ChainError::IsADirectory);
        }
        if destination.exists() {
            overwrite_file(source, destination, args)
        } else {
            copy_file(source, destination)
        }
    }
}

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let args = Args::parse();

    let source_chain = canonicalize(&args.source);
    let source_tail = source_chain.tail_index();
    if !source_chain.exists(source_tail) {
        eprintln!("cp: cannot stat '{}': No such file or directory", args.source);
        std::process::exit(1);
    }

    let target_chain = canonicalize(&args.destination);
    let destination_chain = match get_real_destination(source_chain.filename(source_tail), &target_chain) {
        Ok(chain) => chain,
        Err(err) => {
            eprintln!("cp: cannot copy to '{}': {err}", args.destination);
            std::process::exit(1);
        }
    };

    let result = operate_entry_once(
        source_chain.real_path(source_tail),
        destination_chain.real_path(destination_chain.tail_index()),
        &args,
    );
    if let Err(err) = result {
        eprintln!("cp: {err}");
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn recursive_copy_preserves_the_source_directory_mode() {
        let root = std::env::temp_dir().join(format!("cp-test-{}", std::process::id()));
        let source = root.join("src");
        let destination = root.join("dst");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("file.txt"), b"hi").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o700)).unwrap();

        let args = Args {
            interactive: false,
            recursively: true,
            source: source.display().to_string(),
            destination: destination.display().to_string(),
        };
        copy_directory_recursively(&source, &destination, &args).unwrap();

        let src_mode = fs::symlink_metadata(&source).unwrap().permissions().mode() & 0o777;
        let dst_mode = fs::symlink_metadata(&destination).unwrap().permissions().mode() & 0o777;
        assert_eq!(src_mode, dst_mode);

        fs::remove_dir_all(&root).ok();
    }
}
