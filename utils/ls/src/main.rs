/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs::{self, DirEntry, Metadata};
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::Path;

use chrono::{Local, TimeZone};
use clap::Parser;
use pathchain::canonicalize;
use pathchain::mode::{rwx_string, type_char};
use users::{get_group_by_gid, get_user_by_uid};

#[derive(Parser, Debug)]
#[command(version, about = "list directory contents", long_about = None)]
struct Args {
    /// show entries starting with '.'
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// use a long listing format
    #[arg(short = 'l', long = "long")]
    long: bool,

    /// append '/' to directory names
    #[arg(short = 'p')]
    classify_dirs: bool,

    paths: Vec<String>,
}

const PAGE_SIZE: u64 = 4096;

/// Byte-wise ordering, matching the original's plain `strcmp`-based sort
/// rather than a locale-aware collation.
fn entry_priority_compare(a: &str, b: &str) -> std::cmp::Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

struct Listed {
    name: String,
    metadata: Metadata,
}

fn collect_entries(dir: &Path, all: bool) -> anyhow::Result<Vec<Listed>> {
    let mut entries: Vec<Listed> = Vec::new();
    if all {
        entries.push(Listed {
            name: ".".to_string(),
            metadata: fs::metadata(dir)?,
        });
        if let Some(parent) = dir.parent() {
            entries.push(Listed {
                name: "..".to_string(),
                metadata: fs::metadata(parent)?,
            });
        }
    }
    for entry in fs::read_dir(dir)? {
        let entry: DirEntry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !all && name.starts_with('.') {
            continue;
        }
        entries.push(Listed {
            name,
            metadata: entry.metadata()?,
        });
    }
    entries.sort_by(|a, b| entry_priority_compare(&a.name, &b.name));
    Ok(entries)
}

fn display_name(name: &str, metadata: &Metadata, args: &Args) -> String {
    if args.classify_dirs && metadata.is_dir() {
        format!("{name}/")
    } else {
        name.to_string()
    }
}

/// `%d-%m-20%y %H:%M`, ported literally from the original's `strftime` call:
/// the "20" is a hardcoded format literal, not a real century computation.
fn format_ctime(metadata: &Metadata) -> String {
    match Local.timestamp_opt(metadata.ctime(), 0).single() {
        Some(dt) => dt.format("%d-%m-20%y %H:%M").to_string(),
        None => "??-??-???? ??:??".to_string(),
    }
}

fn list_entry_attribute(name: &str, metadata: &Metadata) -> String {
    let type_c = type_char(&metadata.file_type());
    let perms = rwx_string(metadata.permissions().mode() & 0o777);
    let owner = get_user_by_uid(metadata.uid())
        .map(|u| u.name().to_string_lossy().to_string())
        .unwrap_or_else(|| metadata.uid().to_string());
    let group = get_group_by_gid(metadata.gid())
        .map(|g| g.name().to_string_lossy().to_string())
        .unwrap_or_else(|| metadata.gid().to_string());
    let date = format_ctime(metadata);

    format!(
        "{type_c}{perms} {:>3} {:<8} {:<8} {:>8} {date} {name}",
        metadata.nlink(),
        owner,
        group,
        metadata.size(),
    )
}

/// Block count header used in `-l` mode: each entry's size rounded up to a
/// page and expressed in 4-unit blocks, matching the original's (nonstandard)
/// accounting rather than `st_blocks`.
fn total_blocks(entries: &[Listed]) -> u64 {
    entries
        .iter()
        .map(|e| e.metadata.size().div_ceil(PAGE_SIZE) * 4)
        .sum()
}

fn list_directory_once(dir: &Path, args: &Args) -> anyhow::Result<()> {
    let entries = collect_entries(dir, args.all)?;
    if args.long {
        println!("total {}", total_blocks(&entries));
    }
    for entry in &entries {
        let name = display_name(&entry.name, &entry.metadata, args);
        if args.long {
            println!("{}", list_entry_attribute(&name, &entry.metadata));
        } else {
            println!("{name}");
        }
    }
    Ok(())
}

fn list_file_once(path: &Path, name: &str, args: &Args) -> anyhow::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    let shown = display_name(name, &metadata, args);
    if args.long {
        println!("total {}", metadata.size().div_ceil(PAGE_SIZE) * 4);
        println!("{}", list_entry_attribute(&shown, &metadata));
    } else {
        println!("{shown}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let mut args = Args::parse();
    if args.paths.is_empty() {
        args.paths.push(".".to_string());
    }

    let multiple = args.paths.len() > 1;
    let mut had_error = false;
    for (i, raw) in args.paths.iter().enumerate() {
        let chain = canonicalize(raw);
        let tail = chain.tail_index();
        if !chain.exists(tail) {
            eprintln!("ls: cannot access '{raw}': No such file or directory");
            had_error = true;
            continue;
        }

        if multiple {
            if i > 0 {
                println!();
            }
            println!("{raw}:");
        }

        let real_path = chain.real_path(tail);
        let result = if chain.is_directory(tail) {
            list_directory_once(real_path, &args)
        } else {
            list_file_once(real_path, chain.filename(tail), &args)
        };
        if let Err(err) = result {
            eprintln!("ls: {raw}: {err}");
            had_error = true;
        }
    }

    if had_error {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_format_includes_a_date_column_before_the_name() {
        let path = std::env::temp_dir().join(format!("ls-test-{}", std::process::id()));
        fs::write(&path, b"hi").unwrap();
        let metadata = fs::symlink_metadata(&path).unwrap();

        let line = list_entry_attribute("file.txt", &metadata);
        let fields: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(fields.last(), Some(&"file.txt"));

        let date = fields[fields.len() - 3];
        let time = fields[fields.len() - 2];
        assert_eq!(date.len(), 10);
        assert_eq!(&date[2..3], "-");
        assert_eq!(&date[5..7], "20");
        assert_eq!(time.len(), 5);
        assert_eq!(&time[2..3], ":");

        fs::remove_file(&path).ok();
    }
}
