/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs;
use std::os::unix::fs::PermissionsExt;

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use pathchain::canonicalize;
use pathchain::mode::{apply_symbolic, ModeBits, ModeOp};
use pathchain::perm::is_directory_write_permitted;

#[derive(Parser, Debug)]
#[command(version, about = "change file mode bits", long_about = None)]
struct Args {
    /// octal mode (e.g. 755) or a symbolic spec (e.g. +rwx, -x, -u=r)
    mode: String,

    files: Vec<String>,
}

/// A symbolic spec is either a `+`/`-` operator followed by rwx letters, or
/// the literal `-u=` reset prefix followed by rwx letters.
fn parse_symbolic(spec: &str) -> anyhow::Result<(ModeOp, ModeBits)> {
    if let Some(rest) = spec.strip_prefix("-u=") {
        let bits = ModeBits::from_rwx_str(rest).with_context(|| format!("invalid mode: '{spec}'"))?;
        return Ok((ModeOp::Reset, bits));
    }

    let mut chars = spec.chars();
    let op = match chars.next() {
        Some('+') => ModeOp::Append,
        Some('-') => ModeOp::Remove,
        _ => bail!("invalid mode: '{spec}'"),
    };
    let bits = ModeBits::from_rwx_str(chars.as_str()).with_context(|| format!("invalid mode: '{spec}'"))?;
    Ok((op, bits))
}

fn new_mode(spec: &str, current: u32) -> anyhow::Result<u32> {
    if spec.bytes().all(|b| b.is_ascii_digit()) {
        Ok(ModeBits::from_octal_str(spec)
            .with_context(|| format!("invalid mode: '{spec}'"))?
            .0)
    } else {
        let (op, bits) = parse_symbolic(spec)?;
        Ok(apply_symbolic(current, bits, op))
    }
}

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let args = Args::parse();

    let mut had_error = false;
    for path in &args.files {
        let chain = canonicalize(path);
        let tail = chain.tail_index();
        if !chain.exists(tail) {
            eprintln!("chmod: cannot access '{path}': No such file or directory");
            had_error = true;
            continue;
        }
        let parent = chain.parent_index(tail);
        let permitted = parent
            .map(|p| is_directory_write_permitted(&chain, p))
            .unwrap_or(true);
        if !permitted {
            eprintln!("chmod: changing permissions of '{path}': Permission denied");
            had_error = true;
            continue;
        }

        let current = chain.attribute(tail).unwrap().permissions().mode() & 0o777;
        let mode = match new_mode(&args.mode, current) {
            Ok(m) => m,
            Err(err) => {
                eprintln!("chmod: {err}");
                had_error = true;
                continue;
            }
        };

        info!("chmod {:o} '{}'", mode, chain.real_path(tail).display());
        if let Err(err) = fs::set_permissions(chain.real_path(tail), fs::Permissions::from_mode(mode)) {
            eprintln!("chmod: changing permissions of '{path}': {err}");
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
    fn reset_requires_the_u_equals_prefix() {
        let (op, bits) = parse_symbolic("-u=rwx").unwrap();
        assert_eq!(op, ModeOp::Reset);
        assert_eq!(bits, ModeBits(0o777));
    }

    #[test]
    fn bare_equals_is_not_a_reset_trigger() {
        assert!(parse_symbolic("=rwx").is_err());
    }

    #[test]
    fn plain_minus_is_still_remove() {
        let (op, _) = parse_symbolic("-x").unwrap();
        assert_eq!(op, ModeOp::Remove);
    }
}
