/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};

use clap::Parser;
use pathchain::canonicalize;
use pathchain::perm::is_file_read_permitted;

#[derive(Parser, Debug)]
#[command(version, about = "concatenate files and print to stdout", long_about = None)]
struct Args {
    /// equivalent to -vET
    #[arg(short = 'A', long = "show-all")]
    show_all: bool,

    /// number non-blank output lines, overrides -n
    #[arg(short = 'b', long = "number-nonblank")]
    number_nonblank: bool,

    /// equivalent to -vE
    #[arg(short = 'e')]
    show_nonprinting_ends: bool,

    /// display '$' at the end of each line
    #[arg(short = 'E', long = "show-ends")]
    show_ends: bool,

    /// number all output lines
    #[arg(short = 'n', long = "number")]
    number: bool,

    /// suppress repeated empty output lines
    #[arg(short = 's', long = "squeeze-blank")]
    squeeze_blank: bool,

    /// equivalent to -vT
    #[arg(short = 't')]
    show_nonprinting_tabs: bool,

    /// display TAB characters as ^I
    #[arg(short = 'T', long = "show-tabs")]
    show_tabs: bool,

    files: Vec<String>,
}

impl Args {
    fn show_ends(&self) -> bool {
        self.show_all || self.show_nonprinting_ends || self.show_ends
    }

    fn show_tabs(&self) -> bool {
        self.show_all || self.show_nonprinting_tabs || self.show_tabs
    }
}

/// A line counts as blank only when it is exactly empty, matching the
/// original's squeeze policy: a whitespace-only line is not collapsed.
fn is_blank(line: &str) -> bool {
    line.is_empty()
}

fn render_line(line: &str, args: &Args) -> String {
    let mut rendered = if args.show_tabs() { line.replace('\t', "^I") } else { line.to_string() };
    if args.show_ends() {
        rendered.push('$');
    }
    rendered
}

fn cat_reader<R: BufRead>(reader: R, args: &Args, line_no: &mut usize, stdout: &mut impl Write) -> io::Result<()> {
    let mut prev_was_blank = false;
    for line in reader.lines() {
        let line = line?;
        let blank = is_blank(&line);
        if args.squeeze_blank && blank && prev_was_blank {
            continue;
        }
        prev_was_blank = blank;

        let rendered = render_line(&line, args);
        let numbered = args.number_nonblank || args.number;
        let should_number = if args.number_nonblank { !blank } else { numbered };
        if should_number {
            *line_no += 1;
            writeln!(stdout, "{:>6}\t{rendered}", line_no)?;
        } else {
            writeln!(stdout, "{rendered}")?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    pathchain::logging::init().ok();
    let args = Args::parse();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let mut line_no = 0usize;

    if args.files.is_empty() {
        let stdin = io::stdin();
        cat_reader(stdin.lock(), &args, &mut line_no, &mut handle)?;
        return Ok(());
    }

    let mut had_error = false;
    for path in &args.files {
        if path == "-" {
            let stdin = io::stdin();
            cat_reader(stdin.lock(), &args, &mut line_no, &mut handle)?;
            continue;
        }

        let chain = canonicalize(path);
        let tail = chain.tail_index();
        if !chain.exists(tail) {
            eprintln!("cat: {path}: No such file or directory");
            had_error = true;
            continue;
        }
        if chain.is_directory(tail) {
            eprintln!("cat: {path}: Is a directory");
            had_error = true;
            continue;
        }
        if !is_file_read_permitted(&chain, tail) {
            eprintln!("cat: {path}: Permission denied");
            had_error = true;
            continue;
        }

        let file = File::open(chain.real_path(tail))?;
        let mut reader = BufReader::new(file);
        let plain = !args.number
            && !args.number_nonblank
            && !args.squeeze_blank
            && !args.show_ends()
            && !args.show_tabs();
        if plain {
            io::copy(&mut reader, &mut handle)?;
        } else {
            cat_reader(reader.by_ref(), &args, &mut line_no, &mut handle)?;
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
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["cat"];
        full.extend_from_slice(argv);
        Args::parse_from(full)
    }

    #[test]
    fn show_ends_appends_dollar() {
        assert_eq!(render_line("hi", &args(&["-E"])), "hi$");
    }

    #[test]
    fn show_tabs_renders_caret_i() {
        assert_eq!(render_line("a\tb", &args(&["-T"])), "a^Ib");
    }

    #[test]
    fn show_all_implies_both() {
        let rendered = render_line("a\tb", &args(&["-A"]));
        assert_eq!(rendered, "a^Ib$");
    }
}
