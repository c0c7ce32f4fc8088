/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::io::{self, BufRead, Write};

/// A line ending in one of the five operators that can't stand alone is
/// continued onto the next physical line: `&&`, `|`, `<<`, `>`, `>>`.
pub fn is_end_with_delimiter(line: &str) -> bool {
    let trimmed = line.trim_end();
    ["&&", "<<", ">>", "|", ">"].iter().any(|op| trimmed.ends_with(op))
}

/// Reads one raw line, bytes intact, returning `None` at EOF.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = String::new();
    let n = reader.read_line(&mut buf)?;
    if n == 0 {
        return Ok(None);
    }
    if buf.ends_with('\n') {
        buf.pop();
    }
    Ok(Some(buf))
}

/// Reads a full logical command: the first physical line plus every
/// continuation line, joined onto it whenever the line so far ends with
/// `&&`, `|`, `<<`, `>`, or `>>`, printing the `"> "` continuation prompt
/// before each extra line is read. Trims leading and trailing whitespace
/// from the assembled result.
pub fn read_command<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut full = match read_line(reader)? {
        Some(line) => line,
        None => return Ok(None),
    };

    while is_end_with_delimiter(&full) {
        print_prompt("> ")?;
        match read_line(reader)? {
            Some(next) => {
                full.push(' ');
                full.push_str(&next);
            }
            None => break,
        }
    }

    Ok(Some(full.trim().to_string()))
}

/// Reads lines verbatim until one equals `delimiter`, for heredoc bodies.
/// Must be called by the parent process before forking, since the heredoc
/// content comes from the same input stream as the rest of the script.
pub fn read_heredoc<R: BufRead>(reader: &mut R, delimiter: &str) -> io::Result<String> {
    let mut content = String::new();
    loop {
        match read_line(reader)? {
            Some(line) if line == delimiter => break,
            Some(line) => {
                content.push_str(&line);
                content.push('\n');
            }
            None => break,
        }
    }
    Ok(content)
}

pub fn print_prompt(prompt: &str) -> io::Result<()> {
    print!("{prompt}");
    io::stdout().flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_a_pipeline_split_across_lines() {
        let mut input = io::Cursor::new("echo one |\ncat -n\n".as_bytes());
        let command = read_command(&mut input).unwrap().unwrap();
        assert_eq!(command, "echo one | cat -n");
    }

    #[test]
    fn does_not_continue_a_complete_line() {
        let mut input = io::Cursor::new("whoami\n".as_bytes());
        let command = read_command(&mut input).unwrap().unwrap();
        assert_eq!(command, "whoami");
    }

    #[test]
    fn recognizes_all_five_continuation_operators() {
        for op in ["&&", "<<", ">>", "|", ">"] {
            assert!(is_end_with_delimiter(&format!("cmd {op}")), "operator {op} should continue");
        }
        assert!(!is_end_with_delimiter("cmd\\"));
    }
}
