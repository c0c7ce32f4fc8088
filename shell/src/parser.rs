/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error near unexpected token `{0}'")]
    BeginWithDelimiter(String),
    #[error("syntax error near unexpected token `{0}'")]
    DelimiterConcat(String),
    #[error("syntax error near unexpected token `{0}'")]
    EmptyBetweenDelimiter(String),
}

#[derive(Debug, Clone)]
pub struct Redirect {
    pub append: bool,
    pub target: String,
}

#[derive(Debug, Clone, Default)]
pub struct SimpleCommand {
    pub argv: Vec<String>,
    pub stdout_redirect: Option<Redirect>,
    pub heredoc_delimiter: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    pub stages: Vec<SimpleCommand>,
}

/// Validates that `s`, once split on `delimiter`, never begins with it, never
/// repeats it back-to-back, and never leaves an empty segment between two
/// occurrences. This is run independently for `;`, `&&`, and `|`, mirroring
/// the original's three bespoke syntax checks.
fn catch_syntax_error(s: &str, delimiter: &str) -> Result<(), ParseError> {
    let trimmed = s.trim();
    if trimmed.starts_with(delimiter) {
        return Err(ParseError::BeginWithDelimiter(delimiter.to_string()));
    }
    for segment in trimmed.split(delimiter) {
        if segment.trim().is_empty() {
            return Err(ParseError::EmptyBetweenDelimiter(delimiter.to_string()));
        }
    }
    if trimmed.contains(&format!("{delimiter}{delimiter}")) {
        return Err(ParseError::DelimiterConcat(delimiter.to_string()));
    }
    Ok(())
}

/// Whitespace-run tokenizer: any run of spaces/tabs separates tokens, and
/// leading/trailing whitespace is dropped. Equivalent to `strtok_l` called
/// with the whole whitespace set as its delimiter string.
fn tokenize(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

/// Returns the redirect/heredoc operator a token begins with, if any. Checked
/// in this order since `>>` and `<<` are themselves valid prefixes of longer
/// operators no token here has (there's nothing past `>>`/`<<`).
fn operator_prefix(token: &str) -> Option<&'static str> {
    if token.starts_with("<<") {
        Some("<<")
    } else if token.starts_with(">>") {
        Some(">>")
    } else if token.starts_with('>') {
        Some(">")
    } else {
        None
    }
}

/// Same three violations `catch_syntax_error` checks for `;`/`&&`/`|`, applied
/// token-by-token to `<<`/`>`/`>>`: these can't open a command, can't appear
/// back-to-back, and a bare occurrence (no target glued onto it) must be
/// followed by an actual word, not another operator.
fn catch_operator_syntax_error(tokens: &[String]) -> Result<(), ParseError> {
    if let Some(first) = tokens.first() {
        if let Some(op) = operator_prefix(first) {
            return Err(ParseError::BeginWithDelimiter(op.to_string()));
        }
    }
    for i in 0..tokens.len() {
        let Some(op) = operator_prefix(&tokens[i]) else {
            continue;
        };
        if tokens[i] != op {
            // Target glued directly onto the operator, e.g. `>>file`.
            continue;
        }
        match tokens.get(i + 1) {
            None => return Err(ParseError::EmptyBetweenDelimiter(op.to_string())),
            Some(next) if operator_prefix(next) == Some(next.as_str()) => {
                return Err(ParseError::DelimiterConcat(op.to_string()));
            }
            Some(next) if operator_prefix(next).is_some() => {
                return Err(ParseError::EmptyBetweenDelimiter(op.to_string()));
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_simple_command(s: &str) -> Result<SimpleCommand, ParseError> {
    let tokens = tokenize(s);
    catch_operator_syntax_error(&tokens)?;
    let mut command = SimpleCommand::default();
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if let Some(delim) = token.strip_prefix("<<") {
            if !delim.is_empty() {
                command.heredoc_delimiter = Some(delim.to_string());
            } else if let Some(next) = iter.next() {
                command.heredoc_delimiter = Some(next);
            }
        } else if let Some(target) = token.strip_prefix(">>") {
            let target = if target.is_empty() { iter.next().unwrap_or_default() } else { target.to_string() };
            command.stdout_redirect = Some(Redirect { append: true, target });
        } else if let Some(target) = token.strip_prefix('>') {
            let target = if target.is_empty() { iter.next().unwrap_or_default() } else { target.to_string() };
            command.stdout_redirect = Some(Redirect { append: false, target });
        } else {
            command.argv.push(token);
        }
    }

    Ok(command)
}

fn parse_pipeline(s: &str) -> Result<Pipeline, ParseError> {
    catch_syntax_error(s, "|")?;
    let stages = s
        .split('|')
        .map(str::trim)
        .map(parse_simple_command)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Pipeline { stages })
}

/// Splits a full logical command line into pipelines, by `;` and then by
/// `&&`. Both delimiters are purely sequential here: a command unit's exit
/// status is never inspected to decide whether the next one runs.
pub fn parse_line(line: &str) -> Result<Vec<Pipeline>, ParseError> {
    if line.trim().is_empty() {
        return Ok(Vec::new());
    }
    catch_syntax_error(line, ";")?;

    let mut pipelines = Vec::new();
    for semi_segment in line.split(';').map(str::trim) {
        catch_syntax_error(semi_segment, "&&")?;
        for piece in semi_segment.split("&&").map(str::trim) {
            pipelines.push(parse_pipeline(piece)?);
        }
    }
    Ok(pipelines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_pipelines_by_semicolon_and_andand() {
        let pipelines = parse_line("cat a.txt; echo hi && whoami").unwrap();
        assert_eq!(pipelines.len(), 3);
        assert_eq!(pipelines[0].stages[0].argv, vec!["cat", "a.txt"]);
        assert_eq!(pipelines[2].stages[0].argv, vec!["whoami"]);
    }

    #[test]
    fn splits_pipeline_stages_by_pipe() {
        let pipelines = parse_line("cat a.txt | cat -n").unwrap();
        assert_eq!(pipelines.len(), 1);
        assert_eq!(pipelines[0].stages.len(), 2);
        assert_eq!(pipelines[0].stages[1].argv, vec!["cat", "-n"]);
    }

    #[test]
    fn rejects_a_line_beginning_with_a_delimiter() {
        assert_eq!(
            parse_line("; echo hi"),
            Err(ParseError::BeginWithDelimiter(";".to_string()))
        );
    }

    #[test]
    fn rejects_two_consecutive_delimiters() {
        assert_eq!(
            parse_line("echo hi ;; echo bye"),
            Err(ParseError::EmptyBetweenDelimiter(";".to_string()))
        );
    }

    #[test]
    fn parses_a_redirect_and_a_heredoc() {
        let pipelines = parse_line("cat > out.txt").unwrap();
        let redirect = pipelines[0].stages[0].stdout_redirect.as_ref().unwrap();
        assert!(!redirect.append);
        assert_eq!(redirect.target, "out.txt");

        let pipelines = parse_line("cat <<EOF").unwrap();
        assert_eq!(pipelines[0].stages[0].heredoc_delimiter.as_deref(), Some("EOF"));
    }

    #[test]
    fn rejects_a_doubled_redirect_operator() {
        assert!(parse_line("cmd >> >> file").is_err());
        assert!(parse_line("cmd << <<X").is_err());
    }

    #[test]
    fn all_syntax_errors_share_one_message() {
        let begin = ParseError::BeginWithDelimiter(";".to_string());
        let concat = ParseError::DelimiterConcat(";".to_string());
        let empty = ParseError::EmptyBetweenDelimiter(";".to_string());
        assert_eq!(begin.to_string(), empty.to_string());
        assert_eq!(concat.to_string(), empty.to_string());
    }
}
