// The error taxonomy shared by every layer of the crate.
//
// Every message is rendered with an `ERROR:\n` header and consistent
// indentation, with no trailing newline. `SolverError` is a flat enum
// rather than a class hierarchy -- one enum, manual `Display`, manual
// `std::error::Error`, `serde::Serialize` so a driver can report an
// error as JSON.
use serde::Serialize;
use std::fmt;

use crate::command_line;
use crate::utils;

const INDENT: &str = "    ";

#[derive(Debug, Serialize)]
pub enum SolverError {
    Alphabet(String),
    GridStructure(String),
    RegexStructure(String),
    InputFile(String),
    InputFileAt {
        path: String,
        line: usize,
        source_line: String,
        message: String,
    },
    /// Precondition: `position <= regex.len()`.
    RegexParse {
        message: String,
        regex: String,
        position: usize,
    },
    CommandLine(String),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", without_trailing_newline(&self.body()))
    }
}

impl std::error::Error for SolverError {}

impl SolverError {
    fn body(&self) -> String {
        let header = "ERROR:\n".to_string();

        let rest = match self {
            SolverError::Alphabet(message) => indent_and_combine_message(message),
            SolverError::GridStructure(message) => indent_and_combine_message(message),
            SolverError::RegexStructure(message) => indent_and_combine_message(message),
            SolverError::InputFile(message) => indent_and_combine_message(message),
            SolverError::InputFileAt {
                path,
                line,
                source_line,
                message,
            } => format_input_file_at(path, *line, source_line, message),
            SolverError::RegexParse {
                message,
                regex,
                position,
            } => format_regex_parse(message, regex, *position),
            SolverError::CommandLine(message) => format_command_line(message),
        };

        header + &rest
    }
}

fn combine(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn indent(lines: &[String]) -> Vec<String> {
    lines.iter().map(|line| format!("{INDENT}{line}")).collect()
}

fn indent_and_combine(lines: &[String]) -> String {
    combine(&indent(lines))
}

fn indent_and_combine_message(message: &str) -> String {
    indent_and_combine(&utils::split_into_lines(message))
}

fn without_trailing_newline(s: &str) -> String {
    let mut result = s.to_string();

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Format an `InputFileAt` error:
///
/// ```text
///     in 'path', line N:
///         'source line'
///     message
/// ```
fn format_input_file_at(path: &str, line: usize, source_line: &str, message: &str) -> String {
    let line_1 = format!("in {}, line {}:", utils::quoted(path), line);
    let line_2 = format!("{INDENT}{}", utils::quoted(source_line));
    let line_3 = message.to_string();

    // `line_2` carries its own indentation already, so after the
    // wrapping `indent_and_combine()` it ends up doubly indented
    // relative to `line_1` and `line_3`.
    indent_and_combine(&[line_1, line_2, line_3])
}

/// Format a `RegexParse` error:
///
/// ```text
///     message:
///         'regex'
///          ^
/// ```
///
/// with the caret under column `position`.
fn format_regex_parse(message: &str, regex: &str, position: usize) -> String {
    debug_assert!(position <= regex.len());

    let line_1 = format!("{message}:");
    let line_2 = format!("{INDENT}{}", utils::quoted(regex));
    let line_3 = format!("{INDENT} {}^", " ".repeat(position));

    indent_and_combine(&[line_1, line_2, line_3])
}

/// Format a `CommandLine` error: the message, a blank line, then the
/// un-indented meta-usage hint.
fn format_command_line(message: &str) -> String {
    let mut lines = indent(&utils::split_into_lines(message));
    lines.push(String::new());
    lines.extend(utils::split_into_lines(&command_line::meta_usage()));
    combine(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_no_trailing_newline() {
        let err = SolverError::Alphabet("bad alphabet".to_string());
        let rendered = err.to_string();
        assert!(rendered.starts_with("ERROR:\n"));
        assert!(!rendered.ends_with('\n'));
        assert!(rendered.contains("bad alphabet"));
    }

    #[test]
    fn regex_parse_places_caret_at_position() {
        let err = SolverError::RegexParse {
            message: "unexpected token".to_string(),
            regex: "A[".to_string(),
            position: 2,
        };
        let rendered = err.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ERROR:");
        assert!(lines.iter().any(|l| l.contains("unexpected token:")));
        assert!(
            lines
                .iter()
                .any(|l| l == &format!("{INDENT}{INDENT} {}^", " ".repeat(2)))
        );
    }

    #[test]
    fn input_file_at_renders_three_lines() {
        let err = SolverError::InputFileAt {
            path: "grid.txt".to_string(),
            line: 3,
            source_line: "A.B".to_string(),
            message: "unbalanced brackets".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("in 'grid.txt', line 3:"));
        assert!(rendered.contains("'A.B'"));
        assert!(rendered.contains("unbalanced brackets"));
    }
}
