// Small, pure helpers shared by the tokenizer, the error taxonomy, and
// the command-line layer.
use std::fmt::Display;
use std::fs::File;

use crate::command_line;

/// Whether `s` starts with `prefix`.
pub fn starts_with(s: &str, prefix: &str) -> bool {
    s.starts_with(prefix)
}

/// True for an empty string, or one made up entirely of whitespace.
pub fn has_only_whitespace(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace())
}

pub fn is_ascii_letter(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_octal_digit(c: u8) -> bool {
    (b'0'..=b'7').contains(&c)
}

/// Decimal value of `c`.
///
/// Precondition: `c` is an ASCII digit.
pub fn digit_to_int(c: u8) -> u32 {
    debug_assert!(c.is_ascii_digit());
    (c - b'0') as u32
}

/// Hexadecimal value of `c`, case-insensitive.
///
/// Precondition: `c` is an ASCII hex digit.
pub fn hex_digit_to_int(c: u8) -> u32 {
    debug_assert!(c.is_ascii_hexdigit());
    match c {
        b'0'..=b'9' => digit_to_int(c),
        b'a'..=b'f' => (c - b'a' + 10) as u32,
        b'A'..=b'F' => (c - b'A' + 10) as u32,
        _ => unreachable!(),
    }
}

/// `s` surrounded by single quotes.
pub fn quoted(s: &str) -> String {
    format!("'{s}'")
}

/// The lines of `s`, split on `\n`. A trailing newline does not produce
/// a final empty element.
pub fn split_into_lines(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<String> = s.split('\n').map(str::to_string).collect();

    if s.ends_with('\n') {
        lines.pop();
    }

    lines
}

/// Strictly parse `s` as an unsigned integer: no leading whitespace, no
/// sign, no extra trailing characters, no overflow. Leading zeros are
/// permitted.
pub fn string_to_unsigned<T>(s: &str) -> Option<T>
where
    T: TryFrom<u64>,
{
    if s.is_empty() {
        return None;
    }

    let first = s.as_bytes()[0];

    if first.is_ascii_whitespace() || first == b'-' {
        return None;
    }

    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: u64 = s.parse().ok()?;
    T::try_from(value).ok()
}

/// True iff `path` can be opened for reading, whatever kind of
/// filesystem entity it names.
pub fn filesystem_entity_exists(path: &str) -> bool {
    File::open(path).is_ok()
}

/// Emit `message` followed by a newline, but only if the command-line
/// layer's verbose flag is set.
pub fn print_verbose_message(sink: &mut impl std::io::Write, message: impl Display) {
    if command_line::is_verbose() {
        let _ = writeln!(sink, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_matches_prefix() {
        assert!(starts_with("--stop-after=2", "--stop-after"));
        assert!(!starts_with("foo", "--stop-after"));
    }

    #[test]
    fn has_only_whitespace_accepts_empty() {
        assert!(has_only_whitespace(""));
        assert!(has_only_whitespace("  \t\n"));
        assert!(!has_only_whitespace(" x "));
    }

    #[test]
    fn digit_conversions() {
        assert_eq!(digit_to_int(b'7'), 7);
        assert_eq!(hex_digit_to_int(b'a'), 10);
        assert_eq!(hex_digit_to_int(b'F'), 15);
    }

    #[test]
    fn quoted_wraps_in_single_quotes() {
        assert_eq!(quoted("abc"), "'abc'");
    }

    #[test]
    fn split_into_lines_drops_trailing_empty() {
        assert_eq!(
            split_into_lines("line 1\nline 2\n"),
            vec!["line 1".to_string(), "line 2".to_string()]
        );
        assert_eq!(split_into_lines(""), Vec::<String>::new());
        assert_eq!(split_into_lines("a\n\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn string_to_unsigned_is_strict() {
        assert_eq!(string_to_unsigned::<u32>("042"), Some(42));
        assert_eq!(string_to_unsigned::<u32>(""), None);
        assert_eq!(string_to_unsigned::<u32>(" 1"), None);
        assert_eq!(string_to_unsigned::<u32>("-1"), None);
        assert_eq!(string_to_unsigned::<u32>("1x"), None);
        assert_eq!(string_to_unsigned::<u8>("256"), None);
        assert_eq!(string_to_unsigned::<u8>("255"), Some(255));
    }

    #[test]
    fn filesystem_entity_exists_distinguishes_missing_paths() {
        assert!(!filesystem_entity_exists(
            "/this/path/should/not/exist/on/any/machine"
        ));
    }
}
