//! Diff rendering for fixture comparison.

use std::fmt::Write;

/// Render a text diff between expected and actual output.
///
/// Rendered formats are mostly single-line, so besides per-line hunks the
/// diff names the first differing character.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let actual_lines: Vec<&str> = actual.split('\n').collect();
    for i in 0..expected_lines.len().max(actual_lines.len()) {
        let e = expected_lines.get(i);
        let a = actual_lines.get(i);
        if e == a {
            continue;
        }
        let _ = writeln!(out, "@@ line {} @@", i + 1);
        if let Some(e) = e {
            let _ = writeln!(out, "-{e:?}");
        }
        if let Some(a) = a {
            let _ = writeln!(out, "+{a:?}");
        }
    }

    let column = expected
        .chars()
        .zip(actual.chars())
        .take_while(|(e, a)| e == a)
        .count();
    let _ = writeln!(out, "first difference at char {column}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs() {
        assert_eq!(render_diff("same", "same"), "[identical]");
    }

    #[test]
    fn single_line_mismatch() {
        let diff = render_diff("%!s(MISSING)", "%!s(BADINDEX)");
        assert!(diff.starts_with("--- expected\n+++ actual\n@@ line 1 @@\n"));
        assert!(diff.contains("-\"%!s(MISSING)\""));
        assert!(diff.contains("+\"%!s(BADINDEX)\""));
        assert!(diff.ends_with("first difference at char 4\n"));
    }

    #[test]
    fn extra_line_is_reported() {
        let diff = render_diff("a", "a\nb");
        assert!(diff.contains("@@ line 2 @@\n+\"b\"\n"));
    }
}
