//! # strfmt
//!
//! `printf`-style formatting where every argument is a string.
//!
//! Supported verbs are `%s` (plain), `%q` (quoted), `%x`/`%X` (hex bytes)
//! and `%%`. Flags `+ - # 0` and space, fixed widths and precisions, and
//! explicit `[n]` argument indexes are understood. Mistakes in the format
//! or argument list never panic or fail; they show up in the output the
//! same way Go's `fmt` reports them:
//!
//! ```
//! assert_eq!(strfmt::sprintf("%s-%q", &["a", "b"]), "a-\"b\"");
//! assert_eq!(strfmt::sprintf("%s %s", &["a"]), "a %!s(MISSING)");
//! assert_eq!(strfmt::sprintf("%d", &["7"]), "%!d(string=7)");
//! ```
//!
//! Compiled formats are cached process-wide; see [`set_cache_threshold`].

#![deny(unsafe_code)]

mod error;
mod macros;
mod print;

use std::io::{self, Write};

pub use error::FormattedError;
pub use print::{fprint, fprintln, print, println, sprint, sprintln};
pub use strfmt_core::{CompiledFormat, compile};
pub use strfmt_runtime::{CacheThreshold, cache_threshold, set_cache_threshold};

/// Format `args` according to `format`.
pub fn sprintf<S: AsRef<str>>(format: &str, args: &[S]) -> String {
    let compiled = strfmt_runtime::lookup(format);
    strfmt_core::render_to_string(&compiled, args)
}

/// Format into `writer` with a single `write_all`. Returns the number of
/// bytes written; writer errors are returned unchanged.
pub fn fprintf<W, S>(writer: &mut W, format: &str, args: &[S]) -> io::Result<usize>
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    let compiled = strfmt_runtime::lookup(format);
    strfmt_core::render_to_writer(writer, &compiled, args)
}

/// Format to standard output.
pub fn printf<S: AsRef<str>>(format: &str, args: &[S]) -> io::Result<usize> {
    fprintf(&mut io::stdout().lock(), format, args)
}

/// Format into an error value whose message is the formatted text.
pub fn errorf<S: AsRef<str>>(format: &str, args: &[S]) -> FormattedError {
    FormattedError::new(sprintf(format, args))
}

/// Render an already compiled format, bypassing the cache.
pub fn sprintf_compiled<S: AsRef<str>>(compiled: &CompiledFormat, args: &[S]) -> String {
    strfmt_core::render_to_string(compiled, args)
}

/// Write an already compiled format to `writer`, bypassing the cache.
pub fn write_compiled<W, S>(writer: &mut W, compiled: &CompiledFormat, args: &[S]) -> io::Result<usize>
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    strfmt_core::render_to_writer(writer, compiled, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprintf_basic() {
        assert_eq!(sprintf("%s=%q", &["k", "v"]), "k=\"v\"");
        assert_eq!(sprintf("", &[] as &[&str]), "");
        assert_eq!(sprintf("plain", &[] as &[&str]), "plain");
    }

    #[test]
    fn test_sprintf_owned_args() {
        let args = vec![String::from("x"), String::from("y")];
        assert_eq!(sprintf("%[2]s%[1]s", &args), "yx");
    }

    #[test]
    fn test_fprintf_counts_bytes() {
        let mut out = Vec::new();
        let n = fprintf(&mut out, "%-4s|", &["ab"]).unwrap();
        assert_eq!(n, 5);
        assert_eq!(out, b"ab  |");
    }

    #[test]
    fn test_fprintf_empty_writes_nothing() {
        let mut out = Vec::new();
        assert_eq!(fprintf(&mut out, "", &[] as &[&str]).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_errorf_message() {
        let err = errorf("open %q: %s", &["a.txt", "denied"]);
        assert_eq!(err.to_string(), "open \"a.txt\": denied");
        assert_eq!(err.message(), "open \"a.txt\": denied");
    }

    #[test]
    fn test_compiled_entry_points() {
        let compiled = compile("<%x>");
        assert_eq!(sprintf_compiled(&compiled, &["hi"]), "<6869>");
        let mut out = Vec::new();
        assert_eq!(write_compiled(&mut out, &compiled, &["hi"]).unwrap(), 6);
        assert_eq!(out, b"<6869>");
    }
}
