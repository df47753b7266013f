//! Concatenating print family: no format string, arguments written as-is.
//!
//! The `ln` variants separate arguments with a space and end with a
//! newline; the plain variants join with nothing.

use std::io::{self, Write};

use strfmt_core::{concat_to_string, concat_to_writer};

/// Concatenate `args`.
pub fn sprint<S: AsRef<str>>(args: &[S]) -> String {
    concat_to_string(args, false)
}

/// Join `args` with spaces and append a newline.
pub fn sprintln<S: AsRef<str>>(args: &[S]) -> String {
    concat_to_string(args, true)
}

pub fn fprint<W: Write + ?Sized, S: AsRef<str>>(writer: &mut W, args: &[S]) -> io::Result<usize> {
    concat_to_writer(writer, args, false)
}

pub fn fprintln<W: Write + ?Sized, S: AsRef<str>>(writer: &mut W, args: &[S]) -> io::Result<usize> {
    concat_to_writer(writer, args, true)
}

pub fn print<S: AsRef<str>>(args: &[S]) -> io::Result<usize> {
    fprint(&mut io::stdout().lock(), args)
}

pub fn println<S: AsRef<str>>(args: &[S]) -> io::Result<usize> {
    fprintln(&mut io::stdout().lock(), args)
}
