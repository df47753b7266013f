//! Token renderer.
//!
//! Walks a [`CompiledFormat`] once, writing literals verbatim and handing
//! each verb its argument. Problems with arguments never abort a render;
//! they are reported inline:
//!
//! | condition                         | output                    |
//! |-----------------------------------|---------------------------|
//! | `*` width / precision             | `%!(BADWIDTH)` / `%!(BADPREC)` |
//! | `*` index past the argument list  | `%!c(BADINDEX)`           |
//! | verb index past the argument list | `%!c(MISSING)`            |
//! | unknown verb                      | `%!c(string=arg)`         |
//! | unreferenced trailing arguments   | `%!(EXTRA string=a, ...)` |

use std::io;

use crate::buffer::{ArenaBuffer, BufferPool, global_pool};
use crate::token::{
    ARG_TYPE, BAD_INDEX, BAD_PREC, BAD_WIDTH, CompiledFormat, EXTRA, EXTRA_SEPARATOR, Flags,
    MISSING, PERCENT_BANG, Token, Verb,
};
use crate::verbs;

/// Render `compiled` with `args`, appending to `buf`.
pub fn render<S: AsRef<str>>(compiled: &CompiledFormat, args: &[S], buf: &mut ArenaBuffer) {
    buf.reserve(compiled.min_output_size());
    for token in compiled.tokens() {
        render_token(compiled, token, args, buf);
    }
    write_extra(compiled.required_args(), args, buf);
}

/// Render with a buffer from the process-wide pool and return the text.
pub fn render_to_string<S: AsRef<str>>(compiled: &CompiledFormat, args: &[S]) -> String {
    global_pool().render_to_string(compiled, args)
}

/// Render with a buffer from the process-wide pool and write the result to
/// `writer` in one `write_all`. Returns the number of bytes written; an
/// empty result writes nothing.
pub fn render_to_writer<W, S>(writer: &mut W, compiled: &CompiledFormat, args: &[S]) -> io::Result<usize>
where
    W: io::Write + ?Sized,
    S: AsRef<str>,
{
    global_pool().render_to_writer(writer, compiled, args)
}

/// Concatenate `args`. With `line` set, arguments are separated by a space
/// and a newline ends the text.
pub fn concat_to_string<S: AsRef<str>>(args: &[S], line: bool) -> String {
    match args {
        [] if line => "\n".to_owned(),
        [] => String::new(),
        [only] if !line => only.as_ref().to_owned(),
        _ => {
            let mut buf = global_pool().acquire();
            concat(args, line, &mut buf);
            buf.into_string()
        }
    }
}

/// [`concat_to_string`] written to `writer` in one `write_all`.
pub fn concat_to_writer<W, S>(writer: &mut W, args: &[S], line: bool) -> io::Result<usize>
where
    W: io::Write + ?Sized,
    S: AsRef<str>,
{
    let mut buf = global_pool().acquire();
    concat(args, line, &mut buf);
    flush_to(writer, &buf)
}

impl BufferPool {
    /// [`render_to_string`] drawing its buffer from this pool. Empty and
    /// literal-only formats with no arguments skip the pool.
    pub fn render_to_string<S: AsRef<str>>(&self, compiled: &CompiledFormat, args: &[S]) -> String {
        if compiled.is_empty() && args.is_empty() {
            return String::new();
        }
        if args.is_empty() {
            if let Some(literal) = compiled.as_literal() {
                return literal.to_owned();
            }
        }
        let mut buf = self.acquire();
        render(compiled, args, &mut buf);
        buf.into_string()
    }

    /// [`render_to_writer`] drawing its buffer from this pool.
    pub fn render_to_writer<W, S>(&self, writer: &mut W, compiled: &CompiledFormat, args: &[S]) -> io::Result<usize>
    where
        W: io::Write + ?Sized,
        S: AsRef<str>,
    {
        let mut buf = self.acquire();
        render(compiled, args, &mut buf);
        flush_to(writer, &buf)
    }
}

fn flush_to<W: io::Write + ?Sized>(writer: &mut W, buf: &ArenaBuffer) -> io::Result<usize> {
    if buf.is_empty() {
        return Ok(0);
    }
    writer.write_all(buf.as_bytes())?;
    Ok(buf.len())
}

fn concat<S: AsRef<str>>(args: &[S], line: bool, buf: &mut ArenaBuffer) {
    for (i, arg) in args.iter().enumerate() {
        if line && i > 0 {
            buf.write_byte(b' ');
        }
        buf.write_str(arg.as_ref());
    }
    if line {
        buf.write_byte(b'\n');
    }
}

fn render_token<S: AsRef<str>>(compiled: &CompiledFormat, token: &Token, args: &[S], buf: &mut ArenaBuffer) {
    let value = compiled.value(token);
    if token.verb.is_literal() {
        buf.write_str(value);
        return;
    }

    let flags = token.flags;
    let mut bad_arg_num = false;
    let mut width = token.width;
    if flags.contains(Flags::INDIRECT_WIDTH) {
        bad_arg_num |= width.is_none_or(|index| index >= args.len());
        buf.write_str(BAD_WIDTH);
        width = None;
    }
    let mut precision = token.precision;
    if flags.contains(Flags::INDIRECT_PRECISION) {
        bad_arg_num |= precision.is_none_or(|index| index >= args.len());
        buf.write_str(BAD_PREC);
        precision = None;
    }

    if bad_arg_num {
        write_diagnostic(buf, value, BAD_INDEX);
        return;
    }
    let Some(arg) = args.get(token.arg) else {
        write_diagnostic(buf, value, MISSING);
        return;
    };
    let arg = arg.as_ref();
    match token.verb {
        Verb::Str => verbs::fmt_str(buf, arg, flags, width, precision),
        Verb::Quoted => verbs::fmt_quoted(buf, arg, flags, width, precision),
        Verb::Hex => verbs::fmt_hex(buf, arg, flags, width, precision),
        Verb::Bad | Verb::None => {
            buf.write_str(PERCENT_BANG);
            buf.write_str(value);
            buf.write_byte(b'(');
            buf.write_str(ARG_TYPE);
            buf.write_str(arg);
            buf.write_byte(b')');
        }
    }
}

fn write_diagnostic(buf: &mut ArenaBuffer, verb: &str, reason: &str) {
    buf.write_str(PERCENT_BANG);
    buf.write_str(verb);
    buf.write_str(reason);
}

fn write_extra<S: AsRef<str>>(required: usize, args: &[S], buf: &mut ArenaBuffer) {
    let Some(extra) = args.get(required..).filter(|rest| !rest.is_empty()) else {
        return;
    };
    buf.write_str(EXTRA);
    for (i, arg) in extra.iter().enumerate() {
        if i > 0 {
            buf.write_str(EXTRA_SEPARATOR);
        }
        buf.write_str(ARG_TYPE);
        buf.write_str(arg.as_ref());
    }
    buf.write_byte(b')');
}
