//! Format-string compiler.
//!
//! Single left-to-right pass over the format bytes. Literal runs are copied
//! into the compiled text, `%`-directives become verb tokens, and malformed
//! directives become literal diagnostics (`%!(NOVERB)`, `%!c(BADINDEX)`) so
//! the renderer never has to re-inspect the source.
//!
//! Directive grammar:
//!
//! ```text
//! % flags* [n]? (width | * | [n]*)? (. [n]? (digits | *))? [n]? verb
//! ```
//!
//! A plain letter right after the flags takes a fast path that skips index,
//! width and precision parsing entirely.

use crate::token::{
    BAD_INDEX, CompiledFormat, Flags, MAX_NUM, NO_VERB, PERCENT_BANG, Span, Token, Verb,
};

/// Compile `format` into tokens. Never fails.
pub fn compile(format: &str) -> CompiledFormat {
    let bytes = format.as_bytes();
    let mut out = Builder::new(format);
    let mut pos = 0;
    let mut cur_arg = 0usize;
    let mut need_args = 0usize;

    'scan: while pos < bytes.len() {
        if bytes[pos] != b'%' {
            let end = bytes[pos..]
                .iter()
                .position(|&b| b == b'%')
                .map_or(bytes.len(), |off| pos + off);
            out.literal(&format[pos..end]);
            pos = end;
            if pos == bytes.len() {
                break;
            }
        }

        // Flags, `%%` and the plain-letter fast path.
        let mut flags = Flags::empty();
        let mut i = pos + 1;
        while let Some(&c) = bytes.get(i) {
            match c {
                b'%' => {
                    out.literal("%");
                    pos = i + 1;
                    continue 'scan;
                }
                b'+' => flags |= Flags::PLUS,
                b'#' => flags |= Flags::SHARP,
                b' ' => flags |= Flags::SPACE,
                b'-' => {
                    flags |= Flags::MINUS;
                    flags.remove(Flags::ZERO);
                }
                b'0' => {
                    if !flags.contains(Flags::MINUS) {
                        flags |= Flags::ZERO;
                    }
                }
                c if c.is_ascii_alphabetic() => {
                    let (verb, upper) = Verb::from_char(char::from(c));
                    if upper {
                        flags |= Flags::UPPER;
                    }
                    out.verb(verb, &format[i..=i], flags, None, None, cur_arg);
                    cur_arg += 1;
                    need_args = need_args.max(cur_arg);
                    pos = i + 1;
                    continue 'scan;
                }
                _ => break,
            }
            i += 1;
        }

        // General path: argument index, width, precision.
        let mut arg = try_arg_num(cur_arg, bytes, i);
        cur_arg = arg.index;
        i = arg.next;
        let mut has_arg_num = arg.found;
        let mut proper = arg.proper;
        if has_arg_num && cur_arg >= need_args {
            need_args = cur_arg + 1;
        }

        let width = if bytes.get(i) == Some(&b'*') {
            i += 1;
            flags |= Flags::INDIRECT_WIDTH;
            let index = cur_arg;
            cur_arg += 1;
            need_args = need_args.max(cur_arg);
            has_arg_num = false;
            Some(index)
        } else {
            let (value, next) = pick_num(bytes, i);
            i = next;
            if has_arg_num && value.is_some() {
                proper = false;
            }
            value
        };

        let mut precision = None;
        if bytes.get(i) == Some(&b'.') {
            i += 1;
            if has_arg_num {
                proper = false;
            }
            arg = try_arg_num(cur_arg, bytes, i);
            cur_arg = arg.index;
            i = arg.next;
            has_arg_num = arg.found;
            proper &= arg.proper;
            if has_arg_num && cur_arg >= need_args {
                need_args = cur_arg + 1;
            }
            if bytes.get(i) == Some(&b'*') {
                i += 1;
                precision = Some(cur_arg);
                flags |= Flags::INDIRECT_PRECISION;
                cur_arg += 1;
                need_args = need_args.max(cur_arg);
                has_arg_num = false;
            } else {
                let (value, next) = pick_num(bytes, i);
                precision = Some(value.unwrap_or(0));
                i = next;
            }
        }

        if !has_arg_num {
            arg = try_arg_num(cur_arg, bytes, i);
            cur_arg = arg.index;
            i = arg.next;
            has_arg_num = arg.found;
            proper &= arg.proper;
        }

        let Some(verb_char) = format.get(i..).and_then(|rest| rest.chars().next()) else {
            out.literal(NO_VERB);
            break;
        };
        if has_arg_num && cur_arg >= need_args {
            need_args = cur_arg + 1;
        }

        let end = i + verb_char.len_utf8();
        if verb_char == '%' {
            out.literal("%");
        } else if !proper {
            out.bad_index(verb_char);
        } else {
            let (verb, upper) = Verb::from_char(verb_char);
            if upper {
                flags |= Flags::UPPER;
            }
            out.verb(verb, &format[i..end], flags, width, precision, cur_arg);
            cur_arg += 1;
            need_args = need_args.max(cur_arg);
        }
        pos = end;
    }

    out.finish(need_args)
}

// ---------------------------------------------------------------------------
// Numbers and argument indexes
// ---------------------------------------------------------------------------

/// Outcome of looking for an `[n]` argument index at some position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArgNum {
    /// Zero-based argument index; unchanged from the input when improper.
    index: usize,
    /// Position after whatever was consumed.
    next: usize,
    /// A `[` was present.
    found: bool,
    /// The bracket held a usable index.
    proper: bool,
}

fn try_arg_num(cur_arg: usize, bytes: &[u8], i: usize) -> ArgNum {
    if bytes.get(i) != Some(&b'[') {
        return ArgNum { index: cur_arg, next: i, found: false, proper: true };
    }
    let (index, consumed) = parse_arg_num(&bytes[i..]);
    match index {
        Some(index) if index <= MAX_NUM => ArgNum { index, next: i + consumed, found: true, proper: true },
        _ => ArgNum { index: cur_arg, next: i + consumed, found: true, proper: false },
    }
}

/// Parse `[n]` at the start of `s` (which begins with `[`). Returns the
/// zero-based index, if valid, and the number of bytes consumed.
///
/// Too-short input or a missing `]` consumes only the `[`. A bad number
/// still consumes through the closing bracket.
fn parse_arg_num(s: &[u8]) -> (Option<usize>, usize) {
    if s.len() < 3 {
        return (None, 1);
    }
    let Some(close) = s[1..].iter().position(|&b| b == b']') else {
        return (None, 1);
    };
    let index = parse_decimal(&s[1..=close]).and_then(|n| n.checked_sub(1));
    (index, close + 2)
}

/// Unsigned decimal no larger than [`MAX_NUM`]. No sign, no separators.
fn parse_decimal(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() {
        return None;
    }
    let mut n = 0usize;
    for &d in digits {
        if !d.is_ascii_digit() {
            return None;
        }
        n = n * 10 + usize::from(d - b'0');
        if n > MAX_NUM {
            return None;
        }
    }
    Some(n)
}

/// Read a run of decimal digits starting at `start`.
///
/// No digits yields `(None, start)`. A value above [`MAX_NUM`] yields
/// `(None, len)`, which pushes the directive off the end of the format.
fn pick_num(bytes: &[u8], start: usize) -> (Option<usize>, usize) {
    let mut n = 0usize;
    let mut i = start;
    while let Some(&d) = bytes.get(i) {
        if !d.is_ascii_digit() {
            break;
        }
        n = n * 10 + usize::from(d - b'0');
        if n > MAX_NUM {
            return (None, bytes.len());
        }
        i += 1;
    }
    if i == start { (None, start) } else { (Some(n), i) }
}

// ---------------------------------------------------------------------------
// Token builder
// ---------------------------------------------------------------------------

struct Builder {
    text: String,
    tokens: Vec<Token>,
    min_size: usize,
}

impl Builder {
    fn new(format: &str) -> Self {
        let directives = format.bytes().filter(|&b| b == b'%').count();
        Self {
            text: String::with_capacity(format.len()),
            tokens: Vec::with_capacity(2 * directives + 1),
            min_size: 0,
        }
    }

    fn push_text(&mut self, s: &str) -> Span {
        let start = self.text.len();
        self.text.push_str(s);
        Span { start, end: self.text.len() }
    }

    /// Append literal text, merging with a preceding literal token.
    fn literal(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.min_size += s.len();
        let span = self.push_text(s);
        if let Some(last) = self.tokens.last_mut() {
            if last.verb.is_literal() && last.value.end == span.start {
                last.value.end = span.end;
                return;
            }
        }
        self.tokens.push(Token {
            verb: Verb::None,
            value: span,
            flags: Flags::empty(),
            width: None,
            precision: None,
            arg: 0,
        });
    }

    fn bad_index(&mut self, verb_char: char) {
        let mut marker = String::with_capacity(PERCENT_BANG.len() + 4 + BAD_INDEX.len());
        marker.push_str(PERCENT_BANG);
        marker.push(verb_char);
        marker.push_str(BAD_INDEX);
        self.literal(&marker);
    }

    fn verb(
        &mut self,
        verb: Verb,
        verb_text: &str,
        flags: Flags,
        width: Option<usize>,
        precision: Option<usize>,
        arg: usize,
    ) {
        let value = self.push_text(verb_text);
        self.tokens.push(Token { verb, value, flags, width, precision, arg });
    }

    fn finish(self, required_args: usize) -> CompiledFormat {
        CompiledFormat {
            text: self.text.into_boxed_str(),
            tokens: self.tokens.into_boxed_slice(),
            required_args,
            min_output_size: self.min_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(compiled: &CompiledFormat) -> Vec<&str> {
        compiled
            .tokens()
            .iter()
            .filter(|t| t.verb().is_literal())
            .map(|t| compiled.value(t))
            .collect()
    }

    #[test]
    fn test_empty_format() {
        let c = compile("");
        assert!(c.is_empty());
        assert_eq!(c.required_args(), 0);
        assert_eq!(c.min_output_size(), 0);
    }

    #[test]
    fn test_plain_literal() {
        let c = compile("hello, world");
        assert_eq!(c.as_literal(), Some("hello, world"));
        assert_eq!(c.min_output_size(), 12);
        assert_eq!(c.required_args(), 0);
    }

    #[test]
    fn test_percent_escape_merges_into_literal() {
        let c = compile("100%% sure");
        assert_eq!(c.as_literal(), Some("100% sure"));
        assert_eq!(c.min_output_size(), 9);
    }

    #[test]
    fn test_fast_path_verbs() {
        let c = compile("a%sb%-Xc");
        let verbs: Vec<Verb> = c.tokens().iter().map(Token::verb).collect();
        assert_eq!(verbs, [Verb::None, Verb::Str, Verb::None, Verb::Hex, Verb::None]);
        assert_eq!(c.required_args(), 2);
        let hex = c.tokens()[3];
        assert!(hex.flags().contains(Flags::MINUS | Flags::UPPER));
        assert_eq!(hex.arg(), 1);
        assert_eq!(c.value(&hex), "X");
        assert_eq!(literals(&c), ["a", "b", "c"]);
    }

    #[test]
    fn test_minus_clears_zero() {
        let c = compile("%0-s");
        assert_eq!(c.tokens()[0].flags(), Flags::MINUS);
        let c = compile("%-0s");
        assert_eq!(c.tokens()[0].flags(), Flags::MINUS);
        let c = compile("%0s");
        assert_eq!(c.tokens()[0].flags(), Flags::ZERO);
    }

    #[test]
    fn test_width_and_precision() {
        let c = compile("%-12.5q");
        let t = c.tokens()[0];
        assert_eq!(t.verb(), Verb::Quoted);
        assert_eq!(t.width(), Some(12));
        assert_eq!(t.precision(), Some(5));
        assert_eq!(t.flags(), Flags::MINUS);
    }

    #[test]
    fn test_bare_dot_means_zero_precision() {
        let c = compile("%.s");
        assert_eq!(c.tokens()[0].precision(), Some(0));
        assert_eq!(c.tokens()[0].width(), None);
    }

    #[test]
    fn test_indirect_width_and_precision() {
        let c = compile("%*.*s");
        let t = c.tokens()[0];
        assert!(t.flags().contains(Flags::INDIRECT_WIDTH | Flags::INDIRECT_PRECISION));
        assert_eq!(t.width(), Some(0));
        assert_eq!(t.precision(), Some(1));
        assert_eq!(t.arg(), 2);
        assert_eq!(c.required_args(), 3);
    }

    #[test]
    fn test_explicit_index_reorders() {
        let c = compile("%[2]s %[1]s %s");
        let args: Vec<usize> = c.tokens().iter().filter(|t| !t.verb().is_literal()).map(Token::arg).collect();
        assert_eq!(args, [1, 0, 1]);
        assert_eq!(c.required_args(), 2);
    }

    #[test]
    fn test_index_out_of_range_still_counts() {
        let c = compile("%[5]s");
        assert_eq!(c.tokens()[0].arg(), 4);
        assert_eq!(c.required_args(), 5);
    }

    #[test]
    fn test_bad_index_forms() {
        for format in ["%[0]s", "%[x]s", "%[-1]s", "%[1048577]s"] {
            let c = compile(format);
            assert_eq!(c.as_literal(), Some("%!s(BADINDEX)"), "{format}");
        }
    }

    #[test]
    fn test_unterminated_index() {
        let c = compile("%[s");
        assert_eq!(c.as_literal(), Some("%!s(BADINDEX)"));
        assert_eq!(c.required_args(), 1);
        let c = compile("%[]");
        assert_eq!(c.as_literal(), Some("%!](BADINDEX)"));
    }

    #[test]
    fn test_index_with_literal_width_is_improper() {
        let c = compile("%[1]2s");
        assert_eq!(c.as_literal(), Some("%!s(BADINDEX)"));
        let c = compile("%[1].2s");
        assert_eq!(c.as_literal(), Some("%!s(BADINDEX)"));
    }

    #[test]
    fn test_no_verb_at_end() {
        for format in ["%", "%-", "%[1]", "%5", "%.", "%*"] {
            let c = compile(format);
            assert_eq!(c.as_literal(), Some("%!(NOVERB)"), "{format}");
        }
    }

    #[test]
    fn test_oversized_width_is_no_verb() {
        let c = compile("%2147483648s tail");
        assert_eq!(c.as_literal(), Some("%!(NOVERB)"));
    }

    #[test]
    fn test_bad_verb_token() {
        let c = compile("%d");
        assert_eq!(c.tokens()[0].verb(), Verb::Bad);
        assert_eq!(c.value(&c.tokens()[0]), "d");
        let c = compile("%5é");
        assert_eq!(c.tokens()[0].verb(), Verb::Bad);
        assert_eq!(c.value(&c.tokens()[0]), "é");
    }

    #[test]
    fn test_percent_via_general_path_consumes_width_arg() {
        let c = compile("%*% %s");
        assert_eq!(literals(&c), ["% "]);
        let verb = c.tokens()[1];
        assert_eq!(verb.arg(), 1);
        assert_eq!(c.required_args(), 2);
    }

    #[test]
    fn test_min_output_size_counts_diagnostics() {
        let c = compile("ab%[0]scd");
        assert_eq!(c.as_literal(), Some("ab%!s(BADINDEX)cd"));
        assert_eq!(c.min_output_size(), "ab%!s(BADINDEX)cd".len());
    }

    #[test]
    fn test_parse_arg_num() {
        assert_eq!(parse_arg_num(b"[3]s"), (Some(2), 3));
        assert_eq!(parse_arg_num(b"[0]s"), (None, 3));
        assert_eq!(parse_arg_num(b"[x"), (None, 1));
        assert_eq!(parse_arg_num(b"[12s"), (None, 1));
        assert_eq!(parse_arg_num(b"[]s"), (None, 2));
    }

    #[test]
    fn test_pick_num() {
        assert_eq!(pick_num(b"12s", 0), (Some(12), 2));
        assert_eq!(pick_num(b"s", 0), (None, 0));
        assert_eq!(pick_num(b"1048575s", 0), (Some(MAX_NUM), 7));
        assert_eq!(pick_num(b"1048576s", 0), (None, 8));
    }
}
