//! Verb formatters for `%s`, `%q` and `%x`/`%X`.
//!
//! Widths and precisions count Unicode scalar values for `%s` and `%q`, and
//! bytes for `%x`. Padding goes on the left unless `-` is set, and uses `0`
//! when the zero flag is set, spaces otherwise.

use crate::buffer::ArenaBuffer;
use crate::token::Flags;

const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";
const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

// ---------------------------------------------------------------------------
// Padding helpers
// ---------------------------------------------------------------------------

fn write_padding(buf: &mut ArenaBuffer, count: usize, flags: Flags) {
    let fill = if flags.contains(Flags::ZERO) { b'0' } else { b' ' };
    buf.fill(fill, count);
}

/// Emit `body`, which produces `content_chars` characters, padded to `width`.
fn pad_with(
    buf: &mut ArenaBuffer,
    content_chars: usize,
    flags: Flags,
    width: Option<usize>,
    body: impl FnOnce(&mut ArenaBuffer),
) {
    let fill = width.map_or(0, |w| w.saturating_sub(content_chars));
    let left = !flags.contains(Flags::MINUS);
    if left {
        write_padding(buf, fill, flags);
    }
    body(buf);
    if !left {
        write_padding(buf, fill, flags);
    }
}

/// First `precision` characters of `s`.
fn truncate(s: &str, precision: Option<usize>) -> &str {
    match precision.and_then(|p| s.char_indices().nth(p)) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// %s
// ---------------------------------------------------------------------------

pub fn fmt_str(buf: &mut ArenaBuffer, s: &str, flags: Flags, width: Option<usize>, precision: Option<usize>) {
    let s = truncate(s, precision);
    if width.is_none_or(|w| w == 0) {
        buf.write_str(s);
        return;
    }
    pad_with(buf, s.chars().count(), flags, width, |buf| buf.write_str(s));
}

// ---------------------------------------------------------------------------
// %q
// ---------------------------------------------------------------------------

pub fn fmt_quoted(buf: &mut ArenaBuffer, s: &str, flags: Flags, width: Option<usize>, precision: Option<usize>) {
    let s = truncate(s, precision);
    if flags.contains(Flags::SHARP) && can_backquote(s) {
        pad_with(buf, s.chars().count() + 2, flags, width, |buf| {
            buf.write_byte(b'`');
            buf.write_str(s);
            buf.write_byte(b'`');
        });
        return;
    }
    let ascii_only = flags.contains(Flags::PLUS);
    let quoted_chars = 2 + s.chars().map(|c| escape(c, ascii_only).char_len()).sum::<usize>();
    pad_with(buf, quoted_chars, flags, width, |buf| {
        buf.reserve(quoted_chars);
        buf.write_byte(b'"');
        for c in s.chars() {
            escape(c, ascii_only).write_to(buf);
        }
        buf.write_byte(b'"');
    });
}

/// Whether `s` can be written between backquotes without escapes.
#[must_use]
pub fn can_backquote(s: &str) -> bool {
    s.chars()
        .all(|c| c != '\u{feff}' && c != '`' && c != '\x7f' && (c >= ' ' || c == '\t'))
}

/// How one character appears inside a double-quoted literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escaped {
    Raw(char),
    /// Backslash and one letter: `\"`, `\n`, ...
    Short(u8),
    /// `\xHH`
    Byte(u8),
    /// `\uHHHH`
    Unicode(u32),
    /// `\UHHHHHHHH`
    LongUnicode(u32),
}

fn escape(c: char, ascii_only: bool) -> Escaped {
    if c == '"' || c == '\\' {
        return Escaped::Short(c as u8);
    }
    if is_printable(c) && (c.is_ascii() || !ascii_only) {
        return Escaped::Raw(c);
    }
    match c {
        '\x07' => Escaped::Short(b'a'),
        '\x08' => Escaped::Short(b'b'),
        '\x0c' => Escaped::Short(b'f'),
        '\n' => Escaped::Short(b'n'),
        '\r' => Escaped::Short(b'r'),
        '\t' => Escaped::Short(b't'),
        '\x0b' => Escaped::Short(b'v'),
        c if c < ' ' || c == '\x7f' => Escaped::Byte(c as u8),
        c if u32::from(c) < 0x1_0000 => Escaped::Unicode(u32::from(c)),
        c => Escaped::LongUnicode(u32::from(c)),
    }
}

impl Escaped {
    /// Output length in characters.
    fn char_len(self) -> usize {
        match self {
            Self::Raw(_) => 1,
            Self::Short(_) => 2,
            Self::Byte(_) => 4,
            Self::Unicode(_) => 6,
            Self::LongUnicode(_) => 10,
        }
    }

    fn write_to(self, buf: &mut ArenaBuffer) {
        match self {
            Self::Raw(c) => buf.write_char(c),
            Self::Short(letter) => {
                buf.write_byte(b'\\');
                buf.write_byte(letter);
            }
            Self::Byte(b) => write_escaped_hex(buf, b'x', u32::from(b), 2),
            Self::Unicode(u) => write_escaped_hex(buf, b'u', u, 4),
            Self::LongUnicode(u) => write_escaped_hex(buf, b'U', u, 8),
        }
    }
}

fn write_escaped_hex(buf: &mut ArenaBuffer, kind: u8, value: u32, digits: u32) {
    buf.write_byte(b'\\');
    buf.write_byte(kind);
    for shift in (0..digits).rev() {
        buf.write_byte(LOWER_HEX[((value >> (shift * 4)) & 0xf) as usize]);
    }
}

/// Graphic characters and the ASCII space.
///
/// Outside ASCII this follows the standard library's debug escaping, asked
/// about the character in non-initial position so that combining marks count
/// as printable.
fn is_printable(c: char) -> bool {
    if c.is_ascii() {
        return matches!(c, ' '..='~');
    }
    let mut tmp = [0u8; 8];
    tmp[0] = b'a';
    let len = 1 + c.encode_utf8(&mut tmp[1..]).len();
    let Ok(pair) = std::str::from_utf8(&tmp[..len]) else {
        return false;
    };
    let mut escaped = pair.escape_debug();
    escaped.next() == Some('a') && escaped.next() == Some(c) && escaped.next().is_none()
}

// ---------------------------------------------------------------------------
// %x / %X
// ---------------------------------------------------------------------------

pub fn fmt_hex(buf: &mut ArenaBuffer, s: &str, flags: Flags, width: Option<usize>, precision: Option<usize>) {
    let mut bytes = s.as_bytes();
    if let Some(p) = precision {
        bytes = &bytes[..p.min(bytes.len())];
    }
    if bytes.is_empty() {
        if let Some(w) = width {
            write_padding(buf, w, flags);
        }
        return;
    }

    let spaced = flags.contains(Flags::SPACE);
    let prefixed = flags.contains(Flags::SHARP);
    let n = bytes.len();
    let mut encoded = 2 * n;
    if spaced {
        if prefixed {
            encoded *= 2;
        }
        encoded += n - 1;
    } else if prefixed {
        encoded += 2;
    }

    let (digits, x) = if flags.contains(Flags::UPPER) { (UPPER_HEX, b'X') } else { (LOWER_HEX, b'x') };
    pad_with(buf, encoded, flags, width, |buf| {
        buf.reserve(encoded);
        if prefixed {
            buf.write_byte(b'0');
            buf.write_byte(x);
        }
        for (i, &b) in bytes.iter().enumerate() {
            if spaced && i > 0 {
                buf.write_byte(b' ');
                if prefixed {
                    buf.write_byte(b'0');
                    buf.write_byte(x);
                }
            }
            buf.write_byte(digits[usize::from(b >> 4)]);
            buf.write_byte(digits[usize::from(b & 0x0f)]);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    type Formatter = fn(&mut ArenaBuffer, &str, Flags, Option<usize>, Option<usize>);

    fn run(f: Formatter, s: &str, flags: Flags, width: Option<usize>, precision: Option<usize>) -> String {
        let mut buf = ArenaBuffer::new();
        f(&mut buf, s, flags, width, precision);
        buf.as_str().to_owned()
    }

    #[test]
    fn test_str_plain_and_truncated() {
        assert_eq!(run(fmt_str, "abc", Flags::empty(), None, None), "abc");
        assert_eq!(run(fmt_str, "abc", Flags::empty(), None, Some(2)), "ab");
        assert_eq!(run(fmt_str, "日本語", Flags::empty(), None, Some(2)), "日本");
        assert_eq!(run(fmt_str, "abc", Flags::empty(), None, Some(0)), "");
    }

    #[test]
    fn test_str_padding() {
        assert_eq!(run(fmt_str, "abc", Flags::empty(), Some(5), None), "  abc");
        assert_eq!(run(fmt_str, "abc", Flags::MINUS, Some(5), None), "abc  ");
        assert_eq!(run(fmt_str, "abc", Flags::ZERO, Some(5), None), "00abc");
        assert_eq!(run(fmt_str, "日本", Flags::empty(), Some(4), None), "  日本");
        assert_eq!(run(fmt_str, "abcdef", Flags::empty(), Some(3), None), "abcdef");
    }

    #[test]
    fn test_quoted_basic() {
        assert_eq!(run(fmt_quoted, "abc", Flags::empty(), None, None), "\"abc\"");
        assert_eq!(run(fmt_quoted, "a\"b\\c", Flags::empty(), None, None), r#""a\"b\\c""#);
        assert_eq!(run(fmt_quoted, "\n\t\x07\x7f\x01", Flags::empty(), None, None), r#""\n\t\a\x7f\x01""#);
    }

    #[test]
    fn test_quoted_unicode() {
        assert_eq!(run(fmt_quoted, "日本語", Flags::empty(), None, None), "\"日本語\"");
        assert_eq!(run(fmt_quoted, "日本語", Flags::PLUS, None, None), r#""\u65e5\u672c\u8a9e""#);
        assert_eq!(run(fmt_quoted, "\u{1F600}", Flags::PLUS, None, None), r#""\U0001f600""#);
        assert_eq!(run(fmt_quoted, "\u{2028}", Flags::empty(), None, None), r#""\u2028""#);
        assert_eq!(run(fmt_quoted, "\u{feff}", Flags::empty(), None, None), r#""\ufeff""#);
    }

    #[test]
    fn test_quoted_backquote() {
        assert_eq!(run(fmt_quoted, "abc", Flags::SHARP, None, None), "`abc`");
        assert_eq!(run(fmt_quoted, "a`c", Flags::SHARP, None, None), "\"a`c\"");
        assert_eq!(run(fmt_quoted, "a\tc", Flags::SHARP, None, None), "`a\tc`");
        assert_eq!(run(fmt_quoted, "a\nc", Flags::SHARP, None, None), r#""a\nc""#);
    }

    #[test]
    fn test_quoted_padding_counts_escaped_output() {
        assert_eq!(run(fmt_quoted, "a\n", Flags::empty(), Some(8), None), r#"   "a\n""#);
        assert_eq!(run(fmt_quoted, "日本語", Flags::MINUS, Some(7), None), "\"日本語\"  ");
        assert_eq!(run(fmt_quoted, "abc", Flags::ZERO, Some(6), None), "0\"abc\"");
    }

    #[test]
    fn test_can_backquote() {
        assert!(can_backquote(""));
        assert!(can_backquote("tab\tok"));
        assert!(can_backquote("\u{fffd}"));
        assert!(!can_backquote("\u{feff}"));
        assert!(!can_backquote("`"));
        assert!(!can_backquote("\x7f"));
        assert!(!can_backquote("\r"));
    }

    #[test]
    fn test_is_printable() {
        assert!(is_printable(' '));
        assert!(is_printable('é'));
        assert!(is_printable('\u{0301}'));
        assert!(!is_printable('\u{7f}'));
        assert!(!is_printable('\u{200b}'));
        assert!(!is_printable('\u{e000}'));
    }

    #[test]
    fn test_hex_basic() {
        assert_eq!(run(fmt_hex, "xyz", Flags::empty(), None, None), "78797a");
        assert_eq!(run(fmt_hex, "xyz", Flags::UPPER, None, None), "78797A");
        assert_eq!(run(fmt_hex, "xyz", Flags::SPACE, None, None), "78 79 7a");
        assert_eq!(run(fmt_hex, "xyz", Flags::SHARP, None, None), "0x78797a");
        assert_eq!(run(fmt_hex, "xyz", Flags::SHARP | Flags::SPACE | Flags::UPPER, None, None), "0X78 0X79 0X7A");
        assert_eq!(run(fmt_hex, "xyz", Flags::empty(), None, Some(2)), "7879");
    }

    #[test]
    fn test_hex_padding() {
        assert_eq!(run(fmt_hex, "xyz", Flags::empty(), Some(8), None), "  78797a");
        assert_eq!(run(fmt_hex, "xyz", Flags::MINUS, Some(8), None), "78797a  ");
        assert_eq!(run(fmt_hex, "xyz", Flags::ZERO | Flags::SHARP, Some(10), None), "000x78797a");
        assert_eq!(run(fmt_hex, "xyz", Flags::empty(), Some(2), None), "78797a");
    }

    #[test]
    fn test_hex_empty_pads_only() {
        assert_eq!(run(fmt_hex, "", Flags::empty(), None, None), "");
        assert_eq!(run(fmt_hex, "", Flags::empty(), Some(3), None), "   ");
        assert_eq!(run(fmt_hex, "", Flags::SHARP | Flags::ZERO, Some(2), None), "00");
        assert_eq!(run(fmt_hex, "xyz", Flags::SHARP, Some(4), Some(0)), "    ");
    }
}
