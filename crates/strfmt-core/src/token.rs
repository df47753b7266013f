//! Compiled representation of a format string.
//!
//! A format string compiles once into a flat list of [`Token`]s plus the
//! metadata the renderer needs: how many arguments the directives consume
//! and how many literal bytes the output will contain at minimum.
//!
//! All text a token refers to (literal runs, synthesized diagnostics, the
//! verb character) lives in one owned string inside [`CompiledFormat`], so a
//! compiled format borrows nothing from its source and can be cached and
//! shared across threads.

use bitflags::bitflags;

/// Largest width, precision or argument index accepted by the parser
/// (2^20 - 1). Larger numbers make the directive render as `%!(NOVERB)`.
pub const MAX_NUM: usize = (1 << 20) - 1;

// ---------------------------------------------------------------------------
// Diagnostic text
// ---------------------------------------------------------------------------

pub(crate) const PERCENT_BANG: &str = "%!";
pub(crate) const MISSING: &str = "(MISSING)";
pub(crate) const BAD_INDEX: &str = "(BADINDEX)";
pub(crate) const EXTRA: &str = "%!(EXTRA ";
pub(crate) const EXTRA_SEPARATOR: &str = ", ";
pub(crate) const BAD_WIDTH: &str = "%!(BADWIDTH)";
pub(crate) const BAD_PREC: &str = "%!(BADPREC)";
pub(crate) const NO_VERB: &str = "%!(NOVERB)";
/// Type label printed before an argument in bad-verb and EXTRA diagnostics.
pub(crate) const ARG_TYPE: &str = "string=";

// ---------------------------------------------------------------------------
// Verbs and flags
// ---------------------------------------------------------------------------

/// What a token does at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Literal text, written verbatim.
    None,
    /// `%s`
    Str,
    /// `%q`
    Quoted,
    /// `%x` / `%X`
    Hex,
    /// Any other letter or character in verb position.
    Bad,
}

impl Verb {
    /// Classify a verb character. The second value reports whether the
    /// character was uppercase, which selects uppercase hex digits.
    pub fn from_char(c: char) -> (Self, bool) {
        let upper = c.is_uppercase();
        let verb = match c.to_ascii_lowercase() {
            's' => Self::Str,
            'q' => Self::Quoted,
            'x' => Self::Hex,
            _ => Self::Bad,
        };
        (verb, upper)
    }

    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::None)
    }
}

bitflags! {
    /// Flags collected from a directive, plus parser-derived markers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u16 {
        /// `+`: ASCII-only quoting for `%q`.
        const PLUS = 1 << 0;
        /// `-`: pad on the right.
        const MINUS = 1 << 1;
        /// `#`: backquoted `%q`, `0x` prefix for `%x`.
        const SHARP = 1 << 2;
        /// ` `: space-separated hex bytes.
        const SPACE = 1 << 3;
        /// `0`: pad with zeros. Never set together with `MINUS`.
        const ZERO = 1 << 4;
        /// Verb letter was uppercase.
        const UPPER = 1 << 5;
        /// Width came from `*`; the token's width holds the argument index.
        const INDIRECT_WIDTH = 1 << 6;
        /// Precision came from `.*`; the token's precision holds the argument index.
        const INDIRECT_PRECISION = 1 << 7;
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Byte range into a [`CompiledFormat`]'s text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// One unit of a compiled format: a literal run or a verb directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub(crate) verb: Verb,
    pub(crate) value: Span,
    pub(crate) flags: Flags,
    pub(crate) width: Option<usize>,
    pub(crate) precision: Option<usize>,
    pub(crate) arg: usize,
}

impl Token {
    #[must_use]
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    #[must_use]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Fixed width, or the argument index supplying it when
    /// [`Flags::INDIRECT_WIDTH`] is set.
    #[must_use]
    pub const fn width(&self) -> Option<usize> {
        self.width
    }

    /// Fixed precision, or the argument index supplying it when
    /// [`Flags::INDIRECT_PRECISION`] is set.
    #[must_use]
    pub const fn precision(&self) -> Option<usize> {
        self.precision
    }

    /// Index of the argument this verb consumes. Meaningless for literals.
    #[must_use]
    pub const fn arg(&self) -> usize {
        self.arg
    }
}

// ---------------------------------------------------------------------------
// Compiled format
// ---------------------------------------------------------------------------

/// Immutable result of compiling a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFormat {
    pub(crate) text: Box<str>,
    pub(crate) tokens: Box<[Token]>,
    pub(crate) required_args: usize,
    pub(crate) min_output_size: usize,
}

impl CompiledFormat {
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Text of a token: the literal run, or the verb character.
    #[must_use]
    pub fn value(&self, token: &Token) -> &str {
        self.text.get(token.value.start..token.value.end).unwrap_or("")
    }

    /// Number of arguments the directives reference. Arguments past this
    /// count are reported with `%!(EXTRA ...)`.
    #[must_use]
    pub const fn required_args(&self) -> usize {
        self.required_args
    }

    /// Total bytes of literal text; a lower bound on rendered length.
    #[must_use]
    pub const fn min_output_size(&self) -> usize {
        self.min_output_size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The whole output, when the format is a single literal run.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match &*self.tokens {
            [token] if token.verb.is_literal() => Some(self.value(token)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_from_char() {
        assert_eq!(Verb::from_char('s'), (Verb::Str, false));
        assert_eq!(Verb::from_char('Q'), (Verb::Quoted, true));
        assert_eq!(Verb::from_char('X'), (Verb::Hex, true));
        assert_eq!(Verb::from_char('d'), (Verb::Bad, false));
        assert_eq!(Verb::from_char(']'), (Verb::Bad, false));
        assert_eq!(Verb::from_char('Ä'), (Verb::Bad, true));
    }

    #[test]
    fn test_max_num() {
        assert_eq!(MAX_NUM, 1_048_575);
    }

    #[test]
    fn test_literal_accessors() {
        let compiled = CompiledFormat {
            text: "hello".into(),
            tokens: vec![Token {
                verb: Verb::None,
                value: Span { start: 0, end: 5 },
                flags: Flags::empty(),
                width: None,
                precision: None,
                arg: 0,
            }]
            .into_boxed_slice(),
            required_args: 0,
            min_output_size: 5,
        };
        assert_eq!(compiled.as_literal(), Some("hello"));
        assert!(!compiled.is_empty());
        assert_eq!(compiled.value(&compiled.tokens()[0]), "hello");
    }
}
