//! Parse failure reporting.

use thiserror::Error;

/// One kind per distinct grammar violation.
///
/// The parser stops at the first violation; there is no recovery or
/// resynchronization, so exactly one kind is ever produced per attempt.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An object was not closed with `}`.
    #[error("unterminated object")]
    UnterminatedObject,
    /// An object member's key was not followed by `:`.
    #[error("missing name separator")]
    MissingNameSeparator,
    /// An array was not closed with `]`.
    #[error("unterminated array")]
    UnterminatedArray,
    /// Two array values were not separated by `,`.
    #[error("missing value separator")]
    MissingValueSeparator,
    /// A misspelled or truncated `null`, `true` or `false` literal.
    #[error("illegal value")]
    IllegalValue,
    /// Numeric text that fails full-precision conversion.
    #[error("illegal number")]
    IllegalNumber,
    /// A number truncated by the end of the input.
    #[error("unexpected end of number")]
    EndOfNumber,
    /// A string whose closing quote was never found.
    #[error("unexpected end of string")]
    EndOfString,
    /// A malformed `\u` sequence or an escape cut short by the input end.
    #[error("invalid escape sequence")]
    StringEscapeSequence,
    /// Invalid UTF-8, or a codepoint outside the interchangeable range.
    #[error("invalid UTF-8 sequence")]
    StringUtf8Scan,
    /// A value was expected but a closing bracket, a malformed token, or a
    /// non-container document root was found instead.
    #[error("expected object or array")]
    MissingObject,
}

/// A parse failure: what went wrong and where.
///
/// `offset` is a byte offset into the *original input* (not the output
/// buffer), pointing at the offending byte; conditions caused by running
/// out of input report the input length.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    /// The grammar violation encountered.
    pub kind: ErrorKind,
    /// Byte offset of the offending byte in the input.
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{ErrorKind, ParseError};

    #[test]
    fn display_includes_kind_and_offset() {
        let err = ParseError::new(ErrorKind::UnterminatedArray, 17);
        assert_eq!(err.to_string(), "unterminated array at offset 17");
    }
}
