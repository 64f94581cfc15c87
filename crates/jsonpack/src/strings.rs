//! Two-pass optimistic string encoding.
//!
//! The first pass assumes every codepoint fits in one byte and writes the
//! compact form directly into the buffer. The first wider codepoint aborts
//! it; the encoder then rewinds both the output and the source cursor and
//! re-decodes the same span as UTF-16 code units. Reparsing the span is
//! deliberately simpler than retroactively widening bytes already written.
//!
//! Either pass reserves the string's length header up front and patches it
//! once the closing quote is found, then zero-pads the output to a 4-byte
//! boundary so subsequent records stay aligned.
#![allow(clippy::cast_possible_truncation)]

use crate::{
    buffer::BinaryBuffer,
    error::{ErrorKind, ParseError},
    escape,
    options::ParserOptions,
};

/// Which storage form a string ended up in. The caller records this in the
/// owning value/entry so a reader knows how to reinterpret the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringEncoding {
    /// One byte per character; every codepoint was ≤ U+00FF.
    Latin1,
    /// Two bytes per UTF-16 code unit, astral codepoints as surrogate
    /// pairs.
    Utf16,
}

enum CompactPass {
    Done,
    Widen,
}

/// Encodes the quoted string starting at `*pos` (just past the opening
/// quote), leaving the cursor just past the closing quote.
pub(crate) fn encode_string(
    input: &[u8],
    pos: &mut usize,
    buf: &mut BinaryBuffer,
    options: ParserOptions,
) -> Result<StringEncoding, ParseError> {
    let start = *pos;
    let header = buf.reserve(2);

    match compact_pass(input, pos, buf, options)? {
        CompactPass::Done => {
            let length = buf.len() - header - 2;
            buf.write_u16_at(header, length as u16);
            buf.align4();
            Ok(StringEncoding::Latin1)
        }
        CompactPass::Widen => {
            log::trace!("string at {start} leaves the compact range, re-encoding wide");
            buf.truncate(header);
            buf.reserve(4);
            *pos = start;
            wide_pass(input, pos, buf, options)?;
            let units = (buf.len() - header - 4) / 2;
            buf.write_u32_at(header, units);
            buf.align4();
            Ok(StringEncoding::Utf16)
        }
    }
}

/// Decodes one source unit: an escape sequence or a raw UTF-8 codepoint.
fn next_codepoint(
    input: &[u8],
    pos: &mut usize,
    options: ParserOptions,
) -> Result<u32, ParseError> {
    let at = *pos;
    if input[at] == b'\\' {
        escape::scan_escape_sequence(input, pos, options.strict_escapes)
            .ok_or_else(|| ParseError::new(ErrorKind::StringEscapeSequence, at))
    } else {
        escape::scan_utf8_char(input, pos)
            .ok_or_else(|| ParseError::new(ErrorKind::StringUtf8Scan, at))
    }
}

fn compact_pass(
    input: &[u8],
    pos: &mut usize,
    buf: &mut BinaryBuffer,
    options: ParserOptions,
) -> Result<CompactPass, ParseError> {
    while *pos < input.len() {
        if input[*pos] == b'"' {
            break;
        }
        let ch = next_codepoint(input, pos, options)?;
        if ch > 0xff {
            return Ok(CompactPass::Widen);
        }
        buf.push_byte(ch as u8);
    }

    *pos += 1;
    if *pos >= input.len() {
        return Err(ParseError::new(ErrorKind::EndOfString, input.len()));
    }
    Ok(CompactPass::Done)
}

fn wide_pass(
    input: &[u8],
    pos: &mut usize,
    buf: &mut BinaryBuffer,
    options: ParserOptions,
) -> Result<(), ParseError> {
    while *pos < input.len() {
        if input[*pos] == b'"' {
            break;
        }
        let ch = next_codepoint(input, pos, options)?;
        if ch > 0xffff {
            buf.push_u16(((ch >> 10) + 0xd7c0) as u16);
            buf.push_u16(((ch & 0x3ff) + 0xdc00) as u16);
        } else {
            buf.push_u16(ch as u16);
        }
    }

    *pos += 1;
    if *pos >= input.len() {
        return Err(ParseError::new(ErrorKind::EndOfString, input.len()));
    }
    Ok(())
}
