//! The recursive-descent document parser.
//!
//! One [`Parser`] instance owns one input cursor and one output buffer and
//! runs the whole parse in a single pass: container records are reserved as
//! placeholders before their children are encoded, then patched once the
//! children's total extent is known. Recursion depth equals the JSON
//! nesting depth; pathologically deep input exhausts the call stack, which
//! the format accepts as a hard failure mode.
//!
//! # Examples
//!
//! ```rust
//! let doc = jsonpack::parse(br#"{"id": 7, "tags": ["a", "b"]}"#).unwrap();
//! assert_eq!(doc.as_bytes().len() % 4, 0);
//! ```
#![allow(clippy::cast_possible_truncation)]

use alloc::vec::Vec;

use log::trace;

use crate::{
    buffer::BinaryBuffer,
    document::BinaryDocument,
    error::{ErrorKind, ParseError},
    layout::{
        self, CONTAINER_LEN, FORMAT_TAG, FORMAT_VERSION, HEADER_LEN, INLINE_INT_MAX,
        INLINE_INT_MIN, VALUE_LEN, Value, ValueType,
    },
    numbers::{self, NumberLexeme},
    object_table::EntryTable,
    options::ParserOptions,
    strings::{self, StringEncoding},
};

/// Parses a complete JSON text into a binary document.
///
/// The whole input must be resident; there is no incremental feeding. The
/// document root must be an object or an array. Bytes after the root
/// container are not inspected.
///
/// # Errors
///
/// Returns a [`ParseError`] naming the first grammar violation and its byte
/// offset in `input`; no partial document is ever produced.
pub fn parse(input: &[u8]) -> Result<BinaryDocument, ParseError> {
    Parser::new(input).parse()
}

/// Like [`parse`], with explicit [`ParserOptions`].
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_options(
    input: &[u8],
    options: ParserOptions,
) -> Result<BinaryDocument, ParseError> {
    Parser::with_options(input, options).parse()
}

/// The six structural characters, plus the quote that opens a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    BeginArray,
    BeginObject,
    EndArray,
    EndObject,
    NameSeparator,
    ValueSeparator,
    Quote,
}

/// A single-use JSON-to-binary encoder.
///
/// Each instance owns one scan cursor and one output buffer and is consumed
/// by [`Parser::parse`]; it is not reentrant mid-parse, and concurrent
/// parses need independent instances. There is no shared state between
/// instances.
///
/// # Examples
///
/// ```rust
/// use jsonpack::Parser;
///
/// let doc = Parser::new(b"[1, 2, 3]").parse().unwrap();
/// assert!(doc.len() > 8);
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    /// Input offset of the token most recently consumed by `next_token`,
    /// which is where structural errors point.
    token_pos: usize,
    buf: BinaryBuffer,
    options: ParserOptions,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `input` with default options.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, ParserOptions::default())
    }

    /// Creates a parser over `input` with the given options.
    #[must_use]
    pub fn with_options(input: &'a [u8], options: ParserOptions) -> Self {
        Self {
            input,
            pos: 0,
            token_pos: 0,
            buf: BinaryBuffer::with_estimated_capacity(input.len()),
            options,
        }
    }

    /// Runs the parse to completion, consuming the parser.
    ///
    /// # Errors
    ///
    /// Returns the first grammar violation with its input offset. The
    /// partially written buffer is discarded on every error path.
    pub fn parse(mut self) -> Result<BinaryDocument, ParseError> {
        trace!("parsing {} input bytes", self.input.len());

        let header = self.buf.reserve(HEADER_LEN as usize);
        self.buf.write_u32_at(header, FORMAT_TAG);
        self.buf.write_u32_at(header + 4, FORMAT_VERSION);

        match self.next_token() {
            Some(Token::BeginArray) => self.parse_array()?,
            Some(Token::BeginObject) => self.parse_object()?,
            Some(Token::Quote) => {
                // Still scan the scalar: string faults (truncation, bad
                // escapes) outrank the root-shape error.
                strings::encode_string(self.input, &mut self.pos, &mut self.buf, self.options)?;
                return Err(ParseError::new(ErrorKind::MissingObject, self.token_pos));
            }
            _ => return Err(ParseError::new(ErrorKind::MissingObject, self.token_pos)),
        }

        trace!("document complete, {} bytes written", self.buf.len());
        Ok(BinaryDocument::from_buffer(self.buf.into_vec()))
    }

    /// Skips insignificant whitespace. Returns whether input remains.
    fn eat_space(&mut self) -> bool {
        while let Some(&byte) = self.input.get(self.pos) {
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
        self.pos < self.input.len()
    }

    /// Consumes one byte and classifies it.
    ///
    /// Structural characters other than the quote also eat trailing
    /// whitespace, per the grammar's `ws` rule. Any other byte yields
    /// `None`; value dispatch re-inspects the raw input instead.
    fn next_token(&mut self) -> Option<Token> {
        if !self.eat_space() {
            self.token_pos = self.pos;
            return None;
        }
        self.token_pos = self.pos;
        let byte = self.input[self.pos];
        self.pos += 1;
        let token = match byte {
            b'[' => Token::BeginArray,
            b'{' => Token::BeginObject,
            b']' => Token::EndArray,
            b'}' => Token::EndObject,
            b':' => Token::NameSeparator,
            b',' => Token::ValueSeparator,
            b'"' => return Some(Token::Quote),
            _ => return None,
        };
        self.eat_space();
        Some(token)
    }

    /// `object = begin-object [ member *( value-separator member ) ]
    /// end-object`, with `{` already consumed.
    fn parse_object(&mut self) -> Result<(), ParseError> {
        let object_offset = self.buf.reserve(CONTAINER_LEN as usize);
        trace!("object record at output offset {object_offset}");
        let mut table = EntryTable::new(object_offset);

        let mut token = self.next_token();
        while token == Some(Token::Quote) {
            let entry_offset = self.buf.len() - object_offset;
            self.parse_member(object_offset)?;
            table.insert(self.buf.as_slice(), entry_offset);
            token = self.next_token();
            if token != Some(Token::ValueSeparator) {
                break;
            }
            token = self.next_token();
            if token == Some(Token::EndObject) {
                return Err(ParseError::new(ErrorKind::MissingObject, self.token_pos));
            }
        }

        if token != Some(Token::EndObject) {
            return Err(ParseError::new(
                ErrorKind::UnterminatedObject,
                self.token_pos,
            ));
        }

        let mut table_offset = 0;
        if !table.is_empty() {
            let start = self.buf.reserve(4 * table.offsets().len());
            for (index, &entry) in table.offsets().iter().enumerate() {
                self.buf.write_u32_at(start + 4 * index as u32, entry);
            }
            table_offset = start - object_offset;
        }
        layout::write_container(&mut self.buf, object_offset, true, table.len(), table_offset);
        trace!("object finalized, {} members", table.len());
        Ok(())
    }

    /// `member = string name-separator value`, with the key's opening quote
    /// already consumed.
    fn parse_member(&mut self, base_offset: u32) -> Result<(), ParseError> {
        let entry_offset = self.buf.reserve(VALUE_LEN as usize);
        let key_encoding =
            strings::encode_string(self.input, &mut self.pos, &mut self.buf, self.options)?;
        if self.next_token() != Some(Token::NameSeparator) {
            return Err(ParseError::new(
                ErrorKind::MissingNameSeparator,
                self.token_pos,
            ));
        }

        let mut value = Value::new();
        self.parse_value(&mut value, base_offset)?;
        value.set_latin_key(key_encoding == StringEncoding::Latin1);
        self.buf.write_u32_at(entry_offset, value.bits());
        Ok(())
    }

    /// `array = begin-array [ value *( value-separator value ) ]
    /// end-array`, with `[` already consumed.
    fn parse_array(&mut self) -> Result<(), ParseError> {
        let array_offset = self.buf.reserve(CONTAINER_LEN as usize);
        trace!("array record at output offset {array_offset}");
        let mut values: Vec<Value> = Vec::new();

        if !self.eat_space() {
            return Err(ParseError::new(
                ErrorKind::UnterminatedArray,
                self.input.len(),
            ));
        }
        if self.input[self.pos] == b']' {
            let _ = self.next_token();
        } else {
            loop {
                let mut value = Value::new();
                self.parse_value(&mut value, array_offset)?;
                values.push(value);
                match self.next_token() {
                    Some(Token::EndArray) => break,
                    Some(Token::ValueSeparator) => {}
                    _ => {
                        if self.eat_space() {
                            return Err(ParseError::new(
                                ErrorKind::MissingValueSeparator,
                                self.token_pos,
                            ));
                        }
                        return Err(ParseError::new(
                            ErrorKind::UnterminatedArray,
                            self.input.len(),
                        ));
                    }
                }
            }
        }

        let mut table_offset = 0;
        if !values.is_empty() {
            let start = self.buf.reserve(4 * values.len());
            for (index, value) in values.iter().enumerate() {
                self.buf.write_u32_at(start + 4 * index as u32, value.bits());
            }
            table_offset = start - array_offset;
        }
        layout::write_container(
            &mut self.buf,
            array_offset,
            false,
            values.len() as u32,
            table_offset,
        );
        trace!("array finalized, {} values", values.len());
        Ok(())
    }

    /// `value = false / null / true / object / array / number / string`,
    /// dispatched on the raw next byte.
    fn parse_value(&mut self, value: &mut Value, base_offset: u32) -> Result<(), ParseError> {
        let start = self.pos;
        let Some(&byte) = self.input.get(self.pos) else {
            return Err(ParseError::new(ErrorKind::MissingObject, self.input.len()));
        };

        match byte {
            b'n' => {
                self.expect_literal(b"ull", 4)?;
                value.set_type(ValueType::Null);
            }
            b't' => {
                self.expect_literal(b"rue", 4)?;
                value.set_type(ValueType::Bool);
                value.set_bool(true);
            }
            b'f' => {
                self.expect_literal(b"alse", 5)?;
                value.set_type(ValueType::Bool);
                value.set_bool(false);
            }
            b'"' => {
                self.pos += 1;
                value.set_type(ValueType::String);
                value.set_offset(self.buf.len() - base_offset);
                let encoding =
                    strings::encode_string(self.input, &mut self.pos, &mut self.buf, self.options)?;
                value.set_latin_or_int(encoding == StringEncoding::Latin1);
            }
            b'[' => {
                self.pos += 1;
                value.set_type(ValueType::Array);
                value.set_offset(self.buf.len() - base_offset);
                self.parse_array()?;
            }
            b'{' => {
                self.pos += 1;
                value.set_type(ValueType::Object);
                value.set_offset(self.buf.len() - base_offset);
                self.parse_object()?;
            }
            b']' => {
                self.pos += 1;
                return Err(ParseError::new(ErrorKind::MissingObject, start));
            }
            _ => self.parse_number(value, base_offset)?,
        }
        Ok(())
    }

    /// Matches the tail of a `null`/`true`/`false` literal, with the cursor
    /// on the first letter. `need` is the remaining-input requirement: the
    /// tail plus the byte that must follow any literal in a complete
    /// document.
    fn expect_literal(&mut self, tail: &[u8], need: usize) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        if self.input.len() - self.pos < need || !self.input[self.pos..].starts_with(tail) {
            return Err(ParseError::new(ErrorKind::IllegalValue, start));
        }
        self.pos += tail.len();
        Ok(())
    }

    /// Scans, classifies and encodes one number. Small integers inline
    /// into the value word; everything else becomes an out-of-line double.
    fn parse_number(&mut self, value: &mut Value, base_offset: u32) -> Result<(), ParseError> {
        let start = self.pos;
        value.set_type(ValueType::Double);

        let (end, lexeme) = numbers::scan_number(self.input, start);
        if end >= self.input.len() {
            return Err(ParseError::new(ErrorKind::EndOfNumber, self.input.len()));
        }
        self.pos = end;

        // The scanned span is ASCII by construction.
        let text = core::str::from_utf8(&self.input[start..end]).unwrap_or("");

        if lexeme == NumberLexeme::Integer {
            if let Ok(n) = text.parse::<i64>() {
                if (INLINE_INT_MIN..=INLINE_INT_MAX).contains(&n) {
                    value.set_inline_int(n as i32);
                    trace!("inline integer {n}");
                    return Ok(());
                }
            }
        }

        let Ok(double) = text.parse::<f64>() else {
            return Err(ParseError::new(ErrorKind::IllegalNumber, start));
        };
        if !double.is_finite() {
            return Err(ParseError::new(ErrorKind::IllegalNumber, start));
        }

        let offset = self.buf.reserve(8);
        self.buf.write_f64_at(offset, double);
        value.set_offset(offset - base_offset);
        value.set_latin_or_int(false);
        trace!("double {double} at output offset {offset}");
        Ok(())
    }
}
