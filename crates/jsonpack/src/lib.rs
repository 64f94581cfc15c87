//! Single-pass JSON parsing into compact, relocatable binary documents.
//!
//! `jsonpack` converts JSON text directly into a self-describing binary
//! buffer, with no intermediate tree of heap-allocated nodes. Every internal
//! reference in the buffer is a byte offset relative to a defined base, so
//! the finished document can be copied, persisted, or memory-mapped and
//! traversed as-is on any machine regardless of byte order. The byte-level
//! contract lives in [`layout`].
//!
//! Input is validated strictly: UTF-8 sequences, escape sequences, Unicode
//! range and non-character checks, and full-precision numeric conversion.
//! The first violation aborts the parse with a [`ParseError`] carrying the
//! offending input offset.
//!
//! # Examples
//!
//! ```rust
//! use jsonpack::{ErrorKind, parse};
//!
//! let doc = parse(br#"{"name": "jsonpack", "version": 1}"#).unwrap();
//! assert!(doc.len() % 4 == 0);
//!
//! let err = parse(br#"{"name": []"#).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::UnterminatedObject);
//! assert_eq!(err.offset, 11);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod document;
mod error;
mod escape;
pub mod layout;
mod numbers;
mod object_table;
mod options;
mod parser;
mod strings;

#[cfg(test)]
mod tests;

pub use document::BinaryDocument;
pub use error::{ErrorKind, ParseError};
pub use options::ParserOptions;
pub use parser::{Parser, parse, parse_with_options};
