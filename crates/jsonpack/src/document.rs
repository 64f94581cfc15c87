//! The finished binary document.

use alloc::vec::Vec;

use crate::layout::{self, CONTAINER_LEN, FORMAT_TAG, FORMAT_VERSION, HEADER_LEN};

/// An immutable, relocatable binary JSON document.
///
/// The buffer starts with the format header and holds exactly one root
/// container with all of its nested data; see [`crate::layout`] for the
/// byte-level contract. Because every internal reference is a relative
/// offset, the bytes can be copied, persisted, or memory-mapped and
/// traversed elsewhere without any fix-up pass.
///
/// # Examples
///
/// ```rust
/// let doc = jsonpack::parse(br#"{"greeting":"hello"}"#).unwrap();
/// let bytes = doc.into_bytes();
/// let reloaded = jsonpack::BinaryDocument::from_bytes(bytes).unwrap();
/// assert!(!reloaded.is_empty());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryDocument {
    data: Vec<u8>,
}

impl BinaryDocument {
    /// Wraps a finished buffer handed off by the parser.
    pub(crate) fn from_buffer(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Re-admits a previously produced buffer, e.g. read back from disk.
    ///
    /// Checks the header tag, the format version, and that the buffer is
    /// at least large enough for a header and a root container. The
    /// content beyond the header is trusted to be encoder output and is
    /// not re-validated.
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        if data.len() < (HEADER_LEN + CONTAINER_LEN) as usize {
            return None;
        }
        if layout::read_u32(&data, 0) != FORMAT_TAG {
            return None;
        }
        if layout::read_u32(&data, 4) != FORMAT_VERSION {
            return None;
        }
        Some(Self { data })
    }

    /// The document's bytes, trimmed to what the encoder wrote.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the document, yielding the underlying buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Total size in bytes, header included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` only for a default-constructed empty buffer; parsing never
    /// produces one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl core::fmt::Debug for BinaryDocument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BinaryDocument")
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::BinaryDocument;

    #[test]
    fn from_bytes_round_trips_parser_output() {
        let doc = crate::parse(b"{}").unwrap();
        let bytes = doc.as_bytes().to_vec();
        let reloaded = BinaryDocument::from_bytes(bytes).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn from_bytes_rejects_foreign_data() {
        assert!(BinaryDocument::from_bytes(Vec::new()).is_none());
        assert!(BinaryDocument::from_bytes(alloc::vec![0; 20]).is_none());

        let mut bytes = crate::parse(b"{}").unwrap().into_bytes();
        bytes[4] = 9; // future version
        assert!(BinaryDocument::from_bytes(bytes).is_none());
    }
}
