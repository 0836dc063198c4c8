//! HPACK: Header Compression for HTTP/2 (RFC 7541)
//!
//! Thin wrapper around `fluke-hpack`'s decoder. This tool only observes
//! traffic (per spec.md's non-goals, it never re-encodes frames), so unlike
//! the teacher's `hpack.rs` there is no paired `HpackEncoder` here — it was
//! dropped in the final trimming pass since nothing in this crate calls it.
//!
//! Header fields are kept as raw bytes rather than lossily converted to
//! `String`: HEADERS payloads can legally carry non-UTF-8 values, and
//! spec.md §4.3 asks for each field to be "rendered as a quoted byte literal
//! to survive non-ASCII" (see [`crate::literal::quoted_bytes`]), which needs
//! the original bytes, not a lossy decode.

use crate::error::DescribeError;

/// One decoded `(name, value)` header field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHeader {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

/// HPACK decoder for HTTP/2 header blocks.
///
/// Wraps `fluke_hpack::Decoder`, which owns a dynamic table that must
/// persist across frames. Per invariant I-Stream-HPACK, exactly one
/// `HpackDecoder` is created per (connection, direction) and is never shared
/// across threads — see `src/proxy/connect.rs`, which owns one instance per
/// worker thread.
pub struct HpackDecoder {
    inner: fluke_hpack::Decoder<'static>,
}

impl std::fmt::Debug for HpackDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HpackDecoder").finish()
    }
}

impl Default for HpackDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackDecoder {
    pub fn new() -> Self {
        Self {
            inner: fluke_hpack::Decoder::new(),
        }
    }

    /// Decode an HPACK-encoded header block, updating the dynamic table.
    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<DecodedHeader>, DescribeError> {
        let pairs = self
            .inner
            .decode(data)
            .map_err(|e| DescribeError::HpackDecode(format!("{:?}", e)))?;
        Ok(pairs
            .into_iter()
            .map(|(name, value)| DecodedHeader { name, value })
            .collect())
    }
}


