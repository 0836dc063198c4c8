//! Quoted byte-literal rendering, in the style of Python's `repr(bytes)`.
//!
//! The reference implementation prints raw HTTP/2 payloads and decoded HPACK
//! header fields with Python's `bytes.__repr__`, which chooses a quote
//! character, escapes control bytes and backslashes, and falls back to
//! `\xHH` for anything non-printable. Reproducing that exact rendering (not
//! just `Debug`-formatting a `Vec<u8>`) keeps this tool's output readable the
//! same way across non-ASCII header values and binary payload bytes.

/// Render `bytes` as a `b'...'`/`b"..."` quoted literal, mirroring Python's
/// `repr()` for the `bytes` type.
pub fn quoted_bytes(bytes: &[u8]) -> String {
    let use_double_quote = bytes.contains(&b'\'') && !bytes.contains(&b'"');
    let quote = if use_double_quote { b'"' } else { b'\'' };

    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(quote as char);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c as char);
            }
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push(quote as char);
    out
}
