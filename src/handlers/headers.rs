//! HEADERS payload handler: HPACK-decodes the header block, updating the
//! connection-direction's dynamic table. Grounded on
//! `_describe.py::handle_headers_payload`.

use super::{HandlerCtx, PayloadHandler};
use crate::error::DescribeError;
use crate::hexdump::{hexdump, indent, HexdumpMode};
use crate::literal::quoted_bytes;
use crate::registry::flag_bits;

pub struct HeadersHandler;

impl PayloadHandler for HeadersHandler {
    fn handle(&self, payload: &[u8], flags: u8, ctx: &mut HandlerCtx) -> Result<String, DescribeError> {
        if flags & flag_bits::PADDED != 0 {
            return Err(DescribeError::NotImplemented {
                feature: "PADDED flag on HEADERS frames",
            });
        }
        if flags & flag_bits::PRIORITY != 0 {
            return Err(DescribeError::NotImplemented {
                feature: "PRIORITY flag on HEADERS frames",
            });
        }

        let headers = ctx.hpack.decode(payload)?;

        let mut lines = vec!["Headers =".to_string()];
        lines.extend(
            headers
                .iter()
                .map(|h| format!("   {} -> {}", quoted_bytes(&h.name), quoted_bytes(&h.value))),
        );
        lines.push("Hexdump (Compressed Headers) =".to_string());
        lines.push(indent(&hexdump(payload, HexdumpMode::default()), "   "));
        Ok(lines.join("\n"))
    }
}
