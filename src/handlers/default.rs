//! Default payload handler: an identity function that renders whatever bytes
//! it is given. Ships for every frame type not otherwise handled (PRIORITY,
//! RST_STREAM, GOAWAY, PUSH_PROMISE, CONTINUATION, and DATA unless the gRPC
//! extension is registered). Grounded on `_describe.py::default_payload_handler`.

use super::{HandlerCtx, PayloadHandler};
use crate::error::DescribeError;
use crate::hexdump::{hexdump, indent, HexdumpMode};
use crate::literal::quoted_bytes;

pub struct DefaultHandler;

impl PayloadHandler for DefaultHandler {
    fn handle(&self, payload: &[u8], _flags: u8, _ctx: &mut HandlerCtx) -> Result<String, DescribeError> {
        if payload.is_empty() {
            return Ok(String::new());
        }

        Ok([
            "Frame Payload =".to_string(),
            format!("   {}", quoted_bytes(payload)),
            "Hexdump (Frame Payload) =".to_string(),
            indent(&hexdump(payload, HexdumpMode::default()), "   "),
        ]
        .join("\n"))
    }
}
