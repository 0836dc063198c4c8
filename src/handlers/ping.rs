//! PING payload handler. Grounded on `_describe.py::handle_ping_payload`.

use super::{HandlerCtx, PayloadHandler};
use crate::error::DescribeError;
use crate::hexdump::{hexdump, HexdumpMode};

pub struct PingHandler;

impl PayloadHandler for PingHandler {
    fn handle(&self, payload: &[u8], _flags: u8, _ctx: &mut HandlerCtx) -> Result<String, DescribeError> {
        if payload.len() != 8 {
            return Err(DescribeError::InvalidLength {
                frame_type: "PING",
                expected: 8,
                actual: payload.len(),
            });
        }
        Ok(format!("Opaque Data = {}", hexdump(payload, HexdumpMode::SingleRow)))
    }
}
