//! WINDOW_UPDATE payload handler. Grounded on
//! `_describe.py::handle_window_update_payload`.

use super::{HandlerCtx, PayloadHandler};
use crate::error::DescribeError;
use crate::hexdump::{hexdump, HexdumpMode};

const RESERVED_HIGHEST_BIT: u32 = 0x8000_0000;

pub struct WindowUpdateHandler;

impl PayloadHandler for WindowUpdateHandler {
    fn handle(&self, payload: &[u8], _flags: u8, _ctx: &mut HandlerCtx) -> Result<String, DescribeError> {
        if payload.len() != 4 {
            return Err(DescribeError::InvalidLength {
                frame_type: "WINDOW_UPDATE",
                expected: 4,
                actual: payload.len(),
            });
        }

        let raw = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
        let reserved_bit = (raw & RESERVED_HIGHEST_BIT != 0) as u8;
        let increment = raw & !RESERVED_HIGHEST_BIT;

        Ok(format!(
            "Reserved Bit = {}, Window Size Increment = {} ({})",
            reserved_bit,
            increment,
            hexdump(payload, HexdumpMode::SingleRow)
        ))
    }
}
