//! SETTINGS payload handler. Grounded on `_describe.py::handle_settings_payload`.

use super::{HandlerCtx, PayloadHandler};
use crate::error::DescribeError;
use crate::hexdump::{hexdump, HexdumpMode};

pub struct SettingsHandler;

impl PayloadHandler for SettingsHandler {
    fn handle(&self, payload: &[u8], _flags: u8, ctx: &mut HandlerCtx) -> Result<String, DescribeError> {
        if payload.len() % 6 != 0 {
            return Err(DescribeError::InvalidSettingsLength(payload.len()));
        }
        if payload.is_empty() {
            return Ok(String::new());
        }

        let mut lines = vec!["Settings =".to_string()];
        for entry in payload.chunks_exact(6) {
            let id = u16::from_be_bytes([entry[0], entry[1]]);
            let value = u32::from_be_bytes([entry[2], entry[3], entry[4], entry[5]]);
            let name = ctx.settings.setting_name(id);
            let id_hex = hexdump(&entry[0..2], HexdumpMode::SingleRow);
            let value_hex = hexdump(&entry[2..6], HexdumpMode::SingleRow);
            lines.push(format!(
                "   {}:{:#x} -> {} ({} | {})",
                name, id, value, id_hex, value_hex
            ));
        }
        Ok(lines.join("\n"))
    }
}
