//! gRPC DATA payload handler (shipped extension for gRPC interop,
//! spec.md §4.3). Not registered by default — a caller opts in with
//! `Describer::register_payload_handler("DATA", Arc::new(GrpcDataHandler::new(schemas)))`,
//! mirroring `_bin/grpc_proxy.py::main()`'s
//! `tcp_h2_describe.register_payload_handler("DATA", handle_data_payload)`.
//!
//! Unlike the Python reference (which only ever prints the raw protobuf
//! bytes), this ships a small registry of candidate message schemas
//! (SPEC_FULL.md §4.3) so a recognised message gets a pretty textual
//! rendering instead of just a hexdump. The one built-in candidate matches
//! the demo `users.v1.User` message from `_grpc/users_pb2.py`
//! (`first_name`/`last_name` strings, `id` varint) using a minimal
//! protobuf wire-format scanner — not a general protobuf decoder, which is
//! out of scope here the same way it was never part of the original tool.

use super::{HandlerCtx, PayloadHandler};
use crate::error::DescribeError;
use crate::hexdump::{hexdump, indent, HexdumpMode};
use crate::literal::quoted_bytes;
use crate::registry::flag_bits;
use std::sync::{Arc, Mutex};

type SchemaFn = dyn Fn(&[u8]) -> Option<String> + Send + Sync;

struct SchemaRegistryInner {
    candidates: Vec<(String, Arc<SchemaFn>)>,
    locked: bool,
}

/// Process-wide registry of candidate gRPC message schemas, tried in
/// registration order against an undeclared protobuf message's bytes.
#[derive(Clone)]
pub struct GrpcSchemaRegistry {
    inner: Arc<Mutex<SchemaRegistryInner>>,
}

impl Default for GrpcSchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GrpcSchemaRegistry {
    /// A registry seeded with the one built-in candidate schema.
    pub fn new() -> Self {
        let registry = GrpcSchemaRegistry {
            inner: Arc::new(Mutex::new(SchemaRegistryInner {
                candidates: Vec::new(),
                locked: false,
            })),
        };
        registry
            .register("users.v1.User", Arc::new(try_decode_user))
            .expect("built-in schema registration cannot fail");
        registry
    }

    /// An empty registry with no built-in candidates, for tests that want to
    /// exercise the raw-fallback path in isolation.
    pub fn empty() -> Self {
        GrpcSchemaRegistry {
            inner: Arc::new(Mutex::new(SchemaRegistryInner {
                candidates: Vec::new(),
                locked: false,
            })),
        }
    }

    pub fn register(
        &self,
        name: impl Into<String>,
        matcher: Arc<SchemaFn>,
    ) -> Result<(), crate::error::RegistryError> {
        let name = name.into();
        let mut inner = self.inner.lock().expect("grpc schema registry mutex poisoned");
        if inner.locked {
            return Err(crate::error::RegistryError::Locked);
        }
        if inner.candidates.iter().any(|(n, _)| n == &name) {
            return Err(crate::error::RegistryError::SchemaAlreadyRegistered(name));
        }
        inner.candidates.push((name, matcher));
        Ok(())
    }

    pub fn lock(&self) {
        self.inner.lock().expect("grpc schema registry mutex poisoned").locked = true;
    }

    /// Try every registered candidate in order; the first match wins.
    fn try_match(&self, message: &[u8]) -> Option<(String, String)> {
        let inner = self.inner.lock().expect("grpc schema registry mutex poisoned");
        inner
            .candidates
            .iter()
            .find_map(|(name, matcher)| matcher(message).map(|text| (name.clone(), text)))
    }
}

/// Minimal protobuf wire-format scan for the demo `users.v1.User` message:
/// field 1 (`first_name`, string), field 2 (`last_name`, string), field 3
/// (`id`, varint). Returns `None` (not `Err`) on any mismatch so the caller
/// can fall through to the next candidate / the raw fallback.
fn try_decode_user(bytes: &[u8]) -> Option<String> {
    let mut first_name: Option<String> = None;
    let mut last_name: Option<String> = None;
    let mut id: Option<u64> = None;

    let mut pos = 0;
    while pos < bytes.len() {
        let (tag, tag_len) = read_varint(&bytes[pos..])?;
        pos += tag_len;
        let field_number = tag >> 3;
        let wire_type = tag & 0x7;

        match (field_number, wire_type) {
            (1, 2) | (2, 2) => {
                let (len, len_len) = read_varint(&bytes[pos..])?;
                pos += len_len;
                let end = pos.checked_add(len as usize)?;
                let slice = bytes.get(pos..end)?;
                let text = std::str::from_utf8(slice).ok()?.to_string();
                pos = end;
                if field_number == 1 {
                    first_name = Some(text);
                } else {
                    last_name = Some(text);
                }
            }
            (3, 0) => {
                let (value, len) = read_varint(&bytes[pos..])?;
                pos += len;
                id = Some(value);
            }
            _ => return None,
        }
    }

    if first_name.is_none() && last_name.is_none() && id.is_none() {
        return None;
    }

    Some(format!(
        "users.v1.User {{ first_name: {:?}, last_name: {:?}, id: {} }}",
        first_name.unwrap_or_default(),
        last_name.unwrap_or_default(),
        id.unwrap_or_default()
    ))
}

fn read_varint(bytes: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, &b) in bytes.iter().enumerate().take(10) {
        value |= u64::from(b & 0x7f) << (7 * i);
        if b & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

pub struct GrpcDataHandler;

impl GrpcDataHandler {
    pub fn new() -> Self {
        GrpcDataHandler
    }
}

impl Default for GrpcDataHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadHandler for GrpcDataHandler {
    fn handle(&self, payload: &[u8], flags: u8, ctx: &mut HandlerCtx) -> Result<String, DescribeError> {
        if flags & flag_bits::PADDED != 0 {
            return Err(DescribeError::NotImplemented {
                feature: "PADDED flag on gRPC DATA frames",
            });
        }
        if payload.is_empty() {
            return Ok(String::new());
        }

        let compressed_flag = payload[0];
        match compressed_flag {
            0x00 => {}
            0x01 => {
                return Err(DescribeError::NotImplemented {
                    feature: "compressed gRPC DATA messages",
                })
            }
            other => return Err(DescribeError::GrpcInvalidCompressedFlag(other)),
        }

        if payload.len() < 5 {
            return Err(DescribeError::GrpcLengthMismatch {
                declared: 0,
                available: payload.len(),
            });
        }
        let declared_len = u32::from_be_bytes([payload[1], payload[2], payload[3], payload[4]]);
        let available = payload.len() - 5;
        if declared_len as usize != available {
            return Err(DescribeError::GrpcLengthMismatch {
                declared: declared_len,
                available,
            });
        }

        let mut lines = vec![
            format!("gRPC Compressed Flag = {} ({})", compressed_flag, hexdump(&payload[..1], HexdumpMode::SingleRow)),
            format!(
                "gRPC Message Length = {} ({})",
                declared_len,
                hexdump(&payload[1..5], HexdumpMode::SingleRow)
            ),
        ];

        if declared_len == 0 {
            return Ok(lines.join("\n"));
        }

        let message = &payload[5..];
        let (schema_name, pretty) = match ctx.grpc_schemas.try_match(message) {
            Some((name, text)) => (name, text),
            None => ("<none>".to_string(), quoted_bytes(message)),
        };
        lines.push(format!("gRPC Message Schema = {}", schema_name));
        lines.push("gRPC Message =".to_string());
        lines.push(format!("   {}", pretty));
        lines.push("Hexdump (gRPC Message) =".to_string());
        lines.push(indent(&hexdump(message, HexdumpMode::default()), "   "));
        Ok(lines.join("\n"))
    }
}
