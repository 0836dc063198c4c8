//! The describer façade (spec.md §4.4): turns the bytes from a single TCP
//! read into one formatted block — header rule, direction label, optional
//! proxy-protocol line, optional client preface, then one rendered block per
//! HTTP/2 frame.
//!
//! Each [`Describer`] owns the per-(connection, direction) state invariant
//! I-Stream-HPACK requires: its own [`HpackDecoder`] with its own dynamic
//! table, never shared across threads. It borrows the process-wide
//! [`HandlerTable`]/[`Registry`]/[`GrpcSchemaRegistry`], which are
//! read-mostly after startup and safe to share.

use crate::error::DescribeError;
use crate::frame::FrameIterator;
use crate::handlers::{GrpcSchemaRegistry, HandlerCtx, HandlerTable};
use crate::hexdump::{hexdump, indent, HexdumpMode};
use crate::hpack::HpackDecoder;
use crate::registry::Registry;

pub const PREFACE: &[u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

const HEADER_RULE: &str = "============================================================";
const FOOTER_RULE: &str = "----------------------------------------";

fn preface_block() -> String {
    [
        "Client Connection Preface = b'PRI * HTTP/2.0\\r\\n\\r\\nSM\\r\\n\\r\\n'".to_string(),
        "Hexdump (Client Connection Preface) =".to_string(),
        indent(&hexdump(PREFACE, HexdumpMode::default()), "   "),
    ]
    .join("\n")
}

/// Owns the HPACK dynamic table for one direction of one connection.
/// Construct one per worker thread; never move it across threads or share
/// it between the two directions of a connection.
pub struct Describer {
    hpack: HpackDecoder,
    handlers: HandlerTable,
    settings: Registry,
    grpc_schemas: GrpcSchemaRegistry,
}

impl Describer {
    pub fn new(handlers: HandlerTable, settings: Registry, grpc_schemas: GrpcSchemaRegistry) -> Self {
        Describer {
            hpack: HpackDecoder::new(),
            handlers,
            settings,
            grpc_schemas,
        }
    }

    /// Describe the bytes from a single TCP read.
    ///
    /// `expect_preface` should be `true` only for the very first read on the
    /// client-facing socket of a connection. `proxy_line`, when present, is
    /// rendered before the preface/frames (it was already consumed from the
    /// stream by [`crate::proxy_protocol`]).
    pub fn describe(
        &mut self,
        mut buf: &[u8],
        connection_description: &str,
        expect_preface: bool,
        proxy_line: Option<&[u8]>,
    ) -> Result<String, DescribeError> {
        let mut parts = vec![HEADER_RULE.to_string(), connection_description.to_string(), String::new()];

        if let Some(line) = proxy_line {
            parts.push("Proxy Protocol Header =".to_string());
            parts.push(format!("   {}", crate::literal::quoted_bytes(line)));
            parts.push("Hexdump (Proxy Protocol Header) =".to_string());
            parts.push(indent(&hexdump(line, HexdumpMode::default()), "   "));
            parts.push(FOOTER_RULE.to_string());
        }

        if expect_preface {
            if !buf.starts_with(PREFACE) {
                return Err(DescribeError::MissingPreface);
            }
            parts.push(preface_block());
            parts.push(FOOTER_RULE.to_string());
            buf = &buf[PREFACE.len()..];
        }

        let mut ctx = HandlerCtx {
            hpack: &mut self.hpack,
            settings: &self.settings,
            grpc_schemas: &self.grpc_schemas,
        };
        let mut iter = FrameIterator::new(buf);
        while let Some(result) = iter.advance(&self.handlers, &mut ctx) {
            let block = result?;
            parts.push(block.text);
            parts.push(FOOTER_RULE.to_string());
        }

        Ok(parts.join("\n"))
    }
}
