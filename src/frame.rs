//! The frame iterator (spec.md §4.2): walks a byte buffer representing the
//! tail of one TCP read and yields one rendered description block per HTTP/2
//! frame until the buffer is exhausted.
//!
//! Grounded on the teacher's `H2Codec::process`/`H2FrameHeader::parse` split
//! loop in `h2_codec.rs`, but reshaped from a stateful, cross-read byte
//! accumulator into a one-shot `Iterator` over a borrowed slice: per
//! invariant I-Boundary this tool never reassembles frames split across
//! reads, so there is nothing to buffer between `describe()` calls.

use crate::error::DescribeError;
use crate::handlers::{HandlerCtx, HandlerTable};
use crate::hexdump::{hexdump, HexdumpMode};
use crate::registry::FrameType;

/// One parsed-and-rendered HTTP/2 frame: the multi-line description plus how
/// many bytes of the input it consumed (always `9 + length`, per I-Header).
pub struct FrameBlock {
    pub text: String,
    pub consumed: usize,
}

/// Render the flags byte for `frame_type`, per spec.md §4.2 step 3.
fn describe_flags(frame_type: FrameType, flags: u8) -> Result<String, DescribeError> {
    let mut remaining = flags;
    let mut parts = Vec::new();
    for &(bit, name) in frame_type.flag_bits() {
        if remaining & bit == bit {
            remaining &= !bit;
            parts.push(format!("{}:{:#x}", name, bit));
        }
    }
    if remaining != 0 {
        return Err(DescribeError::UnaccountedFlags {
            frame_type: frame_type.name(),
            flags,
            remaining,
        });
    }
    if parts.is_empty() {
        return Ok("UNSET".to_string());
    }
    Ok(parts.join(" | "))
}

/// Parse and render exactly one frame from the front of `buf`.
fn next_frame(
    buf: &[u8],
    handlers: &HandlerTable,
    ctx: &mut HandlerCtx,
) -> Result<FrameBlock, DescribeError> {
    if buf.len() < 9 {
        return Err(DescribeError::ShortHeader { len: buf.len() });
    }

    let length = u32::from_be_bytes([0, buf[0], buf[1], buf[2]]) as usize;
    let length_hex = hexdump(&buf[0..3], HexdumpMode::SingleRow);

    let type_octet = buf[3];
    let frame_type = FrameType::from_octet(type_octet).ok_or(DescribeError::UnknownType(type_octet))?;
    let type_hex = hexdump(&buf[3..4], HexdumpMode::SingleRow);

    let flags = buf[4];
    let flags_str = describe_flags(frame_type, flags)?;
    let flags_hex = hexdump(&buf[4..5], HexdumpMode::SingleRow);

    let stream_id = u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]);
    let stream_id_hex = hexdump(&buf[5..9], HexdumpMode::SingleRow);

    if buf.len() < 9 + length {
        return Err(DescribeError::ShortPayload {
            declared: length,
            remaining: buf.len() - 9,
        });
    }
    let payload = &buf[9..9 + length];

    let mut lines = vec![
        format!("Frame Length = {} ({})", length, length_hex),
        format!("Frame Type = {} ({})", frame_type.name(), type_hex),
        format!("Flags = {} ({})", flags_str, flags_hex),
        format!("Stream Identifier = {} ({})", stream_id, stream_id_hex),
    ];

    let handler = handlers.resolve(frame_type);
    let payload_part = handler.handle(payload, flags, ctx)?;
    if !payload_part.is_empty() {
        lines.push(payload_part);
    }

    Ok(FrameBlock {
        text: lines.join("\n"),
        consumed: 9 + length,
    })
}

/// Lazily decomposes a buffer into one [`FrameBlock`] per HTTP/2 frame, in
/// wire order, until the buffer is exhausted.
///
/// This is a "streaming iterator" rather than a `std::iter::Iterator`: each
/// step needs a mutable borrow of the connection-direction's [`HandlerCtx`]
/// (for the HEADERS handler's HPACK dynamic table), and threading that
/// through `Iterator::next`'s fixed `&mut self -> Option<Item>` signature
/// would force the context to live as long as the iterator itself, which is
/// both awkward and unnecessary — callers just loop on [`FrameIterator::advance`]
/// until it returns `None`. The first error terminates iteration: a
/// subsequent call returns `None`.
pub struct FrameIterator<'buf> {
    remaining: &'buf [u8],
    done: bool,
}

impl<'buf> FrameIterator<'buf> {
    pub fn new(buf: &'buf [u8]) -> Self {
        FrameIterator { remaining: buf, done: false }
    }

    pub fn advance(
        &mut self,
        handlers: &HandlerTable,
        ctx: &mut HandlerCtx,
    ) -> Option<Result<FrameBlock, DescribeError>> {
        if self.done || self.remaining.is_empty() {
            return None;
        }
        match next_frame(self.remaining, handlers, ctx) {
            Ok(block) => {
                self.remaining = &self.remaining[block.consumed..];
                Some(Ok(block))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
