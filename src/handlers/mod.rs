//! Pluggable per-frame-type payload handlers (spec.md §4.3, §4.7, §9 design
//! note (a)). Generalizes the teacher's closed `match header.frame_type { ... }`
//! in `h2_codec.rs::parse_frame` into a startup-built table of trait objects,
//! seeded with the four shipped handlers, with every other slot falling back
//! to [`default::DefaultHandler`] — this is what makes `register_payload_handler`
//! possible without touching the frame iterator itself.

mod default;
mod grpc_data;
mod headers;
mod ping;
mod settings;
mod window_update;

pub use default::DefaultHandler;
pub use grpc_data::{GrpcDataHandler, GrpcSchemaRegistry};
pub use headers::HeadersHandler;
pub use ping::PingHandler;
pub use settings::SettingsHandler;
pub use window_update::WindowUpdateHandler;

use crate::error::{DescribeError, RegistryError};
use crate::hpack::HpackDecoder;
use crate::registry::{FrameType, Registry};
use std::sync::{Arc, Mutex};

/// Mutable, per-call context a handler may need: the connection-direction's
/// HPACK dynamic table (HEADERS only) and the process-wide SETTINGS name
/// table (SETTINGS only). Bundled into one struct so the handler trait stays
/// a single fixed signature regardless of which pieces of state a given
/// handler actually touches.
pub struct HandlerCtx<'a> {
    pub hpack: &'a mut HpackDecoder,
    pub settings: &'a Registry,
    pub grpc_schemas: &'a GrpcSchemaRegistry,
}

/// `(payload, flags) -> description | error` for one frame type.
pub trait PayloadHandler: Send + Sync {
    fn handle(&self, payload: &[u8], flags: u8, ctx: &mut HandlerCtx) -> Result<String, DescribeError>;
}

struct HandlerTableInner {
    slots: [Option<Arc<dyn PayloadHandler>>; 10],
    locked: bool,
}

fn slot_index(frame_type: FrameType) -> usize {
    FrameType::ALL.iter().position(|&t| t == frame_type).expect("FrameType::ALL is exhaustive")
}

/// The process-wide table of payload handlers, seeded at construction with
/// the four shipped handlers (HEADERS, SETTINGS, PING, WINDOW_UPDATE).
/// Explicitly `Arc`-shared rather than a hidden global static, matching
/// [`crate::registry::Registry`]'s rationale.
#[derive(Clone)]
pub struct HandlerTable {
    inner: Arc<Mutex<HandlerTableInner>>,
    default: Arc<dyn PayloadHandler>,
}

impl Default for HandlerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerTable {
    pub fn new() -> Self {
        const NONE: Option<Arc<dyn PayloadHandler>> = None;
        let mut slots = [NONE; 10];
        slots[slot_index(FrameType::Headers)] = Some(Arc::new(HeadersHandler) as Arc<dyn PayloadHandler>);
        slots[slot_index(FrameType::Settings)] = Some(Arc::new(SettingsHandler) as Arc<dyn PayloadHandler>);
        slots[slot_index(FrameType::Ping)] = Some(Arc::new(PingHandler) as Arc<dyn PayloadHandler>);
        slots[slot_index(FrameType::WindowUpdate)] = Some(Arc::new(WindowUpdateHandler) as Arc<dyn PayloadHandler>);

        HandlerTable {
            inner: Arc::new(Mutex::new(HandlerTableInner { slots, locked: false })),
            default: Arc::new(DefaultHandler),
        }
    }

    /// Register `handler` for `frame_type_name` (e.g. `"DATA"`), as used by
    /// the gRPC extension to install [`GrpcDataHandler`] over DATA frames.
    pub fn register(
        &self,
        frame_type_name: &str,
        handler: Arc<dyn PayloadHandler>,
    ) -> Result<(), RegistryError> {
        let frame_type = FrameType::from_name(frame_type_name)
            .ok_or_else(|| RegistryError::UnknownFrameType(frame_type_name.to_string()))?;
        let mut inner = self.inner.lock().expect("handler table mutex poisoned");
        if inner.locked {
            return Err(RegistryError::Locked);
        }
        let idx = slot_index(frame_type);
        if inner.slots[idx].is_some() {
            return Err(RegistryError::HandlerAlreadyRegistered(frame_type.name()));
        }
        inner.slots[idx] = Some(handler);
        Ok(())
    }

    pub fn lock(&self) {
        self.inner.lock().expect("handler table mutex poisoned").locked = true;
    }

    /// Resolve the handler for `frame_type`, falling back to the default.
    pub fn resolve(&self, frame_type: FrameType) -> Arc<dyn PayloadHandler> {
        let inner = self.inner.lock().expect("handler table mutex poisoned");
        inner.slots[slot_index(frame_type)]
            .clone()
            .unwrap_or_else(|| self.default.clone())
    }
}
