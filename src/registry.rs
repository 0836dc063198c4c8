//! The closed set of HTTP/2 frame types, their per-type flag bits, and the
//! (open, extensible) SETTINGS identifier table. Grounded on the `frame_type`
//! / `flags` / `settings_id` const modules in the teacher's `h2_codec.rs`,
//! generalized from bare `u8`/`u16` constants into a typed, closed `FrameType`
//! enum plus a data-driven flag table, since the describer needs names (not
//! just bits) for its textual rendering.

use crate::error::RegistryError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The closed set of HTTP/2 frame types (RFC 7540 §6 / spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Data,
    Headers,
    Priority,
    RstStream,
    Settings,
    PushPromise,
    Ping,
    GoAway,
    WindowUpdate,
    Continuation,
}

impl FrameType {
    pub const ALL: [FrameType; 10] = [
        FrameType::Data,
        FrameType::Headers,
        FrameType::Priority,
        FrameType::RstStream,
        FrameType::Settings,
        FrameType::PushPromise,
        FrameType::Ping,
        FrameType::GoAway,
        FrameType::WindowUpdate,
        FrameType::Continuation,
    ];

    /// Look up a frame type by its wire octet. `None` for an unknown type.
    pub fn from_octet(octet: u8) -> Option<Self> {
        Some(match octet {
            0x0 => FrameType::Data,
            0x1 => FrameType::Headers,
            0x2 => FrameType::Priority,
            0x3 => FrameType::RstStream,
            0x4 => FrameType::Settings,
            0x5 => FrameType::PushPromise,
            0x6 => FrameType::Ping,
            0x7 => FrameType::GoAway,
            0x8 => FrameType::WindowUpdate,
            0x9 => FrameType::Continuation,
            _ => return None,
        })
    }

    /// Look up a frame type by its registry name, e.g. `"HEADERS"`.
    pub fn from_name(name: &str) -> Option<Self> {
        FrameType::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            FrameType::Data => "DATA",
            FrameType::Headers => "HEADERS",
            FrameType::Priority => "PRIORITY",
            FrameType::RstStream => "RST_STREAM",
            FrameType::Settings => "SETTINGS",
            FrameType::PushPromise => "PUSH_PROMISE",
            FrameType::Ping => "PING",
            FrameType::GoAway => "GOAWAY",
            FrameType::WindowUpdate => "WINDOW_UPDATE",
            FrameType::Continuation => "CONTINUATION",
        }
    }

    /// The `(bit, name)` pairs defined for this frame type, in ascending bit
    /// order, per spec.md §3's flag registry.
    pub fn flag_bits(self) -> &'static [(u8, &'static str)] {
        match self {
            FrameType::Data => &[(0x1, "END_STREAM"), (0x8, "PADDED")],
            FrameType::Headers => &[
                (0x1, "END_STREAM"),
                (0x4, "END_HEADERS"),
                (0x8, "PADDED"),
                (0x20, "PRIORITY"),
            ],
            FrameType::Settings => &[(0x1, "ACK")],
            FrameType::PushPromise => &[(0x4, "END_HEADERS"), (0x8, "PADDED")],
            FrameType::Ping => &[(0x1, "ACK")],
            FrameType::Continuation => &[(0x4, "END_HEADERS")],
            FrameType::Priority | FrameType::RstStream | FrameType::GoAway | FrameType::WindowUpdate => &[],
        }
    }
}

/// Well-known flag bit constants, reused by payload handlers that need to
/// test a specific flag rather than render the whole set.
pub mod flag_bits {
    pub const END_STREAM: u8 = 0x1;
    pub const ACK: u8 = 0x1;
    pub const END_HEADERS: u8 = 0x4;
    pub const PADDED: u8 = 0x8;
    pub const PRIORITY: u8 = 0x20;
}

/// The initial (standard) SETTINGS identifier table, before any extension
/// registrations. See spec.md §3.
fn builtin_settings() -> HashMap<u16, &'static str> {
    HashMap::from([
        (0x1, "SETTINGS_HEADER_TABLE_SIZE"),
        (0x2, "SETTINGS_ENABLE_PUSH"),
        (0x3, "SETTINGS_MAX_CONCURRENT_STREAMS"),
        (0x4, "SETTINGS_INITIAL_WINDOW_SIZE"),
        (0x5, "SETTINGS_MAX_FRAME_SIZE"),
        (0x6, "SETTINGS_MAX_HEADER_LIST_SIZE"),
        (0x8, "SETTINGS_ENABLE_CONNECT_PROTOCOL"),
    ])
}

struct RegistryInner {
    settings: HashMap<u16, String>,
    locked: bool,
}

/// Process-wide, explicitly-shared extension state: the SETTINGS identifier
/// table. Threaded through via `Arc` rather than a hidden global static, so
/// that tests can construct independent registries instead of fighting over
/// process-global mutable state (a deliberate generalization of the Python
/// reference's bare module-level dict; see DESIGN.md).
#[derive(Clone)]
pub struct Registry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let settings = builtin_settings()
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect();
        Registry {
            inner: Arc::new(Mutex::new(RegistryInner {
                settings,
                locked: false,
            })),
        }
    }

    /// Register an additional SETTINGS identifier, e.g. the gRPC extension's
    /// `0xFE03 GRPC_ALLOW_TRUE_BINARY_METADATA`.
    pub fn register_setting(&self, id: u16, name: impl Into<String>) -> Result<(), RegistryError> {
        let mut inner = self.inner.lock().expect("registry mutex poisoned");
        if inner.locked {
            return Err(RegistryError::Locked);
        }
        if inner.settings.contains_key(&id) {
            return Err(RegistryError::SettingAlreadyRegistered(id));
        }
        inner.settings.insert(id, name.into());
        Ok(())
    }

    /// The name for `id`, or `"UNKNOWN"` if unregistered.
    pub fn setting_name(&self, id: u16) -> String {
        let inner = self.inner.lock().expect("registry mutex poisoned");
        inner
            .settings
            .get(&id)
            .cloned()
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }

    /// Close registration. Called once by the proxy runtime immediately
    /// before it starts accepting connections; further `register_*` calls
    /// fail with [`RegistryError::Locked`].
    pub fn lock(&self) {
        self.inner.lock().expect("registry mutex poisoned").locked = true;
    }

    #[cfg(test)]
    pub fn is_locked(&self) -> bool {
        self.inner.lock().expect("registry mutex poisoned").locked
    }
}
