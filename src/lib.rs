//! tcp-h2-describe: a transparent TCP reverse proxy that forwards bytes
//! between a client and a backend unchanged while logging a human-readable
//! decomposition of the HTTP/2 frames it observes in each direction.
//!
//! # Architecture
//!
//! - [`registry`] / [`handlers`] hold the process-wide, `Arc`-shared
//!   extension points: the frame-type flag tables, the SETTINGS identifier
//!   registry, the per-frame-type payload handler table, and the gRPC
//!   message schema registry.
//! - [`frame`] walks a single TCP read's bytes into one rendered block per
//!   HTTP/2 frame; [`describe`] wraps that with the header rule, direction
//!   label, optional PROXY protocol line, and optional connection preface.
//! - [`proxy`] is the runtime: the accept loop, per-connection dialing, and
//!   the two forwarding threads that drive [`describe::Describer`] and the
//!   [`output::OutputSink`].
//!
//! This crate does not provide a TLS layer, HTTP/1.x or HTTP/3 decoding, or
//! frame re-encoding — only decomposition of frames already on the wire.

pub mod cli;
pub mod describe;
pub mod error;
pub mod frame;
pub mod handlers;
pub mod hexdump;
pub mod hpack;
pub mod literal;
pub mod output;
pub mod proxy;
pub mod proxy_protocol;
pub mod registry;

pub use describe::Describer;
pub use error::{DescribeError, ForwardError, ProxyProtocolError, RegistryError};
pub use frame::{FrameBlock, FrameIterator};
pub use hpack::{DecodedHeader, HpackDecoder};
pub use registry::{FrameType, Registry};
