//! Error types for every fallible operation in the describer and its
//! collaborators. One enum per concern, all built with `thiserror`, matching
//! the error-enum-per-failure-domain idiom used throughout the corpus (see
//! e.g. `cliplink::FrameError` / `fluke::StreamIdOutOfRange`).

use thiserror::Error;

/// Errors raised while decomposing a TCP read into HTTP/2 frame descriptions.
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("buffer has {len} bytes, fewer than the 9-octet frame header")]
    ShortHeader { len: usize },

    #[error("frame declares {declared} octets of payload but only {remaining} remain")]
    ShortPayload { declared: usize, remaining: usize },

    #[error("unknown frame type {0:#x}")]
    UnknownType(u8),

    #[error("flags {flags:#x} for {frame_type} frame have unaccounted bits {remaining:#x}")]
    UnaccountedFlags {
        frame_type: &'static str,
        flags: u8,
        remaining: u8,
    },

    #[error("expected buffer to begin with the HTTP/2 client connection preface")]
    MissingPreface,

    #[error("{feature} is not implemented")]
    NotImplemented { feature: &'static str },

    #[error("SETTINGS payload length {0} is not a multiple of 6")]
    InvalidSettingsLength(usize),

    #[error("{frame_type} payload must be exactly {expected} bytes, got {actual}")]
    InvalidLength {
        frame_type: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("gRPC DATA declared length prefix {declared} does not match available {available} bytes")]
    GrpcLengthMismatch { declared: u32, available: usize },

    #[error("gRPC DATA compressed-flag octet {0:#x} is not a recognised value")]
    GrpcInvalidCompressedFlag(u8),

    #[error("HPACK decode failed: {0}")]
    HpackDecode(String),
}

/// Errors raised while parsing a v1 PROXY protocol preamble line.
#[derive(Debug, Error)]
pub enum ProxyProtocolError {
    #[error("PROXY line did not end in CRLF")]
    BadTerminator,

    #[error("unsupported INET protocol token {0:?}")]
    BadProtocol(Vec<u8>),

    #[error("invalid IP address {value:?} for address family {family}")]
    BadIp { value: Vec<u8>, family: &'static str },

    #[error("invalid port {0:?}")]
    BadPort(Vec<u8>),

    #[error("PROXY line has {0} space-delimited tokens, expected 6")]
    BadTokenCount(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised by the process-wide extension registries.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0:?} is not one of the ten defined HTTP/2 frame types")]
    UnknownFrameType(String),

    #[error("a non-default payload handler is already registered for {0}")]
    HandlerAlreadyRegistered(&'static str),

    #[error("setting identifier {0:#x} is already registered")]
    SettingAlreadyRegistered(u16),

    #[error("gRPC message schema {0:?} is already registered")]
    SchemaAlreadyRegistered(String),

    #[error("registries may not be modified after the proxy has accepted its first connection")]
    Locked,
}

/// Errors on the byte-forwarding path between client and backend sockets.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("short send: wrote {wrote} of {requested} bytes")]
    ShortSend { wrote: usize, requested: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
