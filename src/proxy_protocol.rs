//! PROXY protocol v1 (HAProxy) line detection and parsing.
//!
//! Grounded on `_proxy_protocol.py`: peek for the `PROXY` literal without
//! consuming it, then read byte-at-a-time up to and including the
//! terminating `\r\n` (the spec caps v1 lines at 107 bytes including the
//! terminator), then split on ASCII spaces into exactly six tokens.

use std::io::{ErrorKind, Read};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::ProxyProtocolError;

const SIGNATURE: &[u8] = b"PROXY";
const MAX_LINE_LEN: usize = 107;

/// A parsed `PROXY` v1 header line. Field values are kept as their original
/// tokens; only the protocol family gates which IP parser is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyLine {
    pub protocol: String,
    pub source_ip: String,
    pub dest_ip: String,
    pub source_port: u16,
    pub dest_port: u16,
    /// The raw bytes of the line as they appeared on the wire, CRLF included.
    pub raw: Vec<u8>,
}

/// Test a non-consuming peek of a connection's first bytes for the `PROXY`
/// signature. Returns `false` on a short peek, which simply means this
/// connection doesn't open with a PROXY line.
pub fn starts_with_signature(peeked: &[u8]) -> bool {
    peeked.starts_with(SIGNATURE)
}

/// Read a PROXY v1 line from `stream`, byte at a time, stopping at the first
/// `\r\n`. The caller is expected to have already confirmed (via a
/// non-consuming peek) that the stream begins with `PROXY`.
pub fn read_proxy_line<R: Read>(stream: &mut R) -> Result<ProxyLine, ProxyProtocolError> {
    let mut raw = Vec::with_capacity(32);
    let mut byte = [0u8; 1];
    loop {
        if raw.len() >= MAX_LINE_LEN {
            return Err(ProxyProtocolError::BadTerminator);
        }
        let n = stream.read(&mut byte)?;
        if n == 0 {
            return Err(ProxyProtocolError::Io(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "connection closed while reading PROXY protocol line",
            )));
        }
        raw.push(byte[0]);
        if raw.ends_with(b"\r\n") {
            break;
        }
    }
    parse_line(&raw)
}

fn parse_line(raw: &[u8]) -> Result<ProxyLine, ProxyProtocolError> {
    if !raw.ends_with(b"\r\n") {
        return Err(ProxyProtocolError::BadTerminator);
    }
    let body = &raw[..raw.len() - 2];
    let text = std::str::from_utf8(body).map_err(|_| ProxyProtocolError::BadTerminator)?;
    let tokens: Vec<&str> = text.split(' ').collect();
    if tokens.len() != 6 {
        return Err(ProxyProtocolError::BadTokenCount(tokens.len()));
    }

    let [signature, protocol, source_ip, dest_ip, source_port, dest_port] = tokens[..] else {
        return Err(ProxyProtocolError::BadTokenCount(tokens.len()));
    };
    if signature != "PROXY" {
        return Err(ProxyProtocolError::BadTokenCount(tokens.len()));
    }

    match protocol {
        "TCP4" => {
            source_ip.parse::<Ipv4Addr>().map_err(|_| ProxyProtocolError::BadIp {
                value: source_ip.as_bytes().to_vec(),
                family: "TCP4",
            })?;
            dest_ip.parse::<Ipv4Addr>().map_err(|_| ProxyProtocolError::BadIp {
                value: dest_ip.as_bytes().to_vec(),
                family: "TCP4",
            })?;
        }
        "TCP6" => {
            source_ip.parse::<Ipv6Addr>().map_err(|_| ProxyProtocolError::BadIp {
                value: source_ip.as_bytes().to_vec(),
                family: "TCP6",
            })?;
            dest_ip.parse::<Ipv6Addr>().map_err(|_| ProxyProtocolError::BadIp {
                value: dest_ip.as_bytes().to_vec(),
                family: "TCP6",
            })?;
        }
        other => return Err(ProxyProtocolError::BadProtocol(other.as_bytes().to_vec())),
    }

    let source_port = parse_port(source_port)?;
    let dest_port = parse_port(dest_port)?;

    Ok(ProxyLine {
        protocol: protocol.to_string(),
        source_ip: source_ip.to_string(),
        dest_ip: dest_ip.to_string(),
        source_port,
        dest_port,
        raw: raw.to_vec(),
    })
}

/// Ports must be decimal integers in the open interval `(0, 65536)`; `0` is
/// rejected the same way the original `verify_port` does.
fn parse_port(token: &str) -> Result<u16, ProxyProtocolError> {
    let port = token
        .parse::<u16>()
        .map_err(|_| ProxyProtocolError::BadPort(token.as_bytes().to_vec()))?;
    if port == 0 {
        return Err(ProxyProtocolError::BadPort(token.as_bytes().to_vec()));
    }
    Ok(port)
}
