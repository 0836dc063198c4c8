//! Per-connection wiring: dial the backend, peel off an optional PROXY
//! protocol preamble, and spawn the two forwarding threads (spec.md §4.8,
//! grounded on `_connect.py`).

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info, warn};

use crate::describe::Describer;
use crate::error::ForwardError;
use crate::handlers::{GrpcSchemaRegistry, HandlerTable};
use crate::output::OutputSink;
use crate::proxy::keepalive::tune_keepalive;
use crate::proxy_protocol::{read_proxy_line, starts_with_signature};
use crate::registry::Registry;

const READ_BUF_SIZE: usize = 64 * 1024;
const PEEK_LEN: usize = 5;

/// The shared, process-wide state every connection borrows a clone of.
#[derive(Clone)]
pub struct SharedState {
    pub handlers: HandlerTable,
    pub settings: Registry,
    pub grpc_schemas: GrpcSchemaRegistry,
    pub output: Arc<OutputSink>,
    pub keepalive_seconds: u64,
}

/// Accept one client connection, dial the backend, and run both forwarding
/// directions to completion on two dedicated threads. Blocks until both
/// directions have closed.
pub fn handle_connection(mut client: TcpStream, backend_addr: (String, u16), state: SharedState) {
    let peer = client
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());

    if let Err(e) = tune_keepalive(&client, state.keepalive_seconds) {
        warn!(peer = %peer, error = %e, "failed to tune client keepalive");
    }

    let proxy_line = match peek_proxy_line(&mut client) {
        Ok(line) => line,
        Err(e) => {
            error!(peer = %peer, error = %e, "failed to read PROXY protocol preamble");
            return;
        }
    };

    let (host, port) = backend_addr;
    let backend = match TcpStream::connect((host.as_str(), port)) {
        Ok(s) => s,
        Err(e) => {
            error!(peer = %peer, backend = %format!("{host}:{port}"), error = %e, "failed to connect to backend");
            return;
        }
    };
    if let Err(e) = tune_keepalive(&backend, state.keepalive_seconds) {
        warn!(peer = %peer, error = %e, "failed to tune backend keepalive");
    }

    info!(peer = %peer, backend = %format!("{host}:{port}"), "connection established");

    let client_to_backend = client.try_clone().expect("TcpStream::try_clone");
    let backend_to_client = backend.try_clone().expect("TcpStream::try_clone");

    let state_a = state.clone();
    let proxy_line_bytes = proxy_line.clone();
    let peer_a = peer.clone();
    let client_reader = thread::spawn(move || {
        let describer = Describer::new(state_a.handlers.clone(), state_a.settings.clone(), state_a.grpc_schemas.clone());
        pump(
            client_to_backend,
            backend.try_clone().expect("TcpStream::try_clone"),
            describer,
            &state_a.output,
            format!("{peer_a} -> backend"),
            true,
            proxy_line_bytes.as_deref(),
        );
    });

    let state_b = state.clone();
    let peer_b = peer.clone();
    let server_reader = thread::spawn(move || {
        let describer = Describer::new(state_b.handlers.clone(), state_b.settings.clone(), state_b.grpc_schemas.clone());
        pump(
            backend_to_client,
            client.try_clone().expect("TcpStream::try_clone"),
            describer,
            &state_b.output,
            format!("backend -> {peer_b}"),
            false,
            None,
        );
    });

    let _ = client_reader.join();
    let _ = server_reader.join();
    debug!(peer = %peer, "connection closed");
}

/// Non-consuming peek for the `PROXY` signature, then a full byte-at-a-time
/// read of the line if present. The peeked bytes are never consumed from the
/// stream unless the full line is read.
fn peek_proxy_line(client: &mut TcpStream) -> Result<Option<Vec<u8>>, crate::error::ProxyProtocolError> {
    let mut peek_buf = [0u8; PEEK_LEN];
    let n = client.peek(&mut peek_buf)?;
    if n < PEEK_LEN || !starts_with_signature(&peek_buf) {
        return Ok(None);
    }
    let line = read_proxy_line(client)?;
    Ok(Some(line.raw))
}

/// Read from `src`, describe each read, and forward the raw bytes to `dst`,
/// until `src` hits EOF or an I/O error. Describe errors are logged and the
/// raw bytes are still forwarded: a malformed or non-HTTP/2 stream should not
/// break the proxy's core job of moving bytes.
fn pump(
    mut src: TcpStream,
    mut dst: TcpStream,
    mut describer: Describer,
    output: &OutputSink,
    label: String,
    mut expect_preface: bool,
    mut proxy_line: Option<&[u8]>,
) {
    let mut buf = vec![0u8; READ_BUF_SIZE];
    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(%label, error = %e, "read error, closing connection");
                break;
            }
        };

        match describer.describe(&buf[..n], &label, expect_preface, proxy_line) {
            Ok(block) => {
                if let Err(e) = output.write_block(&block) {
                    warn!(%label, error = %e, "failed to write description block");
                }
            }
            Err(e) => warn!(%label, error = %e, "failed to describe TCP read"),
        }
        expect_preface = false;
        proxy_line = None;

        if let Err(e) = forward(&mut dst, &buf[..n]) {
            debug!(%label, error = %e, "forward error, closing connection");
            break;
        }
    }
    let _ = dst.shutdown(std::net::Shutdown::Write);
}

/// Writes are expected non-partial: a single `write` call is expected to
/// accept the whole buffer. A short count fails *short-send* rather than
/// looping to finish the write, per spec.md §5.
fn forward(dst: &mut TcpStream, bytes: &[u8]) -> Result<(), ForwardError> {
    let wrote = dst.write(bytes)?;
    if wrote != bytes.len() {
        return Err(ForwardError::ShortSend {
            wrote,
            requested: bytes.len(),
        });
    }
    Ok(())
}
