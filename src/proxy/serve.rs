//! The accept loop (spec.md §4.8, grounded on `_serve.py`): bind the proxy
//! port, accept connections in a loop, and hand each one off to its own pair
//! of forwarding threads, polling a shutdown flag between accepts so the
//! process can drain in-flight connections on interrupt.

use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use socket2::{Domain, Socket, Type};
use tracing::{error, info};

use crate::proxy::connect::{handle_connection, SharedState};

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(250);
const LISTEN_BACKLOG: i32 = 1024;

/// Runs the accept loop until `shutdown` is set, then waits for all
/// in-flight connections to finish. Returns once every spawned connection
/// thread has been joined.
pub fn serve(
    proxy_port: u16,
    backend_host: String,
    backend_port: u16,
    state: SharedState,
    shutdown: Arc<AtomicBool>,
) -> std::io::Result<()> {
    state.handlers.lock();
    state.settings.lock();
    state.grpc_schemas.lock();

    let listener = bind(proxy_port)?;
    listener.set_nonblocking(true)?;
    info!(port = proxy_port, backend = %format!("{backend_host}:{backend_port}"), "proxy listening");

    let handles: Arc<Mutex<Vec<JoinHandle<()>>>> = Arc::new(Mutex::new(Vec::new()));

    while !shutdown.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, addr)) => {
                info!(peer = %addr, "accepted connection");
                spawn_connection(stream, backend_host.clone(), backend_port, state.clone(), &handles);
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(e) => {
                error!(error = %e, "accept failed");
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
        }
    }

    info!("shutdown requested, draining in-flight connections");
    let mut guard = handles.lock().unwrap_or_else(|p| p.into_inner());
    for handle in guard.drain(..) {
        let _ = handle.join();
    }
    Ok(())
}

fn spawn_connection(
    stream: TcpStream,
    backend_host: String,
    backend_port: u16,
    state: SharedState,
    handles: &Arc<Mutex<Vec<JoinHandle<()>>>>,
) {
    if let Err(e) = stream.set_nonblocking(false) {
        error!(error = %e, "failed to set accepted socket to blocking mode");
        return;
    }
    let handle = thread::spawn(move || {
        handle_connection(stream, (backend_host, backend_port), state);
    });
    let mut guard = handles.lock().unwrap_or_else(|p| p.into_inner());
    guard.retain(|h| !h.is_finished());
    guard.push(handle);
}

fn bind(port: u16) -> std::io::Result<TcpListener> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    let addr = std::net::SocketAddrV4::new(std::net::Ipv4Addr::UNSPECIFIED, port);
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    Ok(socket.into())
}
