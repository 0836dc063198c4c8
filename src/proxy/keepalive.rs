//! TCP keepalive tuning (spec.md §4.8, grounded on `_keepalive.py`).
//!
//! The original only ever *raises* the OS defaults toward a longer idle
//! threshold; it never lowers them, since a local default shorter than the
//! requested threshold is assumed to already be aggressive enough.

use std::net::TcpStream;
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};

use crate::error::ForwardError;

/// Enable keepalive on `stream` and raise both its idle and interval
/// thresholds to at least `idle_seconds`, without lowering whatever the OS
/// default already is for either one independently.
pub fn tune_keepalive(stream: &TcpStream, idle_seconds: u64) -> Result<(), ForwardError> {
    let sock = SockRef::from(stream);
    sock.set_keepalive(true)?;

    let requested = Duration::from_secs(idle_seconds);
    let current_idle = sock.keepalive_time().unwrap_or(Duration::ZERO);
    let current_interval = sock.keepalive_interval().unwrap_or(Duration::ZERO);
    if current_idle >= requested && current_interval >= requested {
        return Ok(());
    }

    let mut params = TcpKeepalive::new();
    params = params.with_time(current_idle.max(requested));
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        params = params.with_interval(current_interval.max(requested));
    }
    #[cfg(target_os = "macos")]
    {
        // macOS has no separate keepalive-interval knob in socket2; `with_time`
        // maps to TCP_KEEPALIVE, which is the only threshold it exposes.
    }

    sock.set_tcp_keepalive(&params)?;
    Ok(())
}
