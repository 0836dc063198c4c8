//! The TCP proxy runtime (spec.md §4.8/§5): accept loop, per-connection
//! dialing and forwarding, and keepalive tuning.

pub mod connect;
pub mod keepalive;
pub mod serve;

pub use connect::SharedState;
pub use serve::serve;
