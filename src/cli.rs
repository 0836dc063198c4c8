//! Command-line surface (spec.md §6, grounded on `__main__.py`'s argparse
//! definitions), reimplemented with `clap`'s derive API.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "tcp-h2-describe", about = "A transparent TCP proxy that describes HTTP/2 frames as it forwards them")]
pub struct Cli {
    /// Local port the proxy listens on.
    #[arg(long, default_value_t = 24909)]
    pub proxy_port: u16,

    /// Hostname of the backend server to forward connections to.
    #[arg(long, default_value = "localhost")]
    pub server_host: String,

    /// Port of the backend server to forward connections to.
    #[arg(long, default_value_t = 80)]
    pub server_port: u16,

    /// Idle seconds before a TCP keepalive probe is sent; only raises the OS default.
    #[arg(long, default_value_t = 180)]
    pub keepalive_seconds: u64,

    /// Emit debug-level logging in addition to info-level.
    #[arg(short, long)]
    pub verbose: bool,
}
