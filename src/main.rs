use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use tcp_h2_describe::cli::Cli;
use tcp_h2_describe::handlers::{GrpcSchemaRegistry, HandlerTable};
use tcp_h2_describe::output::OutputSink;
use tcp_h2_describe::proxy::{serve, SharedState};
use tcp_h2_describe::registry::Registry;

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let state = SharedState {
        handlers: HandlerTable::new(),
        settings: Registry::new(),
        grpc_schemas: GrpcSchemaRegistry::new(),
        output: Arc::new(OutputSink::stdout()),
        keepalive_seconds: cli.keepalive_seconds,
    };

    // The accept loop polls this flag between accepts so tests can exercise a
    // clean, drained shutdown; the standalone binary otherwise relies on the
    // platform's default SIGINT disposition (immediate process exit).
    let shutdown = Arc::new(AtomicBool::new(false));

    info!("tcp-h2-describe starting");
    serve(cli.proxy_port, cli.server_host, cli.server_port, state, shutdown)
}
