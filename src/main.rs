//! LayerKV - An In-Memory Key-Value Server with Nested Transactions
//!
//! This is the main entry point for the LayerKV server.
//! It sets up the TCP listener, the shared root keyspace, and handles incoming
//! connections.

use layerkv::commands::CommandHandler;
use layerkv::config::{CliAction, ServerConfig};
use layerkv::connection::{handle_connection, ConnectionStats};
use layerkv::storage::Keyspace;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn print_help() {
    println!(
        r#"
LayerKV - An In-Memory Key-Value Server with Nested Transactions

USAGE:
    layerkv [OPTIONS]

OPTIONS:
    -h, --host <HOST>    Host to bind to (default: 127.0.0.1)
    -p, --port <PORT>    Port to listen on (default: 6789)
    -v, --version        Print version information
        --help           Print this help message

EXAMPLES:
    layerkv                        # Start on 127.0.0.1:6789
    layerkv --port 7000            # Start on port 7000
    layerkv --host 0.0.0.0         # Listen on all interfaces

CONNECTING:
    Any line-oriented client works, for example netcat:
    $ nc 127.0.0.1 6789
    set name Ariz
    OK
    begin
    transaction started
    lpush queue a b c
    OK
    lrange queue 0 -1
    [a b c]
    commit
    transaction committed
"#
    );
}

fn print_banner(config: &ServerConfig) {
    println!(
        r#"
 _                          _  ____     __
| |    __ _ _   _  ___ _ __| |/ /\ \   / /
| |   / _` | | | |/ _ \ '__| ' /  \ \ / /
| |__| (_| | |_| |  __/ |  | . \   \ V /
|_____\__,_|\__, |\___|_|  |_|\_\   \_/
            |___/

LayerKV v{} - In-Memory Key-Value Server
──────────────────────────────────────────────────────────────
Server started on {}
Ready to accept connections.

Use Ctrl+C to shutdown gracefully.
"#,
        layerkv::VERSION,
        config.bind_address()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = match ServerConfig::from_args(std::env::args().skip(1)) {
        Ok(CliAction::Serve(config)) => config,
        Ok(CliAction::PrintHelp) => {
            print_help();
            return Ok(());
        }
        Ok(CliAction::PrintVersion) => {
            println!("LayerKV version {}", layerkv::VERSION);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    // Set up logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // Print the banner
    print_banner(&config);

    // Create the root keyspace (shared across all connections)
    let root = Arc::new(Keyspace::new());
    info!("Root keyspace initialized");

    // Create connection statistics
    let stats = Arc::new(ConnectionStats::new());

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", config.bind_address());

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, stopping server...");
    };

    // Main accept loop
    tokio::select! {
        _ = accept_loop(listener, Arc::clone(&root), Arc::clone(&stats)) => {}
        _ = shutdown => {}
    }

    info!(
        keys = root.len(),
        connections = stats
            .connections_accepted
            .load(std::sync::atomic::Ordering::Relaxed),
        "Server shutdown complete"
    );
    Ok(())
}

/// Main loop that accepts incoming connections
async fn accept_loop(listener: TcpListener, root: Arc<Keyspace>, stats: Arc<ConnectionStats>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                // Each connection gets its own transaction stack over the shared root
                let handler = CommandHandler::new(Arc::clone(&root));
                let stats = Arc::clone(&stats);

                // Spawn a task to handle this connection
                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
