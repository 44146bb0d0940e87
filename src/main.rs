// Main entry point for the photo-enhancer server.
// Parses configuration, constructs the engine provider and enhancement
// service, configures the Axum router, and starts the HTTP server.

use clap::{Parser, ValueEnum};
use photo_enhancer::{
    config::{EnhancementConfig, parse_background_flag},
    engine::{EngineProvider, default_factory},
    service::EnhancementService,
    web::{AppState, create_app},
};
use socket2::{Domain, Protocol, Socket, Type};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::Level;

/// Command line arguments for the photo-enhancer server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// If this option is specified without value, it will default to "*", meaning the server will listen on all interfaces.
    #[arg(long, env = "ENHANCER_SERVER_HOST", default_value = "localhost", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "ENHANCER_SERVER_PORT", default_value_t = 8095)]
    port: u16,

    /// Default restoration method for requests that do not specify one.
    #[arg(long, env = "METHOD", default_value = "gfpgan")]
    method: String,

    /// Default background enhancement flag ("true" or "false").
    #[arg(long, env = "BACKGROUND_ENHANCEMENT", default_value = "true")]
    background_enhancement: String,

    /// Engine ownership strategy: one shared engine reused across requests,
    /// or a fresh engine constructed per request.
    #[arg(long, env = "ENHANCER_ENGINE_MODE", value_enum, default_value = "shared")]
    engine_mode: EngineMode,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EngineMode {
    Shared,
    PerRequest,
}

#[tokio::main]
async fn main() {
    // Parse command line args and environment variables
    let config = AppConfig::parse();

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    tracing::info!("Starting photo-enhancer server...");

    // --- Build the default enhancement configuration from the environment ---
    // Invalid startup configuration is fatal: the shared engine would be
    // bound to it for the lifetime of the process.
    let background_enhancement = parse_background_flag(&config.background_enhancement)
        .unwrap_or_else(|err| {
            tracing::error!("FATAL: Invalid BACKGROUND_ENHANCEMENT value: {}", err);
            eprintln!("FATAL: {}. Exiting.", err);
            std::process::exit(1);
        });
    let defaults = EnhancementConfig::validate(&config.method, background_enhancement, 2)
        .unwrap_or_else(|err| {
            tracing::error!("FATAL: Invalid METHOD value: {}", err);
            eprintln!("FATAL: {}. Exiting.", err);
            std::process::exit(1);
        });
    tracing::info!(
        "Service defaults: method={}, background_enhancement={}, upscale={}",
        defaults.method(),
        defaults.background_enhancement(),
        defaults.upscale().factor()
    );

    // --- Initialize the engine provider ---
    let provider = match config.engine_mode {
        EngineMode::Shared => EngineProvider::shared(default_factory(), &defaults)
            .unwrap_or_else(|err| {
                tracing::error!("FATAL: Failed to construct the shared engine: {}", err);
                eprintln!("FATAL: Engine initialization failed. See logs for details. Exiting.");
                std::process::exit(1);
            }),
        EngineMode::PerRequest => EngineProvider::per_request(default_factory()),
    };
    tracing::info!("Engine provider initialized ({:?} mode).", config.engine_mode);

    let state = AppState {
        service: Arc::new(EnhancementService::new(provider)),
        defaults,
    };

    // --- Build Axum Application Router ---
    let app = create_app(state);
    tracing::info!("Axum router configured.");

    // --- Start HTTP Server ---
    let listener = match create_listener(&config.host, config.port).await {
        Ok((addr, l)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("FATAL: Failed to bind server: {}", e);
            eprintln!("FATAL: Could not bind server. Error: {}. Exiting.", e);
            std::process::exit(1);
        }
    };

    // Run the server.
    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", e);
        eprintln!("ERROR: Server shut down unexpectedly. Error: {}", e);
    }

    tracing::info!("photo-enhancer server has shut down.");
}

async fn create_listener(
    host: &str,
    port: u16,
) -> std::io::Result<(String, tokio::net::TcpListener)> {
    if host == "*" {
        return create_wildcard_listener(port);
    }

    let addr = format!("{}:{}", host, port);
    tracing::info!("Attempting to bind server to {}...", addr);

    let tokio_listener = tokio::net::TcpListener::bind(&addr).await?;

    Ok((addr, tokio_listener))
}

// Wildcard binding: IPv6 dual-stack where available, plain IPv4 otherwise.
fn create_wildcard_listener(port: u16) -> std::io::Result<(String, tokio::net::TcpListener)> {
    match bind_wildcard(port, Domain::IPV6) {
        Ok(ok) => Ok(ok),
        Err(_) => {
            tracing::warn!("Failed to bind IPv6 listener. Attempting IPv4 only.");
            bind_wildcard(port, Domain::IPV4)
        }
    }
}

fn bind_wildcard(port: u16, domain: Domain) -> std::io::Result<(String, tokio::net::TcpListener)> {
    let str_addr = if domain == Domain::IPV6 {
        format!("[::]:{}", port)
    } else {
        format!("0.0.0.0:{}", port)
    };
    let addr: SocketAddr = str_addr.parse().unwrap();

    tracing::info!("Attempting to bind server to {}...", str_addr);

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    if domain == Domain::IPV6 {
        if let Err(e) = socket.set_only_v6(false) {
            tracing::warn!(
                "Failed to set dual-stack mode for IPv6 socket: {}. Continuing anyway.",
                e
            );
        }
    }

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;

    // Make it non-blocking for tokio
    socket.set_nonblocking(true)?;

    let std_listener: std::net::TcpListener = socket.into();
    let tokio_listener = tokio::net::TcpListener::from_std(std_listener)?;

    Ok((str_addr, tokio_listener))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
