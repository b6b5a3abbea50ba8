use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use inventoryd::{Config, Inventory};

/// Host and service inventory daemon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional TOML config file
    #[arg(long, env = "INVENTORY_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP listen address, overrides the config file
    #[arg(long = "http.addr", visible_alias = "http-addr", env = "INVENTORY_HTTP_ADDR")]
    http_addr: Option<String>,

    /// Output logs as JSON
    #[arg(long, env = "INVENTORY_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(addr) = args.http_addr {
        config.api.listen = addr;
    }
    if args.log_json {
        config.log.json = true;
    }

    init_logging(&config);

    tracing::info!("Starting inventoryd");

    let inventory = Inventory::in_memory();
    let app = inventoryd::router(&inventory);

    let addr = config.api.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(transport = "HTTP", addr = %addr, "API listening");

    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
    });

    tokio::select! {
        signal = shutdown_signal() => {
            let signal = signal?;
            tracing::info!(exit = signal, "Shutdown signal received");
            cancel.cancel();
            server
                .await
                .context("Server task panicked")?
                .context("Server error during shutdown")?;
        }
        result = &mut server => {
            let result = result.context("Server task panicked")?;
            if let Err(e) = &result {
                tracing::error!(exit = %e, "Listener failed");
            }
            result.context("Server error")?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));

    if config.log.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

/// Resolves with the name of the first terminating signal received
async fn shutdown_signal() -> Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())
            .context("Failed to create SIGTERM handler")?;
        let mut sigint = signal(SignalKind::interrupt())
            .context("Failed to create SIGINT handler")?;

        tokio::select! {
            _ = sigterm.recv() => Ok("SIGTERM"),
            _ = sigint.recv() => Ok("SIGINT"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for ctrl-c")?;
        Ok("SIGINT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_addr_flag_spellings() {
        let args = Args::try_parse_from(["inventoryd", "--http.addr", ":9090"]).unwrap();
        assert_eq!(args.http_addr.as_deref(), Some(":9090"));

        let args = Args::try_parse_from(["inventoryd", "--http-addr=127.0.0.1:9091"]).unwrap();
        assert_eq!(args.http_addr.as_deref(), Some("127.0.0.1:9091"));
        assert!(!args.log_json);
    }
}
