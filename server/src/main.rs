use anyhow::{Context, Result};
use clap::Parser;
use diceroller_server::{Api, Server, ServerConfig, DEFAULT_STATE_PATH};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

fn init_tracing(level: tracing::Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host interface to bind (default: localhost).
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Path of the JSON snapshot used by save/load.
    #[arg(long, default_value = DEFAULT_STATE_PATH)]
    state_path: PathBuf,

    /// Save the snapshot after every roll and reset.
    #[arg(long, default_value_t = false)]
    autosave: bool,

    /// Start from a fresh state instead of loading the snapshot.
    #[arg(long, default_value_t = false)]
    no_restore: bool,

    /// Seed for repeatable dice (optional).
    #[arg(long)]
    dice_seed: Option<u64>,

    /// Max request body size in bytes (0 disables limit).
    #[arg(long)]
    http_body_limit_bytes: Option<usize>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

/// Maps an optional arg value to Option: 0 => None, Some(v) => Some(v), None => default
fn map_optional_limit(arg: Option<usize>, default: Option<usize>) -> Option<usize> {
    match arg {
        Some(0) => None,
        Some(v) => Some(v),
        None => default,
    }
}

fn build_config(args: &Args) -> Result<ServerConfig> {
    let defaults = ServerConfig::default();
    if args.port == 0 {
        anyhow::bail!("port must be > 0");
    }
    if args.state_path.as_os_str().is_empty() {
        anyhow::bail!("state_path must not be empty");
    }

    Ok(ServerConfig {
        host: args.host,
        port: args.port,
        state_path: args.state_path.clone(),
        autosave: args.autosave,
        restore_on_start: !args.no_restore,
        dice_seed: args.dice_seed.or(defaults.dice_seed),
        http_body_limit_bytes: map_optional_limit(
            args.http_body_limit_bytes,
            defaults.http_body_limit_bytes,
        ),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level);
    let config = build_config(&args)?;
    let addr = config.listen_addr();

    let server = Arc::new(Server::new(config));
    if server.config.restore_on_start {
        match server.load().await {
            Ok(state) => info!(
                total_rolls = state.total_rolls,
                rounds = state.rounds,
                "restored game state"
            ),
            Err(err) => warn!(%err, "failed to restore game state; starting fresh"),
        }
    }

    let app = Api::new(server.clone()).router();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        %addr,
        state_path = %server.config.state_path.display(),
        autosave = server.config.autosave,
        "dice roller listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("dice roller stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to install CTRL+C signal handler");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::parse_from(["diceroller-server"]);
        let config = build_config(&args).expect("config should parse");
        assert_eq!(config.port, 5000);
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_PATH));
        assert!(config.restore_on_start);
        assert!(!config.autosave);
        assert_eq!(config.dice_seed, None);
        assert_eq!(config.http_body_limit_bytes, Some(16 * 1024));
        assert_eq!(args.log_level, tracing::Level::INFO);
    }

    #[test]
    fn parses_persistence_flags() {
        let args = Args::parse_from([
            "diceroller-server",
            "--state-path",
            "/tmp/dice.json",
            "--autosave",
            "--no-restore",
            "--dice-seed",
            "7",
            "--http-body-limit-bytes",
            "0",
            "--log-level",
            "debug",
        ]);
        let config = build_config(&args).expect("config should parse");
        assert_eq!(config.state_path, PathBuf::from("/tmp/dice.json"));
        assert!(config.autosave);
        assert!(!config.restore_on_start);
        assert_eq!(config.dice_seed, Some(7));
        assert_eq!(config.http_body_limit_bytes, None);
        assert_eq!(args.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn rejects_zero_port() {
        let args = Args::parse_from(["diceroller-server", "--port", "0"]);
        let err = build_config(&args).unwrap_err();
        assert!(err.to_string().contains("port"), "unexpected error: {err}");
    }
}
