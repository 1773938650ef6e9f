use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinyserve::{routes, AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "tinyserve")]
#[command(about = "Tiny web server for sharing a folder")]
#[command(version)]
struct Cli {
    /// Address to bind to (host:port)
    #[arg(short, long, env = "TINYSERVE_BIND", default_value = "0.0.0.0:8091")]
    bind: SocketAddr,

    /// Root directory to serve files from (defaults to the current directory)
    #[arg(short, long, env = "TINYSERVE_ROOT")]
    root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, env = "TINYSERVE_VERBOSE")]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, env = "TINYSERVE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "tinyserve=debug,tower_http=debug"
    } else {
        "tinyserve=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    if !root.exists() {
        return Err(format!("Root directory does not exist: {}", root.display()).into());
    }

    if !root.is_dir() {
        return Err(format!("Root path is not a directory: {}", root.display()).into());
    }

    let root_dir = root.canonicalize()?;

    let state = AppState::with_config(root_dir, config)?;
    let app = routes::router(state.clone());

    info!("Publishing folder {} on {}", state.root_dir.display(), cli.bind);

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
