//! Tokio / Axum entry-point for the Postboard server.
use anyhow::Context;
use backend_lib::{config::Settings, router, storage::FlatFileStorage, AppState};
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "postboard", about = "Postboard feed server", version)]
struct Args {
    /// TOML config file (default: postboard.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the config
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Directory holding users, posts and sessions, overrides the config
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

fn init_tracing(settings: &Settings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    if let Some(data_dir) = args.data_dir {
        settings.data_dir = data_dir;
    }

    init_tracing(&settings);

    let storage = FlatFileStorage::new(&settings.data_dir).with_context(|| {
        format!("failed to open data directory {}", settings.data_dir.display())
    })?;

    let state = Arc::new(AppState::new(storage, &settings)?);
    let app = router::create_router(state);

    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    tracing::info!(
        addr = %settings.bind_addr,
        environment = settings.environment.as_str(),
        data_dir = %settings.data_dir.display(),
        "postboard listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
