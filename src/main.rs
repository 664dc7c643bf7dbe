use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qiita_zenn_export::config::Config;
use qiita_zenn_export::snapshot::Snapshot;
use qiita_zenn_export::{qiita, zenn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(user = %config.user, "Configuration loaded");

    let command = std::env::args().nth(1).unwrap_or_else(|| "all".to_string());
    match command.as_str() {
        "fetch" => fetch(&config).await,
        "export" => export(&config).await,
        "all" => {
            fetch(&config).await?;
            export(&config).await
        }
        other => anyhow::bail!("unknown command {other:?} (expected fetch, export or all)"),
    }
}

/// Collect every page of the user's listing and write the snapshot.
async fn fetch(config: &Config) -> Result<()> {
    let client = qiita::build_client()?;
    let posts = qiita::fetch_all_posts(&client, config).await?;
    info!(count = posts.len(), "Listing fetched");

    let snapshot = Snapshot::new(posts);
    snapshot.save(&config.snapshot_path).await?;
    info!(path = %config.snapshot_path.display(), "Snapshot written");

    Ok(())
}

/// Render the snapshot into one article file per post.
async fn export(config: &Config) -> Result<()> {
    let snapshot = Snapshot::load(&config.snapshot_path).await?;
    info!(count = snapshot.list.len(), "Snapshot loaded");

    let written = zenn::export_articles(&snapshot, &config.articles_dir).await?;
    info!(written, dir = %config.articles_dir.display(), "Articles exported");

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,qiita_zenn_export=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
