use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use gridops_triage::services::demo_seed::ensure_demo_cases;
use gridops_triage::services::repository::InMemoryRepository;
use gridops_triage::{cli, config, openapi, routes, state};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

async fn bind_listener(addr: &str) -> Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Failed to bind gridops-triage listener on {addr}: port already in use. Stop the other service using this port or re-run with --port to choose another port.",
            );
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to bind gridops-triage listener on {addr}"))
        }
    }
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(origins))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    if args.print_openapi {
        println!(
            "{}",
            serde_json::to_string_pretty(&openapi::openapi_json())?
        );
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,gridops_triage=info")),
        )
        .init();

    let config = config::TriageConfig::from_env()?;

    if let Some(path) = args.triage_file.as_deref() {
        let threshold = args
            .threshold
            .map(|value| value.clamp(0.0, 1.0))
            .unwrap_or(config.confidence_threshold);
        println!("{}", cli::triage_file(path, args.mode, threshold)?);
        return Ok(());
    }

    let repo = Arc::new(InMemoryRepository::new());
    if config.seed_on_start {
        ensure_demo_cases(repo.as_ref(), &config).context("failed to load demo seed")?;
    }

    let cors = cors_layer(&config.cors_origins)?;
    let state = state::AppState {
        config: config.clone(),
        repo,
    };
    let app = routes::router(state).layer(cors);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = bind_listener(&addr).await?;
    tracing::info!(
        %addr,
        confidence_threshold = config.confidence_threshold,
        "gridops-triage listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
