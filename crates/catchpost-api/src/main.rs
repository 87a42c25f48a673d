//! Catchpost CLI and webhook server entry point.
//!
//! Binary name: `catchpost`
//!
//! Loads `.env` and the configuration, initializes tracing, then either
//! starts the webhook server or runs a draft management command.

mod cli;
mod dispatch;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use catchpost_infra::config::{apply_env_overrides, data_dir, load_app_config};
use catchpost_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_directive};

use cli::{Cli, Commands, DraftsCommand};
use state::{AppState, open_store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(verbosity_directive(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "catchpost", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = data_dir();
    let mut config = load_app_config(&data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    let result = run(cli, config, &data_dir).await;
    shutdown_tracing();
    result
}

async fn run(
    cli: Cli,
    config: catchpost_types::config::AppConfig,
    data_dir: &std::path::Path,
) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState::init(&config, data_dir).await?;

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            tracing::info!(%addr, "Webhook server listening");
            if !cli.quiet && !cli.json {
                println!(
                    "  {} Catchpost listening on {}",
                    console::style("🎣").bold(),
                    console::style(format!("http://{addr}/webhook")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Webhook server stopped");
        }

        Commands::Drafts { action } => {
            let store = open_store(&config, data_dir).await?;
            match action {
                DraftsCommand::List => cli::drafts::list_drafts(&store, cli.json).await?,
                DraftsCommand::Show { user_id } => {
                    cli::drafts::show_draft(&store, user_id, cli.json).await?
                }
                DraftsCommand::Delete { user_id } => {
                    cli::drafts::delete_draft(&store, user_id, cli.json).await?
                }
            }
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
