// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use cert_manager_webhook_wedos::{
    constants::TOKIO_WORKER_THREADS, errors::ServerError, options::Options,
    server::WebhookServer, solver::Solver, wedos_solver::WedosSolver,
};
use clap::Parser;
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    // Exits before anything else when GROUP_NAME is missing
    let options = Options::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("wedos-webhook")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(options))
}

async fn async_main(options: Options) -> Result<()> {
    // Initialize logging with custom format
    // Format: timestamp file:line LEVEL message
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Example: RUST_LOG=debug cargo run
    //
    // Respects RUST_LOG_FORMAT environment variable for output format
    // Example: RUST_LOG_FORMAT=json cargo run
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!(group = %options.group_name, "Starting WEDOS cert-manager webhook");

    // rustls needs an explicit provider when more than one is compiled in
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let (stop_tx, stop_rx) = watch::channel(false);

    debug!("Inferring Kubernetes client configuration");
    let kube_config = kube::Config::infer().await?;

    let mut solver = WedosSolver::new(options.wedos_defaults());
    solver.initialize(kube_config, stop_rx.clone()).await?;

    let server = WebhookServer::new(options.group_name.clone(), solver);
    let server_task =
        tokio::spawn(server.run(options.listen_address(), options.tls_files(), stop_rx));

    supervise(server_task, shutdown_signal(), stop_tx).await
}

/// Run until `shutdown` resolves, then stop the server and wait for it.
///
/// The server finishing on its own is always an error, even with `Ok(())`.
async fn supervise(
    mut server_task: JoinHandle<Result<(), ServerError>>,
    shutdown: impl Future<Output = Result<()>>,
    stop_tx: watch::Sender<bool>,
) -> Result<()> {
    let result = tokio::select! {
        result = &mut server_task => {
            error!("CRITICAL: webhook server exited unexpectedly: {:?}", result);
            result??;
            anyhow::bail!("Webhook server exited unexpectedly without error")
        }
        signal = shutdown => {
            signal?;
            info!("Shutdown signal received, stopping webhook server");
            let _ = stop_tx.send(true);
            server_task.await?
        }
    };

    result.map_err(|e| {
        error!(error = %e, "Webhook server failed");
        e.into()
    })
}

/// Wait for SIGTERM (Kubernetes pod termination) or Ctrl+C.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            _ = sigterm.recv() => {}
            result = tokio::signal::ctrl_c() => result?,
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
