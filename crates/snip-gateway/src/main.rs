mod cli;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use snip_core::{EventRecorder, Level, LogEvent, Package, Validity};
use snip_gateway::{App, AppState};
use snip_generator::UuidGenerator;
use snip_shortener::{MappingService, MappingSettings};
use snip_storage::InMemoryRepository;
use snip_telemetry::{init_tracing, RemoteConfig, RemoteRecorder, TracingRecorder};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format.into(), "info").context("failed to install tracing")?;

    let (recorder, worker) = build_recorder(&config)?;
    install_panic_hook(Arc::clone(&recorder));

    let base_url = config.public_base_url();
    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %base_url,
        default_validity_minutes = config.default_validity_minutes,
        remote_logging = config.log_endpoint.is_some(),
        "starting snip"
    );

    let repository = Arc::new(InMemoryRepository::with_recorder(Arc::clone(&recorder)));
    let settings = MappingSettings::builder()
        .max_generate_attempts(config.max_generate_attempts)
        .build();
    let service = MappingService::new(
        repository,
        UuidGenerator::with_recorder(Arc::clone(&recorder)),
    )
    .with_recorder(Arc::clone(&recorder))
    .with_settings(settings);

    let state = AppState::new(Arc::new(service), base_url.clone())
        .with_recorder(Arc::clone(&recorder))
        .with_default_validity(Validity::from_minutes(config.default_validity_minutes)?);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    let local_addr = listener.local_addr()?;

    recorder.record(LogEvent::backend(
        Level::Info,
        Package::Service,
        format!("URL Shortener Microservice running on {local_addr}"),
    ));
    recorder.record(LogEvent::backend(
        Level::Info,
        Package::Service,
        format!("Short links are served under {base_url}"),
    ));

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&recorder)))
        .await
        .context("server error")?;

    recorder.record(LogEvent::backend(
        Level::Info,
        Package::Service,
        "Server shutdown complete",
    ));

    // The panic hook holds the last extra handle; the worker drains once it goes.
    let _ = std::panic::take_hook();
    drop(recorder);
    if let Some(worker) = worker {
        if tokio::time::timeout(Duration::from_secs(5), worker).await.is_err() {
            warn!("remote log worker did not drain in time");
        }
    }

    Ok(())
}

fn build_recorder(config: &CLI) -> anyhow::Result<(Arc<dyn EventRecorder>, Option<JoinHandle<()>>)> {
    match &config.log_endpoint {
        Some(endpoint) => {
            let remote = RemoteConfig::new(endpoint.clone()).with_token(config.log_token.clone());
            let (recorder, worker) =
                RemoteRecorder::spawn(remote).context("failed to start remote logging")?;
            Ok((Arc::new(recorder), Some(worker)))
        }
        None => Ok((Arc::new(TracingRecorder), None)),
    }
}

fn install_panic_hook(recorder: Arc<dyn EventRecorder>) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        recorder.record(LogEvent::backend(
            Level::Fatal,
            Package::Service,
            format!("Unhandled panic: {info}"),
        ));
        default_hook(info);
    }));
}

async fn shutdown_signal(recorder: Arc<dyn EventRecorder>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
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
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };

    recorder.record(LogEvent::backend(
        Level::Info,
        Package::Service,
        format!("{signal} received, shutting down gracefully"),
    ));
}
