// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cloudkit::{
    actuator::{Actuator, InMemoryActuator},
    constants::{
        DEFAULT_ERROR_REQUEUE_SECS, DEFAULT_METRICS_ADDR, DEFAULT_RESYNC_INTERVAL_SECS,
        TOKIO_WORKER_THREADS,
    },
    controller::{run_dnsrecord_controller, run_dnszone_controller, ControllerConfig},
    crd::{DNSRecord, DNSZone},
    scheme::{add_to_scheme, Scheme},
    server,
};
use kube::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Compact human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Controllers that can be enabled
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ControllerKind {
    /// `DNSZone` controller
    Zone,
    /// `DNSRecord` controller
    Record,
}

/// Finalizer-driven DNS zone and record controller
#[derive(Parser, Debug)]
#[command(name = "cloudkit", version, about)]
struct Cli {
    /// Log format; falls back to `RUST_LOG_FORMAT`, then `text`
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Controllers to run
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [ControllerKind::Zone, ControllerKind::Record])]
    controllers: Vec<ControllerKind>,

    /// Watch a single namespace instead of the whole cluster
    #[arg(long)]
    namespace: Option<String>,

    /// Requeue converged resources after this many seconds (0 waits for changes)
    #[arg(long, default_value_t = DEFAULT_RESYNC_INTERVAL_SECS)]
    resync_interval_secs: u64,

    /// Requeue failed resources after this many seconds
    #[arg(long, default_value_t = DEFAULT_ERROR_REQUEUE_SECS)]
    error_requeue_secs: u64,

    /// Listen address for `/metrics` and `/healthz`
    #[arg(long, default_value = DEFAULT_METRICS_ADDR)]
    metrics_addr: SocketAddr,

    /// Install or update the CRDs with server-side apply before starting
    #[arg(long)]
    install_crds: bool,

    /// Print the CRD manifests as YAML and exit
    #[arg(long)]
    crd: bool,
}

impl Cli {
    fn runs(&self, kind: ControllerKind) -> bool {
        self.controllers.contains(&kind)
    }

    fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            namespace: self.namespace.clone(),
            resync_interval: (self.resync_interval_secs > 0)
                .then(|| Duration::from_secs(self.resync_interval_secs)),
            error_requeue: Duration::from_secs(self.error_requeue_secs),
        }
    }

    fn resolved_log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(|| {
            match std::env::var("RUST_LOG_FORMAT")
                .map(|v| v.to_lowercase())
                .as_deref()
            {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Text,
            }
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut scheme = Scheme::new();
    add_to_scheme(&mut scheme);

    if cli.crd {
        print!("{}", scheme.to_yaml()?);
        return Ok(());
    }

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("cloudkit-controller")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli, scheme))
}

fn init_tracing(format: LogFormat) {
    // Respects RUST_LOG if set, otherwise defaults to INFO level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        LogFormat::Text => {
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
}

async fn async_main(cli: Cli, scheme: Scheme) -> Result<()> {
    init_tracing(cli.resolved_log_format());

    info!("Starting cloudkit DNS controller");
    debug!("Registered kinds: {:?}", scheme.names());

    debug!("Initializing Kubernetes client");
    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    debug!("Kubernetes client initialized successfully");

    if cli.install_crds {
        scheme.install(&client).await?;
    }

    let config = cli.controller_config();

    // No provider is compiled in; the in-memory actuator runs the lifecycle dry.
    warn!("Using the in-memory actuator; no external DNS provider will be changed");
    let zone_actuator: Arc<dyn Actuator<DNSZone>> = Arc::new(InMemoryActuator::<DNSZone>::new());
    let record_actuator: Arc<dyn Actuator<DNSRecord>> =
        Arc::new(InMemoryActuator::<DNSRecord>::new());

    info!(
        controllers = ?cli.controllers,
        namespace = config.namespace.as_deref().unwrap_or("<all>"),
        "Starting controllers"
    );

    // Controllers should never exit - if one does, log it and exit the process
    tokio::select! {
        result = run_dnszone_controller(client.clone(), zone_actuator, config.clone()),
            if cli.runs(ControllerKind::Zone) =>
        {
            error!("CRITICAL: DNSZone controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("DNSZone controller exited unexpectedly without error")
        }
        result = run_dnsrecord_controller(client.clone(), record_actuator, config.clone()),
            if cli.runs(ControllerKind::Record) =>
        {
            error!("CRITICAL: DNSRecord controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("DNSRecord controller exited unexpectedly without error")
        }
        result = server::serve(cli.metrics_addr) => {
            error!("CRITICAL: Metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("Metrics server exited unexpectedly without error")
        }
        signal = shutdown_signal() => {
            info!("Received {}, shutting down", signal?);
            Ok(())
        }
    }
}

/// Wait for SIGINT or, on Unix, SIGTERM. Returns the signal name.
async fn shutdown_signal() -> Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for SIGINT")?;
                Ok("SIGINT")
            }
            _ = sigterm.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl+C")?;
        Ok("Ctrl+C")
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod main_tests;
