//! Adapter wiring and the top-level run loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use portsync_config::{Settings, load_settings, load_settings_with};
use portsync_core::{
    FilePortSource, PortSource, Reconciler, RunMode, RunReport, Scheduler, TorrentClient,
    shutdown_channel,
};
use portsync_gluetun::GluetunPortSource;
use portsync_qbittorrent::{Credentials, QbittorrentClient};
use portsync_telemetry::{GlobalContextGuard, LoggingConfig, init_logging};
use reqwest::Client;
use tokio::sync::watch;
use tracing::{error, info};

use crate::cli::Cli;
use crate::error::{AppError, AppResult, EXIT_STARTUP};
use crate::signals::spawn_signal_listener;

const USER_AGENT: &str = concat!("portsync/", env!("CARGO_PKG_VERSION"));

/// Everything needed to run reconciliation, resolved from flags and configuration.
#[derive(Debug, Clone)]
pub struct BootstrapDependencies {
    settings: Settings,
    port_file: Option<PathBuf>,
    mode: RunMode,
    timeout: Duration,
}

impl BootstrapDependencies {
    /// Resolve dependencies from flags, the config file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if configuration cannot be loaded.
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        let settings =
            load_settings(&cli.config).map_err(|err| AppError::config("config.load", err))?;
        Ok(Self::new(cli, settings))
    }

    /// Resolve dependencies using `env` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if configuration cannot be loaded.
    pub fn from_cli_with<F>(cli: &Cli, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = load_settings_with(&cli.config, env)
            .map_err(|err| AppError::config("config.load", err))?;
        Ok(Self::new(cli, settings))
    }

    fn new(cli: &Cli, settings: Settings) -> Self {
        let mode = if cli.once {
            RunMode::Once
        } else {
            RunMode::Continuous {
                interval: cli.interval(),
            }
        };
        Self {
            settings,
            port_file: cli.port_file.clone(),
            mode,
            timeout: cli.timeout(),
        }
    }

    /// Resolved endpoint settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolved run mode.
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        self.mode
    }

    /// Build the reconciler: qBittorrent plus either the port file or Gluetun.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or either adapter cannot be built.
    pub fn reconciler(&self) -> AppResult<Reconciler> {
        let http = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| AppError::HttpClient { source })?;

        let qbittorrent = &self.settings.qbittorrent;
        let client: Arc<dyn TorrentClient> = Arc::new(
            QbittorrentClient::new(
                http.clone(),
                &qbittorrent.origin(),
                Credentials::new(qbittorrent.username.clone(), qbittorrent.password.clone()),
            )
            .map_err(|source| AppError::Qbittorrent { source })?,
        );

        let source: Arc<dyn PortSource> = match &self.port_file {
            Some(path) => Arc::new(FilePortSource::new(path.clone())),
            None => Arc::new(
                GluetunPortSource::new(http, &self.settings.gluetun.origin())
                    .map_err(|source| AppError::Gluetun { source })?,
            ),
        };

        Ok(Reconciler::new(source, client))
    }
}

/// Entry point for the binary: parse flags, install logging, run until done.
///
/// Returns the process exit code: `0` on success, `2` for configuration or
/// startup failures, `3` when a single-shot cycle fails.
pub async fn run_app() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig::new(cli.log_level.as_str(), cli.log_format);
    if let Err(err) = init_logging(&logging) {
        eprintln!("error: {}", AppError::telemetry("telemetry.init", err).report());
        return EXIT_STARTUP;
    }
    let _context = GlobalContextGuard::new(cli.mode_label());

    let (sender, receiver) = shutdown_channel();
    let signals = spawn_signal_listener(sender);

    let result = match BootstrapDependencies::from_cli(&cli) {
        Ok(dependencies) => run_with(dependencies, receiver).await.map(|_| ()),
        Err(err) => Err(err),
    };
    signals.abort();

    match result {
        Ok(()) => 0,
        Err(err) => {
            let exit_code = err.exit_code();
            error!(exit_code, error = %err.report(), "portsync exiting");
            exit_code
        }
    }
}

/// Run reconciliation with injected dependencies until the mode completes or
/// `shutdown` flips to `true`.
///
/// # Errors
///
/// Returns a startup error if adapters cannot be built, or
/// [`AppError::Sync`] when a single-shot cycle fails. Continuous-mode cycle
/// failures are logged and retried, never returned.
pub async fn run_with(
    dependencies: BootstrapDependencies,
    shutdown: watch::Receiver<bool>,
) -> AppResult<RunReport> {
    let reconciler = dependencies.reconciler()?;
    let scheduler = match dependencies.mode {
        RunMode::Once => Scheduler::once(),
        RunMode::Continuous { interval } => Scheduler::every(interval),
    };

    info!(
        qbittorrent = %dependencies.settings.qbittorrent.origin(),
        source = %reconciler.source_label(),
        timeout_secs = dependencies.timeout.as_secs(),
        "portsync starting"
    );

    let mut report = scheduler.run(&reconciler, shutdown).await;
    if matches!(scheduler.mode(), RunMode::Once)
        && let Some(source) = report.last_error.take()
    {
        return Err(AppError::Sync { source });
    }
    Ok(report)
}
