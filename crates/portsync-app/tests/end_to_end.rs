//! End-to-end runs of the application wiring against mock servers.

use std::time::Duration;

use clap::Parser;
use portsync_app::{AppError, BootstrapDependencies, Cli, run_with};
use portsync_core::{SyncError, shutdown_channel};
use portsync_test_support::fixtures::{TempFile, port_file};
use portsync_test_support::mocks::{
    GluetunMock, PASSWORD, QbittorrentMock, USERNAME, config_yaml,
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn dependencies(config: &TempFile, extra: &[&str]) -> anyhow::Result<BootstrapDependencies> {
    let config_path = config.path().to_string_lossy().into_owned();
    let mut argv = vec!["portsync", "-f", config_path.as_str(), "--timeout", "5"];
    argv.extend_from_slice(extra);
    let cli = Cli::try_parse_from(argv)?;
    Ok(BootstrapDependencies::from_cli_with(&cli, no_env)?)
}

#[tokio::test]
async fn gluetun_port_is_pushed_to_qbittorrent() -> anyhow::Result<()> {
    let qbittorrent = QbittorrentMock::start().await;
    let gluetun = GluetunMock::start().await;
    let login = qbittorrent.accept_login();
    let preferences = qbittorrent.serve_listen_port(6881);
    let update = qbittorrent.expect_update(51_413);
    let forwarded = gluetun.serve_forwarded_port(51_413);

    let config = TempFile::with_contents("config.yaml", &config_yaml(&qbittorrent, &gluetun))?;
    let (_sender, receiver) = shutdown_channel();
    let report = run_with(dependencies(&config, &["--once"])?, receiver).await?;

    assert_eq!(report.cycles, 1);
    assert_eq!(report.updates, 1);
    login.assert();
    forwarded.assert();
    preferences.assert();
    update.assert();
    Ok(())
}

#[tokio::test]
async fn matching_port_from_file_needs_no_update() -> anyhow::Result<()> {
    let qbittorrent = QbittorrentMock::start().await;
    let gluetun = GluetunMock::start().await;
    let login = qbittorrent.accept_login();
    let preferences = qbittorrent.serve_listen_port(51_413);

    let config = TempFile::with_contents("config.yaml", &config_yaml(&qbittorrent, &gluetun))?;
    let forwarded = port_file("51413\n")?;
    let forwarded_path = forwarded.path().to_string_lossy().into_owned();
    let (_sender, receiver) = shutdown_channel();
    let report = run_with(
        dependencies(&config, &["--once", "-i", forwarded_path.as_str()])?,
        receiver,
    )
    .await?;

    assert_eq!(report.cycles, 1);
    assert_eq!(report.updates, 0);
    assert!(report.succeeded());
    login.assert();
    preferences.assert();
    Ok(())
}

#[tokio::test]
async fn missing_config_file_falls_back_to_environment() -> anyhow::Result<()> {
    let qbittorrent = QbittorrentMock::start().await;
    let gluetun = GluetunMock::start().await;
    let login = qbittorrent.accept_login();
    let preferences = qbittorrent.serve_listen_port(6881);
    let update = qbittorrent.expect_update(40_000);
    let forwarded = gluetun.serve_forwarded_port(40_000);

    let config = TempFile::missing("config.yaml")?;
    let config_path = config.path().to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["portsync", "-f", config_path.as_str(), "--once"])?;
    let qbittorrent_port = qbittorrent.port().to_string();
    let gluetun_port = gluetun.port().to_string();
    let env = |name: &str| match name {
        "QBITTORRENT_USER" => Some(USERNAME.to_string()),
        "QBITTORRENT_PASS" => Some(PASSWORD.to_string()),
        "QBITTORRENT_SERVER" => Some(qbittorrent.host()),
        "QBITTORRENT_PORT" => Some(qbittorrent_port.clone()),
        "GLUETUN_SERVER" => Some(gluetun.host()),
        "GLUETUN_PORT" => Some(gluetun_port.clone()),
        _ => None,
    };
    let dependencies = BootstrapDependencies::from_cli_with(&cli, env)?;
    assert!(!config.path().exists());
    assert_eq!(dependencies.settings().qbittorrent.origin(), qbittorrent.origin());

    let (_sender, receiver) = shutdown_channel();
    let report = run_with(dependencies, receiver).await?;

    assert_eq!(report.updates, 1);
    login.assert();
    forwarded.assert();
    preferences.assert();
    update.assert();
    Ok(())
}

#[tokio::test]
async fn rejected_login_fails_single_shot_run() -> anyhow::Result<()> {
    let qbittorrent = QbittorrentMock::start().await;
    let gluetun = GluetunMock::start().await;
    let _login = qbittorrent.reject_login();

    let config = TempFile::with_contents("config.yaml", &config_yaml(&qbittorrent, &gluetun))?;
    let (_sender, receiver) = shutdown_channel();
    let err = run_with(dependencies(&config, &["--once"])?, receiver)
        .await
        .expect_err("login is rejected");

    assert_eq!(err.exit_code(), 3);
    assert!(matches!(
        err,
        AppError::Sync {
            source: SyncError::Auth { .. }
        }
    ));
    Ok(())
}

#[tokio::test]
async fn unassigned_gluetun_port_is_rejected() -> anyhow::Result<()> {
    let qbittorrent = QbittorrentMock::start().await;
    let gluetun = GluetunMock::start().await;
    let _login = qbittorrent.accept_login();
    let _forwarded = gluetun.serve_forwarded_port(0);

    let config = TempFile::with_contents("config.yaml", &config_yaml(&qbittorrent, &gluetun))?;
    let (_sender, receiver) = shutdown_channel();
    let err = run_with(dependencies(&config, &["--once"])?, receiver)
        .await
        .expect_err("port 0 is invalid");

    assert!(matches!(
        err,
        AppError::Sync {
            source: SyncError::InvalidPort { value: 0 }
        }
    ));
    Ok(())
}

#[tokio::test]
async fn continuous_run_stops_on_shutdown() -> anyhow::Result<()> {
    let qbittorrent = QbittorrentMock::start().await;
    let gluetun = GluetunMock::start().await;
    let login = qbittorrent.accept_login();
    let _preferences = qbittorrent.serve_listen_port(51_413);
    let _forwarded = gluetun.serve_forwarded_port(51_413);

    let config = TempFile::with_contents("config.yaml", &config_yaml(&qbittorrent, &gluetun))?;
    let (sender, receiver) = shutdown_channel();
    let stopper = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        sender.send(true).is_ok()
    });

    let report = run_with(dependencies(&config, &["--interval", "3600"])?, receiver).await?;
    assert!(stopper.await?);
    assert_eq!(report.cycles, 1);
    assert!(report.succeeded());
    login.assert();
    Ok(())
}

#[test]
fn invalid_config_file_is_a_startup_error() -> anyhow::Result<()> {
    let config = TempFile::with_contents("config.yaml", "qbittorrent_port: 0\n")?;
    let config_path = config.path().to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["portsync", "-f", config_path.as_str()])?;
    let err = BootstrapDependencies::from_cli_with(&cli, no_env).expect_err("port 0 is invalid");
    assert_eq!(err.exit_code(), 2);
    Ok(())
}
