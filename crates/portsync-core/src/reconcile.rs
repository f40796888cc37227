//! A single reconciliation cycle.
//!
//! # Design
//! - Steps run in a fixed order; each failure maps to the stage it occurred in.
//! - The client is re-authenticated every cycle; sessions are never reused.
//! - The forwarded port is validated before the listening port is read, so an
//!   out-of-range value never reaches the client.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{SyncError, SyncResult};
use crate::model::{CycleOutcome, Port};
use crate::service::{PortSource, TorrentClient};

/// Aligns the client's listening port with the gateway's forwarded port.
#[derive(Clone)]
pub struct Reconciler {
    source: Arc<dyn PortSource>,
    client: Arc<dyn TorrentClient>,
}

impl Reconciler {
    /// Build a reconciler from a port source and a torrent client.
    #[must_use]
    pub fn new(source: Arc<dyn PortSource>, client: Arc<dyn TorrentClient>) -> Self {
        Self { source, client }
    }

    /// Description of the configured port source.
    #[must_use]
    pub fn source_label(&self) -> String {
        self.source.describe()
    }

    /// Run one cycle.
    ///
    /// # Errors
    ///
    /// Returns the [`SyncError`] variant for the first stage that failed.
    pub async fn reconcile(&self) -> SyncResult<CycleOutcome> {
        let session = self
            .client
            .authenticate()
            .await
            .map_err(|err| SyncError::Auth { source: err.into() })?;
        debug!("qBittorrent session established");

        let raw = self
            .source
            .forwarded_port()
            .await
            .map_err(|err| SyncError::PortSource {
                source_label: self.source.describe(),
                source: err.into(),
            })?;
        let forwarded = Port::from_raw(raw).ok_or(SyncError::InvalidPort { value: raw })?;
        debug!(forwarded = forwarded.get(), "forwarded port observed");

        let listening = self
            .client
            .listen_port(&session)
            .await
            .map_err(|err| SyncError::ListenPortQuery { source: err.into() })?;

        if forwarded.matches(listening) {
            let outcome = CycleOutcome::UpToDate { port: forwarded };
            info!(port = forwarded.get(), "qBittorrent listen port ({forwarded}) already up to date");
            return Ok(outcome);
        }

        self.client
            .set_listen_port(&session, forwarded)
            .await
            .map_err(|err| SyncError::ListenPortUpdate {
                port: forwarded,
                source: err.into(),
            })?;
        let outcome = CycleOutcome::Updated {
            previous: listening,
            current: forwarded,
        };
        info!(
            previous = listening,
            current = forwarded.get(),
            "qBittorrent listen port updated: {outcome}"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::Session;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Login,
        ForwardedPort,
        ListenPort,
        SetListenPort(u16),
    }

    /// Shared, ordered record of every adapter call in a test.
    #[derive(Default)]
    pub(crate) struct CallLog(Mutex<Vec<Call>>);

    impl CallLog {
        fn push(&self, call: Call) {
            self.0.lock().expect("call log poisoned").push(call);
        }

        pub(crate) fn calls(&self) -> Vec<Call> {
            self.0.lock().expect("call log poisoned").clone()
        }

        pub(crate) fn updates(&self) -> usize {
            self.calls()
                .iter()
                .filter(|call| matches!(call, Call::SetListenPort(_)))
                .count()
        }
    }

    pub(crate) struct FakeSource {
        pub(crate) log: Arc<CallLog>,
        pub(crate) port: Mutex<Result<i64, String>>,
    }

    #[async_trait]
    impl PortSource for FakeSource {
        fn describe(&self) -> String {
            "fake gateway".to_string()
        }

        async fn forwarded_port(&self) -> anyhow::Result<i64> {
            self.log.push(Call::ForwardedPort);
            self.port
                .lock()
                .expect("port poisoned")
                .clone()
                .map_err(|message| anyhow!(message))
        }
    }

    /// In-memory torrent client whose listening port follows successful updates.
    pub(crate) struct FakeClient {
        pub(crate) log: Arc<CallLog>,
        pub(crate) listen_port: Mutex<i64>,
        pub(crate) accept_login: bool,
        pub(crate) fail_update: bool,
    }

    #[async_trait]
    impl TorrentClient for FakeClient {
        async fn authenticate(&self) -> anyhow::Result<Session> {
            self.log.push(Call::Login);
            if self.accept_login {
                Ok(Session::new("fake-sid"))
            } else {
                Err(anyhow!("login response did not include a session cookie"))
            }
        }

        async fn listen_port(&self, session: &Session) -> anyhow::Result<i64> {
            assert_eq!(session.sid(), "fake-sid");
            self.log.push(Call::ListenPort);
            Ok(*self.listen_port.lock().expect("listen port poisoned"))
        }

        async fn set_listen_port(&self, session: &Session, port: Port) -> anyhow::Result<()> {
            assert_eq!(session.sid(), "fake-sid");
            self.log.push(Call::SetListenPort(port.get()));
            if self.fail_update {
                return Err(anyhow!("non-OK HTTP status: 403"));
            }
            *self.listen_port.lock().expect("listen port poisoned") = i64::from(port.get());
            Ok(())
        }
    }

    pub(crate) struct Harness {
        pub(crate) log: Arc<CallLog>,
        pub(crate) source: Arc<FakeSource>,
        pub(crate) client: Arc<FakeClient>,
    }

    impl Harness {
        pub(crate) fn new(forwarded: i64, listening: i64) -> Self {
            let log = Arc::new(CallLog::default());
            Self {
                source: Arc::new(FakeSource {
                    log: Arc::clone(&log),
                    port: Mutex::new(Ok(forwarded)),
                }),
                client: Arc::new(FakeClient {
                    log: Arc::clone(&log),
                    listen_port: Mutex::new(listening),
                    accept_login: true,
                    fail_update: false,
                }),
                log,
            }
        }

        fn with_client(mut self, accept_login: bool, fail_update: bool) -> Self {
            let listening = *self.client.listen_port.lock().expect("listen port poisoned");
            self.client = Arc::new(FakeClient {
                log: Arc::clone(&self.log),
                listen_port: Mutex::new(listening),
                accept_login,
                fail_update,
            });
            self
        }

        fn with_source_error(self, message: &str) -> Self {
            *self.source.port.lock().expect("port poisoned") = Err(message.to_string());
            self
        }

        pub(crate) fn reconciler(&self) -> Reconciler {
            Reconciler::new(
                Arc::clone(&self.source) as Arc<dyn PortSource>,
                Arc::clone(&self.client) as Arc<dyn TorrentClient>,
            )
        }
    }

    /// Formatted log output collected from a scoped subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("logs poisoned")).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("logs poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn divergent_ports_trigger_one_update() -> Result<()> {
        let harness = Harness::new(51_413, 6881);
        let outcome = harness.reconciler().reconcile().await?;

        assert_eq!(
            outcome,
            CycleOutcome::Updated {
                previous: 6881,
                current: Port::new(51_413).ok_or_else(|| anyhow!("valid port"))?,
            }
        );
        assert_eq!(outcome.to_string(), "6881 -> 51413");
        assert_eq!(
            harness.log.calls(),
            vec![
                Call::Login,
                Call::ForwardedPort,
                Call::ListenPort,
                Call::SetListenPort(51_413)
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn equal_ports_skip_the_update() -> Result<()> {
        let harness = Harness::new(6881, 6881);
        let outcome = harness.reconciler().reconcile().await?;

        assert!(!outcome.is_update());
        assert!(outcome.to_string().contains("already up to date"));
        assert_eq!(harness.log.updates(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn update_and_up_to_date_outcomes_are_logged() -> Result<()> {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let harness = Harness::new(51_413, 6881);
        harness.reconciler().reconcile().await?;
        harness.reconciler().reconcile().await?;

        let text = logs.text();
        let updated = text
            .lines()
            .find(|line| line.contains("listen port updated"))
            .ok_or_else(|| anyhow!("no update line in {text:?}"))?;
        assert!(updated.contains("6881 -> 51413"), "{updated}");
        let skipped = text
            .lines()
            .find(|line| line.contains("already up to date"))
            .ok_or_else(|| anyhow!("no up-to-date line in {text:?}"))?;
        assert!(skipped.contains("(51413)"), "{skipped}");
        assert_eq!(harness.log.updates(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_forwarded_port_stops_before_client_queries() {
        for raw in [0, 65_536, -1] {
            let harness = Harness::new(raw, 6881);
            let err = harness
                .reconciler()
                .reconcile()
                .await
                .expect_err("out of range port must fail");

            assert!(matches!(err, SyncError::InvalidPort { value } if value == raw));
            assert_eq!(harness.log.calls(), vec![Call::Login, Call::ForwardedPort]);
        }
    }

    #[tokio::test]
    async fn rejected_login_makes_no_further_calls() {
        let harness = Harness::new(51_413, 6881).with_client(false, false);
        let err = harness
            .reconciler()
            .reconcile()
            .await
            .expect_err("login must fail");

        assert!(matches!(err, SyncError::Auth { .. }));
        assert!(err.report().contains("session cookie"));
        assert_eq!(harness.log.calls(), vec![Call::Login]);
    }

    #[tokio::test]
    async fn port_source_failure_is_labelled() {
        let harness = Harness::new(0, 6881).with_source_error("gateway unreachable");
        let err = harness
            .reconciler()
            .reconcile()
            .await
            .expect_err("source must fail");

        assert!(matches!(err, SyncError::PortSource { .. }));
        assert_eq!(
            err.report(),
            "unable to find forwarded port via fake gateway: gateway unreachable"
        );
        assert_eq!(harness.log.updates(), 0);
    }

    #[tokio::test]
    async fn failed_update_surfaces_update_error() {
        let harness = Harness::new(51_413, 6881).with_client(true, true);
        let err = harness
            .reconciler()
            .reconcile()
            .await
            .expect_err("update must fail");

        assert!(
            matches!(err, SyncError::ListenPortUpdate { port, .. } if port.get() == 51_413)
        );
        assert_eq!(harness.log.updates(), 1);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() -> Result<()> {
        let harness = Harness::new(51_413, 6881);
        let reconciler = harness.reconciler();

        let first = reconciler.reconcile().await?;
        let second = reconciler.reconcile().await?;

        assert!(first.is_update());
        assert!(!second.is_update());
        assert_eq!(harness.log.updates(), 1);
        assert_eq!(
            harness.log.calls().iter().filter(|call| **call == Call::Login).count(),
            2,
            "every cycle re-authenticates"
        );
        Ok(())
    }

    #[tokio::test]
    async fn repeated_runs_with_equal_ports_never_update() -> Result<()> {
        let harness = Harness::new(40_000, 40_000);
        let reconciler = harness.reconciler();
        for _ in 0..2 {
            reconciler.reconcile().await?;
        }
        assert_eq!(harness.log.updates(), 0);
        Ok(())
    }
}
