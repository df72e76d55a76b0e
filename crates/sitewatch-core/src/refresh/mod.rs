// ── Refresh driver ──
//
// Pulls snapshots from a `SiteSource` into a shared `StatusBoard`:
// once at startup, then on a fixed period, plus on manual triggers.
// At most one fetch is in flight; overlapping requests are dropped.
// A failed fetch leaves the previous snapshot untouched.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use sitewatch_api::StatusClient;
use sitewatch_api::transport::{TlsMode, TransportConfig};

use crate::board::{BoardView, StatusBoard};
use crate::config::{MonitorConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::SiteStatus;

// ── Source ───────────────────────────────────────────────────────

/// Anything that can produce a full site status snapshot.
pub trait SiteSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<SiteStatus>, CoreError>> + Send;
}

/// Snapshot source backed by the HTTP status endpoint.
pub struct HttpSource {
    client: StatusClient,
}

impl HttpSource {
    pub fn new(config: &MonitorConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        let client = StatusClient::new(config.endpoint.clone(), &transport)?;
        Ok(Self { client })
    }

    pub fn endpoint(&self) -> &Url {
        self.client.endpoint()
    }
}

impl SiteSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<SiteStatus>, CoreError> {
        let records = self.client.fetch_site_status().await?;
        Ok(records.into_iter().map(SiteStatus::from).collect())
    }
}

fn build_transport(config: &MonitorConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

// ── Status ───────────────────────────────────────────────────────

/// What the driver is doing right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    /// The last fetch failed; the board still shows the previous snapshot.
    Failed(String),
}

/// Observable driver state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshStatus {
    pub phase: FetchPhase,
    pub last_success: Option<DateTime<Utc>>,
    /// Size of the snapshot currently on the board.
    pub record_count: usize,
}

impl RefreshStatus {
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FetchPhase::Failed(message) => Some(message),
            FetchPhase::Idle | FetchPhase::Loading => None,
        }
    }
}

/// Result of a single refresh attempt.
#[derive(Debug)]
pub enum RefreshOutcome {
    Applied { records: usize },
    /// Another fetch was already running.
    Skipped,
    Failed(CoreError),
}

// ── Driver ───────────────────────────────────────────────────────

/// Drives a [`StatusBoard`] from a [`SiteSource`].
///
/// Cheaply cloneable; clones share the board, the in-flight guard and
/// the background poll task.
pub struct RefreshDriver<S> {
    inner: Arc<DriverInner<S>>,
}

struct DriverInner<S> {
    source: S,
    board: Mutex<StatusBoard>,
    status: watch::Sender<RefreshStatus>,
    in_flight: AtomicBool,
    interval: Duration,
    cancel: CancellationToken,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl<S> Clone for RefreshDriver<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl RefreshDriver<HttpSource> {
    /// Driver polling the configured HTTP endpoint.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, CoreError> {
        Ok(Self::new(HttpSource::new(config)?, config.refresh_interval))
    }
}

impl<S: SiteSource> RefreshDriver<S> {
    /// Create a driver. A zero `interval` disables periodic polling.
    /// Nothing is fetched until [`start()`](Self::start) or
    /// [`refresh()`](Self::refresh).
    pub fn new(source: S, interval: Duration) -> Self {
        let (status, _) = watch::channel(RefreshStatus::default());
        Self {
            inner: Arc::new(DriverInner {
                source,
                board: Mutex::new(StatusBoard::new()),
                status,
                in_flight: AtomicBool::new(false),
                interval,
                cancel: CancellationToken::new(),
                task: tokio::sync::Mutex::new(None),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Run `f` against the board. Board commands publish their own view.
    pub fn with_board<R>(&self, f: impl FnOnce(&mut StatusBoard) -> R) -> R {
        let mut board = self
            .inner
            .board
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut board)
    }

    pub fn view(&self) -> Arc<BoardView> {
        self.with_board(|board| board.view())
    }

    pub fn views(&self) -> watch::Receiver<Arc<BoardView>> {
        self.with_board(|board| board.subscribe())
    }

    pub fn status(&self) -> watch::Receiver<RefreshStatus> {
        self.inner.status.subscribe()
    }

    pub fn current_status(&self) -> RefreshStatus {
        self.inner.status.borrow().clone()
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch once and ingest the result.
    ///
    /// Returns [`RefreshOutcome::Skipped`] without fetching when a
    /// fetch is already running.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = InFlight::acquire(&self.inner.in_flight) else {
            debug!("refresh already in flight, dropping request");
            return RefreshOutcome::Skipped;
        };

        self.inner
            .status
            .send_modify(|status| status.phase = FetchPhase::Loading);

        match self.inner.source.fetch().await {
            Ok(records) => {
                let count = records.len();
                self.with_board(|board| board.ingest(records));
                self.inner.status.send_modify(|status| {
                    status.phase = FetchPhase::Idle;
                    status.last_success = Some(Utc::now());
                    status.record_count = count;
                });
                debug!(records = count, "refresh applied");
                RefreshOutcome::Applied { records: count }
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, keeping previous snapshot");
                let message = e.to_string();
                self.inner
                    .status
                    .send_modify(|status| status.phase = FetchPhase::Failed(message));
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// Fire-and-forget refresh.
    pub fn trigger(&self) -> JoinHandle<RefreshOutcome> {
        let driver = self.clone();
        tokio::spawn(async move { driver.refresh().await })
    }

    /// Startup fetch, then periodic polling in the background.
    ///
    /// Calling `start` again only performs another fetch.
    pub async fn start(&self) -> RefreshOutcome {
        let outcome = self.refresh().await;

        if !self.inner.interval.is_zero() && !self.inner.cancel.is_cancelled() {
            let mut task = self.inner.task.lock().await;
            if task.is_none() {
                let driver = self.clone();
                let cancel = self.inner.cancel.clone();
                *task = Some(tokio::spawn(poll_task(driver, self.inner.interval, cancel)));
                info!(interval = ?self.inner.interval, "periodic refresh started");
            }
        }

        outcome
    }

    /// Stop periodic polling. A fetch already running completes and its
    /// result is still applied.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(handle) = self.inner.task.lock().await.take() {
            let _ = handle.await;
        }
        debug!("refresh driver stopped");
    }
}

async fn poll_task<S: SiteSource>(
    driver: RefreshDriver<S>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let RefreshOutcome::Skipped = driver.refresh().await {
                    debug!("periodic refresh skipped");
                }
            }
        }
    }
}

/// Holds the in-flight flag for the duration of one fetch.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    use tokio::sync::Notify;

    use super::*;
    use crate::model::{AliveSignal, DeviceProbe, DeviceSlot};

    fn site(code: &str) -> SiteStatus {
        SiteStatus {
            name: format!("Site {code}"),
            code: code.into(),
            gateway: "Fiber".into(),
            probes: DeviceSlot::ALL.map(|slot| DeviceProbe {
                slot,
                ip: None,
                status: None,
                pinged_on: None,
            }),
            alive: AliveSignal {
                alive: None,
                hash_key: None,
                received_on: None,
                device_id: None,
            },
        }
    }

    /// Replays queued responses; repeats the last successful size once
    /// the queue is drained.
    #[derive(Default)]
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<SiteStatus>, CoreError>>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedSource {
        fn with(responses: Vec<Result<Vec<SiteStatus>, CoreError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SiteSource for ScriptedSource {
        async fn fetch(&self) -> Result<Vec<SiteStatus>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![site("S-01")]))
        }
    }

    fn api_error() -> CoreError {
        CoreError::Api {
            message: "HTTP error! status: 500 (Internal Server Error)".into(),
            status: Some(500),
        }
    }

    #[tokio::test]
    async fn successful_refresh_populates_board() {
        let driver = RefreshDriver::new(
            ScriptedSource::with(vec![Ok(vec![site("S-01"), site("S-02")])]),
            Duration::ZERO,
        );

        let outcome = driver.refresh().await;
        assert!(matches!(outcome, RefreshOutcome::Applied { records: 2 }));
        assert_eq!(driver.view().summary.total_entries, 2);

        let status = driver.current_status();
        assert_eq!(status.phase, FetchPhase::Idle);
        assert_eq!(status.record_count, 2);
        assert!(status.last_success.is_some());
    }

    #[tokio::test]
    async fn failure_keeps_previous_snapshot() {
        let driver = RefreshDriver::new(
            ScriptedSource::with(vec![Ok(vec![site("S-01"), site("S-02")]), Err(api_error())]),
            Duration::ZERO,
        );

        driver.refresh().await;
        let before = driver.view();

        let outcome = driver.refresh().await;
        assert!(matches!(outcome, RefreshOutcome::Failed(CoreError::Api { .. })));
        assert_eq!(driver.view(), before);

        let status = driver.current_status();
        assert!(status.error().unwrap().contains("500"));
        assert_eq!(status.record_count, 2);
        assert!(status.last_success.is_some());
    }

    #[tokio::test]
    async fn overlapping_refresh_is_dropped() {
        let gate = Arc::new(Notify::new());
        let driver = RefreshDriver::new(
            ScriptedSource {
                gate: Some(Arc::clone(&gate)),
                ..ScriptedSource::default()
            },
            Duration::ZERO,
        );

        let first = driver.trigger();
        driver
            .status()
            .wait_for(RefreshStatus::is_loading)
            .await
            .unwrap();

        assert!(matches!(driver.refresh().await, RefreshOutcome::Skipped));
        assert_eq!(driver.source().calls(), 1);

        gate.notify_one();
        assert!(matches!(
            first.await.unwrap(),
            RefreshOutcome::Applied { records: 1 }
        ));

        // The guard is released once the fetch resolves.
        gate.notify_one();
        assert!(matches!(
            driver.refresh().await,
            RefreshOutcome::Applied { .. }
        ));
    }

    #[tokio::test]
    async fn board_commands_survive_refresh() {
        let driver = RefreshDriver::new(
            ScriptedSource::with(vec![
                Ok(vec![site("S-01"), site("S-02")]),
                Ok(vec![site("S-01"), site("S-02"), site("S-03")]),
            ]),
            Duration::ZERO,
        );

        driver.refresh().await;
        driver.with_board(|board| board.set_search("s-02"));
        driver.refresh().await;

        let view = driver.view();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].site_code, "S-02");
    }

    #[tokio::test(start_paused = true)]
    async fn polls_on_interval_until_shutdown() {
        let driver = RefreshDriver::new(ScriptedSource::default(), Duration::from_secs(30));

        driver.start().await;
        assert_eq!(driver.source().calls(), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(driver.source().calls(), 3);

        driver.shutdown().await;
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(driver.source().calls(), 3);
    }

    #[tokio::test]
    async fn zero_interval_never_spawns_poller() {
        let driver = RefreshDriver::new(ScriptedSource::default(), Duration::ZERO);
        driver.start().await;
        assert!(driver.inner.task.lock().await.is_none());
    }

    #[test]
    fn tls_modes_map_onto_transport() {
        assert_eq!(
            tls_to_transport(&TlsVerification::SystemDefaults),
            TlsMode::System
        );
        assert_eq!(
            tls_to_transport(&TlsVerification::DangerAcceptInvalid),
            TlsMode::DangerAcceptInvalid
        );
    }
}
