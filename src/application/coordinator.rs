// Polling coordinator - per-miner refresh cycle, failure tracking, publication
use crate::application::device_api::{DeviceApi, TransportError};
use crate::domain::history::{HistorySummary, RollingHistory, DEFAULT_HISTORY_CAPACITY};
use crate::domain::record::CanonicalRecord;
use crate::domain::schema::{FieldSpec, TELEMETRY_SCHEMA};
use crate::infrastructure::normalize::normalize;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_UNAVAILABLE_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

/// Last classified fetch failure, kept alongside the stale record so
/// subscribers can tell "temporarily unreachable" from healthy.
#[derive(Debug, Clone, Serialize)]
pub struct FetchFailure {
    pub kind: &'static str,
    pub message: String,
}

impl From<&TransportError> for FetchFailure {
    fn from(err: &TransportError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub poll_interval: Duration,
    pub unavailable_threshold: u32,
    pub history_capacity: usize,
    pub history_metrics: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            unavailable_threshold: DEFAULT_UNAVAILABLE_THRESHOLD,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_metrics: vec!["hashRate".to_string()],
        }
    }
}

/// Mutable per-session state. Owned by the poll task; everything published
/// outside is an immutable snapshot copy.
struct PollState {
    last_record: Option<CanonicalRecord>,
    last_error: Option<FetchFailure>,
    consecutive_failures: u32,
    history: HashMap<String, RollingHistory>,
    response_time_ms: Option<u64>,
    updated_at: Option<DateTime<Utc>>,
}

impl PollState {
    fn new(config: &SessionConfig) -> Self {
        let history = config
            .history_metrics
            .iter()
            .map(|key| (key.clone(), RollingHistory::new(config.history_capacity)))
            .collect();
        Self {
            last_record: None,
            last_error: None,
            consecutive_failures: 0,
            history,
            response_time_ms: None,
            updated_at: None,
        }
    }

    fn record_success(&mut self, record: CanonicalRecord, response_time_ms: u64) {
        for (key, history) in &mut self.history {
            if let Some(sample) = record.numeric(key) {
                history.push(sample);
            }
        }
        self.last_record = Some(record);
        self.last_error = None;
        self.consecutive_failures = 0;
        self.response_time_ms = Some(response_time_ms);
        self.updated_at = Some(Utc::now());
    }

    fn record_failure(&mut self, err: &TransportError) {
        self.consecutive_failures += 1;
        self.last_error = Some(FetchFailure::from(err));
    }

    /// Derived on read: online exactly while the last fetch left no error.
    fn connectivity(&self) -> Connectivity {
        if self.last_error.is_none() {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }

    fn snapshot(&self, unavailable_threshold: u32) -> Arc<StateSnapshot> {
        let history = self
            .history
            .iter()
            .filter_map(|(key, h)| h.summary().map(|s| (key.clone(), s)))
            .collect();
        Arc::new(StateSnapshot {
            record: self.last_record.clone(),
            connectivity: self.connectivity(),
            available: self.consecutive_failures < unavailable_threshold,
            last_error: self.last_error.clone(),
            consecutive_failures: self.consecutive_failures,
            response_time_ms: self.response_time_ms,
            history,
            updated_at: self.updated_at,
        })
    }
}

/// Immutable view handed to subscribers. The record is the last successful
/// one and is retained while the device is merely failing; `available`
/// drops once the failure streak reaches the configured threshold.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub record: Option<CanonicalRecord>,
    pub connectivity: Connectivity,
    pub available: bool,
    pub last_error: Option<FetchFailure>,
    pub consecutive_failures: u32,
    pub response_time_ms: Option<u64>,
    pub history: HashMap<String, HistorySummary>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// First-cycle failure during session bring-up. The one place a transport
/// error propagates synchronously instead of landing in the poll state.
#[derive(Debug, thiserror::Error)]
#[error("initial fetch failed: {0}")]
pub struct SetupError(#[from] pub TransportError);

struct Poller {
    api: Arc<dyn DeviceApi>,
    schema: &'static [FieldSpec],
    config: SessionConfig,
    state: PollState,
    publisher: watch::Sender<Arc<StateSnapshot>>,
}

impl Poller {
    /// One full fetch cycle: fetch, normalize, update state, publish.
    async fn run_cycle(&mut self) -> Result<(), TransportError> {
        let started = Instant::now();
        let outcome = match self.api.system_info().await {
            Ok(payload) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let record = normalize(&payload, self.schema);
                tracing::debug!(
                    response_time_ms = elapsed_ms,
                    metrics = record.len(),
                    "fetch succeeded"
                );
                self.state.record_success(record, elapsed_ms);
                Ok(())
            }
            Err(err) => {
                self.state.record_failure(&err);
                tracing::warn!(
                    consecutive_failures = self.state.consecutive_failures,
                    "fetch failed: {err}"
                );
                Err(err)
            }
        };
        let _ = self
            .publisher
            .send(self.state.snapshot(self.config.unavailable_threshold));
        outcome
    }
}

async fn poll_loop(mut poller: Poller, refresh: Arc<Notify>, shutdown: Arc<Notify>) {
    let period = poller.config.poll_interval;
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = refresh.notified() => {}
            _ = shutdown.notified() => break,
        }
        // Cycles never overlap: the next trigger is only examined after the
        // in-flight fetch completes or times out.
        let _ = poller.run_cycle().await;
    }
    tracing::debug!("poll loop stopped");
}

/// The polling lifecycle for one configured miner. The first fetch runs
/// inside `start` and a failure there is the caller's problem; afterwards a
/// background task cycles on the interval timer plus coalesced explicit
/// refresh requests, publishing snapshots through a watch channel.
#[derive(Debug)]
pub struct MinerSession {
    name: String,
    refresh: Arc<Notify>,
    shutdown: Arc<Notify>,
    snapshots: watch::Receiver<Arc<StateSnapshot>>,
    task: JoinHandle<()>,
}

impl MinerSession {
    pub async fn start(
        name: String,
        api: Arc<dyn DeviceApi>,
        config: SessionConfig,
    ) -> Result<Self, SetupError> {
        Self::start_with_schema(name, api, config, TELEMETRY_SCHEMA).await
    }

    pub async fn start_with_schema(
        name: String,
        api: Arc<dyn DeviceApi>,
        config: SessionConfig,
        schema: &'static [FieldSpec],
    ) -> Result<Self, SetupError> {
        let state = PollState::new(&config);
        let (tx, rx) = watch::channel(state.snapshot(config.unavailable_threshold));
        let mut poller = Poller {
            api,
            schema,
            config,
            state,
            publisher: tx,
        };

        // Distinguished first cycle: a failure here never becomes a session.
        poller.run_cycle().await?;
        tracing::info!(miner = %name, "session started");

        let refresh = Arc::new(Notify::new());
        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(poll_loop(poller, refresh.clone(), shutdown.clone()));

        Ok(Self {
            name,
            refresh,
            shutdown,
            snapshots: rx,
            task,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest published snapshot (pull interface).
    pub fn latest(&self) -> Arc<StateSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Watch receiver for push-style subscribers.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StateSnapshot>> {
        self.snapshots.clone()
    }

    /// Ask for an out-of-schedule cycle, e.g. after a command. Requests
    /// arriving while a cycle is in flight coalesce into a single pending
    /// one.
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    /// Stop the schedule. An in-flight fetch finishes or times out on its
    /// own; no new cycle starts afterwards.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

impl Drop for MinerSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}
