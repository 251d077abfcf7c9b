//! In-memory lead store and its background refresher.
//!
//! The store holds the most recent successful load. A failed refresh never
//! discards data that was already loaded; it only matters before the first
//! load, when it moves the store into [`LoadState::Failed`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::geo::{fill_missing_coordinates, FillLimits, Geocoder};
use crate::lead::Lead;
use crate::smartsuite::SmartSuiteClient;

/// Where the store is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No load has finished yet.
    Loading,
    /// Data is available.
    Ready,
    /// The first load failed; carries the error message.
    Failed(String),
}

impl LoadState {
    /// Whether data has been loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// A consistent view of the store at one point in time.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    /// Current leads.
    pub leads: Arc<Vec<Lead>>,
    /// Load state.
    pub state: LoadState,
    /// When the last successful refresh finished.
    pub last_refresh: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Inner {
    leads: Arc<Vec<Lead>>,
    state: LoadState,
    last_refresh: Option<DateTime<Utc>>,
}

/// Produces a fresh, geocoded lead list.
#[async_trait]
pub trait LeadSource: Send + Sync {
    /// Load the complete lead list.
    async fn load(&self) -> Result<Vec<Lead>>;

    /// One raw upstream record, for diagnostics.
    async fn sample(&self) -> Result<Option<Value>> {
        Ok(None)
    }
}

/// SmartSuite fetch followed by a coordinate backfill pass.
#[derive(Debug)]
pub struct SmartSuiteSource {
    client: SmartSuiteClient,
    geocoder: Arc<Geocoder>,
    limits: FillLimits,
}

impl SmartSuiteSource {
    /// Combine a client with the shared geocoder.
    #[must_use]
    pub fn new(client: SmartSuiteClient, geocoder: Arc<Geocoder>, limits: FillLimits) -> Self {
        Self {
            client,
            geocoder,
            limits,
        }
    }
}

#[async_trait]
impl LeadSource for SmartSuiteSource {
    async fn load(&self) -> Result<Vec<Lead>> {
        let mut leads = self.client.fetch_leads().await?;
        fill_missing_coordinates(&mut leads, &self.geocoder, &self.limits).await;
        Ok(leads)
    }

    async fn sample(&self) -> Result<Option<Value>> {
        self.client.fetch_sample().await
    }
}

/// Shared, cloneable handle to the loaded leads.
#[derive(Debug, Clone)]
pub struct LeadStore {
    inner: Arc<RwLock<Inner>>,
    refresh_lock: Arc<Mutex<()>>,
}

impl Default for LeadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadStore {
    /// An empty store in the [`LoadState::Loading`] state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                leads: Arc::new(Vec::new()),
                state: LoadState::Loading,
                last_refresh: None,
            })),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// A store that is already loaded with `leads`.
    #[must_use]
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.try_write() {
            inner.leads = Arc::new(leads);
            inner.state = LoadState::Ready;
            inner.last_refresh = Some(Utc::now());
        }
        store
    }

    /// Current leads, state and refresh time.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read().await;
        StoreSnapshot {
            leads: Arc::clone(&inner.leads),
            state: inner.state.clone(),
            last_refresh: inner.last_refresh,
        }
    }

    /// Current leads.
    pub async fn leads(&self) -> Arc<Vec<Lead>> {
        Arc::clone(&self.inner.read().await.leads)
    }

    /// Current load state.
    pub async fn state(&self) -> LoadState {
        self.inner.read().await.state.clone()
    }

    /// Reload from `source`, returning the new lead count.
    ///
    /// Concurrent refreshes are serialized.
    ///
    /// # Errors
    ///
    /// Returns the source error. Previously loaded data is kept in that case.
    pub async fn refresh(&self, source: &dyn LeadSource) -> Result<usize> {
        let _guard = self.refresh_lock.lock().await;
        let started = Instant::now();

        match source.load().await {
            Ok(leads) => {
                let count = leads.len();
                let mut inner = self.inner.write().await;
                inner.leads = Arc::new(leads);
                inner.state = LoadState::Ready;
                inner.last_refresh = Some(Utc::now());
                info!(
                    leads = count,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Lead data refreshed"
                );
                Ok(count)
            }
            Err(e) => {
                let mut inner = self.inner.write().await;
                if inner.state.is_ready() {
                    warn!(error = %e, kept = inner.leads.len(), "Refresh failed, keeping previous data");
                } else {
                    if e.is_config_error() {
                        error!(error = %e, "Initial data load failed; check the SmartSuite settings");
                    } else {
                        error!(error = %e, "Initial data load failed");
                    }
                    inner.state = LoadState::Failed(e.to_string());
                }
                Err(e)
            }
        }
    }
}

/// Cloneable stop signal for a running refresher.
#[derive(Debug, Clone, Default)]
pub struct RefreshHandle {
    stop_signal: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl RefreshHandle {
    /// Create a new handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the refresher to stop at its next wake-up.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }
}

/// Periodically reloads a [`LeadStore`].
pub struct Refresher {
    store: LeadStore,
    source: Arc<dyn LeadSource>,
    interval: Duration,
    handle: RefreshHandle,
}

impl std::fmt::Debug for Refresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refresher")
            .field("interval", &self.interval)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl Refresher {
    /// Create a refresher; nothing runs until [`Refresher::spawn`].
    #[must_use]
    pub fn new(store: LeadStore, source: Arc<dyn LeadSource>, interval: Duration) -> Self {
        Self {
            store,
            source,
            interval,
            handle: RefreshHandle::new(),
        }
    }

    /// Handle that stops this refresher.
    #[must_use]
    pub fn handle(&self) -> RefreshHandle {
        self.handle.clone()
    }

    /// Run an immediate refresh, then one every interval, until stopped.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = self.interval.as_secs(), "Starting lead refresher");
            loop {
                if self.handle.should_stop() {
                    break;
                }
                // Failures are logged by the store.
                let _ = self.store.refresh(self.source.as_ref()).await;

                tokio::select! {
                    () = tokio::time::sleep(self.interval) => {}
                    () = self.handle.wake.notified() => {}
                }
            }
            info!("Lead refresher stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::AtomicUsize;

    struct ScriptedSource {
        calls: AtomicUsize,
        fail_from: usize,
    }

    impl ScriptedSource {
        fn failing_from(fail_from: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_from,
            }
        }
    }

    #[async_trait]
    impl LeadSource for ScriptedSource {
        async fn load(&self) -> Result<Vec<Lead>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n >= self.fail_from {
                return Err(Error::internal("upstream down"));
            }
            Ok(vec![
                Lead {
                    company: format!("Load {n}"),
                    ..Lead::default()
                };
                n + 1
            ])
        }
    }

    #[tokio::test]
    async fn test_new_store_is_loading() {
        let store = LeadStore::new();
        let snap = store.snapshot().await;
        assert_eq!(snap.state, LoadState::Loading);
        assert!(snap.leads.is_empty());
        assert!(snap.last_refresh.is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let store = LeadStore::new();
        let source = ScriptedSource::failing_from(usize::MAX);

        assert_eq!(store.refresh(&source).await.unwrap(), 1);
        assert_eq!(store.refresh(&source).await.unwrap(), 2);

        let snap = store.snapshot().await;
        assert_eq!(snap.state, LoadState::Ready);
        assert_eq!(snap.leads.len(), 2);
        assert!(snap.leads.iter().all(|l| l.company == "Load 1"));
        assert!(snap.last_refresh.is_some());
    }

    #[tokio::test]
    async fn test_first_failure_marks_failed() {
        crate::logging::init_test_logging();
        let store = LeadStore::new();
        let source = ScriptedSource::failing_from(0);

        assert!(store.refresh(&source).await.is_err());

        match store.state().await {
            LoadState::Failed(msg) => assert!(msg.contains("upstream down")),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_later_failure_keeps_data() {
        let store = LeadStore::new();
        let source = ScriptedSource::failing_from(1);

        store.refresh(&source).await.unwrap();
        assert!(store.refresh(&source).await.is_err());

        let snap = store.snapshot().await;
        assert_eq!(snap.state, LoadState::Ready);
        assert_eq!(snap.leads.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_store_recovers() {
        let store = LeadStore::new();
        let failing = ScriptedSource::failing_from(0);
        let working = ScriptedSource::failing_from(usize::MAX);

        let _ = store.refresh(&failing).await;
        store.refresh(&working).await.unwrap();

        assert_eq!(store.state().await, LoadState::Ready);
    }

    #[tokio::test]
    async fn test_with_leads_is_ready() {
        let store = LeadStore::with_leads(vec![Lead::default()]);
        assert_eq!(store.state().await, LoadState::Ready);
        assert_eq!(store.leads().await.len(), 1);
    }

    #[test]
    fn test_refresh_handle_clone_shares_signal() {
        let handle = RefreshHandle::new();
        let other = handle.clone();
        assert!(!other.should_stop());
        handle.stop();
        assert!(other.should_stop());
    }

    #[tokio::test]
    async fn test_refresher_loads_immediately_and_stops() {
        let store = LeadStore::new();
        let source: Arc<dyn LeadSource> = Arc::new(ScriptedSource::failing_from(usize::MAX));
        let refresher = Refresher::new(store.clone(), source, Duration::from_secs(3600));
        let handle = refresher.handle();
        let task = refresher.spawn();

        for _ in 0..100 {
            if store.state().await.is_ready() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.state().await.is_ready());

        handle.stop();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("refresher should stop")
            .unwrap();
    }
}
