//! The viewport discovery query engine.

use super::{DiscoveryConfig, DiscoveryEvent, DiscoveryParams, DiscoveryResults, EntityTypeFilter};
use crate::api::{ChallengeSearchQuery, DiscoveryApi, PeakSearchQuery};
use crate::freshness::FreshnessSource;
use crate::geometry::{challenge_features, partition_peaks};
use crate::model::ChallengeKind;
use crate::sources::{SourceRegistry, CHALLENGES, DISCOVERY_SOURCES, PEAKS, SUMMITED_PEAKS};
use crossbeam::channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Debounced, freshness-guarded discovery querying.
///
/// Cheap to clone; clones share one engine instance. All entry points are
/// synchronous: they only arm or cancel the debounce timer, and the query
/// itself runs on a spawned task once the quiet window elapses.
pub struct DiscoveryEngine<A: DiscoveryApi> {
    inner: Arc<DiscoveryInner<A>>,
}

impl<A: DiscoveryApi> Clone for DiscoveryEngine<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DiscoveryInner<A> {
    api: Arc<A>,
    registry: SourceRegistry,
    config: DiscoveryConfig,
    params: Mutex<DiscoveryParams>,
    results: Mutex<DiscoveryResults>,
    /// Set by the orchestrator while a detail view owns the map
    suppressed: AtomicBool,
    freshness: FreshnessSource,
    /// Pending debounce timer; replaced (and the old one aborted) per trigger
    debounce_task: Mutex<Option<JoinHandle<()>>>,
    event_tx: Mutex<Option<Sender<DiscoveryEvent>>>,
}

impl<A: DiscoveryApi + 'static> DiscoveryEngine<A> {
    pub fn new(registry: SourceRegistry, api: Arc<A>, config: DiscoveryConfig) -> Self {
        Self {
            inner: Arc::new(DiscoveryInner {
                api,
                registry,
                config,
                params: Mutex::new(DiscoveryParams::default()),
                results: Mutex::new(DiscoveryResults::default()),
                suppressed: AtomicBool::new(false),
                freshness: FreshnessSource::new(),
                debounce_task: Mutex::new(None),
                event_tx: Mutex::new(None),
            }),
        }
    }

    /// Get a receiver for discovery events.
    ///
    /// Single-subscriber: each call installs a fresh channel and disconnects
    /// any receiver handed out earlier.
    pub fn event_receiver(&self) -> Receiver<DiscoveryEvent> {
        let (tx, rx) = crossbeam::channel::unbounded();
        *self.inner.event_tx.lock().expect("event channel poisoned") = Some(tx);
        rx
    }

    /// Snapshot of the current result set.
    pub fn results(&self) -> DiscoveryResults {
        self.inner.results.lock().expect("results poisoned").clone()
    }

    /// Snapshot of the current query inputs.
    pub fn params(&self) -> DiscoveryParams {
        self.inner.params.lock().expect("params poisoned").clone()
    }

    pub fn is_suppressed(&self) -> bool {
        self.inner.suppressed.load(Ordering::SeqCst)
    }

    /// Update the free-text search; debounces a re-query.
    pub fn set_search(&self, search: impl Into<String>) {
        self.inner.params.lock().expect("params poisoned").search = search.into();
        self.schedule();
    }

    /// Toggle viewport scoping; debounces a re-query.
    pub fn set_viewport_only(&self, viewport_only: bool) {
        self.inner
            .params
            .lock()
            .expect("params poisoned")
            .viewport_only = viewport_only;
        self.schedule();
    }

    /// Change the entity-type filter; debounces a re-query.
    pub fn set_filter(&self, filter: EntityTypeFilter) {
        self.inner.params.lock().expect("params poisoned").filter = filter;
        self.schedule();
    }

    /// Change the challenge category; debounces a re-query.
    pub fn set_challenge_kind(&self, kind: ChallengeKind) {
        self.inner
            .params
            .lock()
            .expect("params poisoned")
            .challenge_kind = kind;
        self.schedule();
    }

    /// The surface finished a pan/zoom; debounces a re-query.
    pub fn on_viewport_settled(&self) {
        self.schedule();
    }

    /// Enable or disable the engine.
    ///
    /// Suppressing cancels the pending timer and invalidates every
    /// outstanding token, so an in-flight query's response is discarded on
    /// arrival instead of racing the detail view for the shared sources.
    /// Un-suppressing does not query by itself; the caller re-triggers a
    /// settle once the exit actions are done.
    pub fn set_suppressed(&self, suppressed: bool) {
        self.inner.suppressed.store(suppressed, Ordering::SeqCst);
        if suppressed {
            if let Some(task) = self
                .inner
                .debounce_task
                .lock()
                .expect("debounce slot poisoned")
                .take()
            {
                task.abort();
            }
            self.inner.freshness.invalidate();
        }
    }

    /// Arm the debounce timer, cancelling any pending one.
    fn schedule(&self) {
        if self.inner.suppressed.load(Ordering::SeqCst) {
            return;
        }
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            tokio::time::sleep(inner.config.debounce).await;
            run_query(&inner).await;
        });
        let mut slot = self
            .inner
            .debounce_task
            .lock()
            .expect("debounce slot poisoned");
        if let Some(previous) = slot.replace(task) {
            previous.abort();
        }
    }
}

impl<A> DiscoveryInner<A> {
    fn emit(&self, event: DiscoveryEvent) {
        if let Some(tx) = &*self.event_tx.lock().expect("event channel poisoned") {
            let _ = tx.send(event);
        }
    }

    fn clear_all(&self) {
        for id in DISCOVERY_SOURCES {
            self.registry.clear_now(id);
        }
        *self.results.lock().expect("results poisoned") = DiscoveryResults::default();
    }
}

async fn run_query<A: DiscoveryApi>(inner: &Arc<DiscoveryInner<A>>) {
    if inner.suppressed.load(Ordering::SeqCst) {
        return;
    }
    let Some(viewport) = inner.registry.surface().viewport() else {
        tracing::debug!("surface detached, skipping discovery query");
        return;
    };
    if viewport.zoom < inner.config.min_zoom {
        tracing::debug!(zoom = viewport.zoom, "below discovery zoom threshold, clearing");
        inner.freshness.invalidate();
        inner.clear_all();
        inner.emit(DiscoveryEvent::Cleared);
        return;
    }

    let params = inner.params.lock().expect("params poisoned").clone();
    let bbox = params.viewport_only.then_some(viewport.bounds);
    let search = params.search_term();
    let token = inner.freshness.issue();
    tracing::debug!(?bbox, ?search, "issuing discovery query");

    let peaks = if params.filter.includes_peaks() {
        inner
            .api
            .search_peaks(&PeakSearchQuery {
                bbox,
                search: search.clone(),
                summited: None,
            })
            .await
    } else {
        Ok(Vec::new())
    };
    let challenges = if params.filter.includes_challenges() {
        inner
            .api
            .search_challenges(&ChallengeSearchQuery {
                kind: params.challenge_kind,
                bbox,
                search,
            })
            .await
    } else {
        Ok(Vec::new())
    };

    if !token.is_current() {
        tracing::debug!("discarding superseded discovery response");
        return;
    }
    if inner.suppressed.load(Ordering::SeqCst) {
        return;
    }

    match (peaks, challenges) {
        (Ok(peaks), Ok(challenges)) => {
            let (unsummited, summited) = partition_peaks(&peaks);
            let challenge_collection = challenge_features(&challenges);
            let handles = inner.registry.acquire_all(DISCOVERY_SOURCES).await;
            // Acquisition may have waited on the surface; re-check before
            // touching shared state.
            if !token.is_current() {
                return;
            }
            *inner.results.lock().expect("results poisoned") = DiscoveryResults {
                peaks: peaks.clone(),
                challenges: challenges.clone(),
            };
            if let Some(Some(handle)) = handles.get(PEAKS) {
                handle.write(unsummited);
            }
            if let Some(Some(handle)) = handles.get(SUMMITED_PEAKS) {
                handle.write(summited);
            }
            if let Some(Some(handle)) = handles.get(CHALLENGES) {
                handle.write(challenge_collection);
            }
            inner.emit(DiscoveryEvent::ResultsUpdated {
                peak_count: peaks.len(),
                challenge_count: challenges.len(),
            });
        }
        (peaks, challenges) => {
            let message = peaks
                .err()
                .or(challenges.err())
                .map(|e| e.to_string())
                .unwrap_or_default();
            tracing::warn!(error = %message, "discovery query failed, clearing sources");
            inner.clear_all();
            inner.emit(DiscoveryEvent::QueryFailed { message });
        }
    }
}
