//! The overlay orchestrator state machine.

use super::{DetailContent, DetailPhase, OverlayEvent};
use crate::api::{ApiError, DetailApi, DiscoveryApi};
use crate::camera::{CameraCoordinator, LayoutMode};
use crate::config::EngineConfig;
use crate::discovery::{DiscoveryConfig, DiscoveryEngine};
use crate::freshness::{FreshnessSource, FreshnessToken};
use crate::geometry::{
    activity_features, activity_focus_points, challenge_peak_features, selected_peak_features,
    summit_features, FeatureCollection, LngLat,
};
use crate::routes::{self, ContentType, RouteState};
use crate::sources::{SourceRegistry, ACTIVITIES, DETAIL_SOURCES, DISCOVERY_SOURCES, SELECTED_PEAKS};
use crate::surface::MapSurface;
use crossbeam::channel::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Top-level reconciler between route, data, sources, and camera.
///
/// Cheap to clone; clones share one orchestrator instance.
pub struct OverlayOrchestrator<A: DiscoveryApi, D: DetailApi> {
    inner: Arc<OrchestratorInner<A, D>>,
}

impl<A: DiscoveryApi, D: DetailApi> Clone for OverlayOrchestrator<A, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct OrchestratorInner<A: DiscoveryApi, D> {
    discovery: DiscoveryEngine<A>,
    detail_api: Arc<D>,
    registry: SourceRegistry,
    camera: CameraCoordinator,
    route: Mutex<RouteState>,
    phase: Mutex<Option<DetailPhase>>,
    /// Coordinates of the loaded entity, kept for explicit re-centering
    focus: Mutex<Vec<LngLat>>,
    freshness: FreshnessSource,
    event_tx: Mutex<Option<Sender<OverlayEvent>>>,
}

impl<A, D> OverlayOrchestrator<A, D>
where
    A: DiscoveryApi + 'static,
    D: DetailApi + 'static,
{
    pub fn new(
        surface: Arc<dyn MapSurface>,
        discovery_api: Arc<A>,
        detail_api: Arc<D>,
        config: &EngineConfig,
    ) -> Self {
        let registry = SourceRegistry::new(
            Arc::clone(&surface),
            config.source_retry_attempts,
            Duration::from_millis(config.source_retry_delay_ms),
        );
        let discovery = DiscoveryEngine::new(
            registry.clone(),
            discovery_api,
            DiscoveryConfig {
                debounce: Duration::from_millis(config.debounce_ms),
                min_zoom: config.min_discovery_zoom,
            },
        );
        let camera = CameraCoordinator::new(
            surface,
            config.padding.clone(),
            config.default_detail_zoom,
            config.fit_max_zoom,
        );
        Self {
            inner: Arc::new(OrchestratorInner {
                discovery,
                detail_api,
                registry,
                camera,
                route: Mutex::new(RouteState::default()),
                phase: Mutex::new(None),
                focus: Mutex::new(Vec::new()),
                freshness: FreshnessSource::new(),
                event_tx: Mutex::new(None),
            }),
        }
    }

    /// Get a receiver for orchestrator events.
    ///
    /// Single-subscriber: each call installs a fresh channel and disconnects
    /// any receiver handed out earlier.
    pub fn event_receiver(&self) -> Receiver<OverlayEvent> {
        let (tx, rx) = crossbeam::channel::unbounded();
        *self.inner.event_tx.lock().expect("event channel poisoned") = Some(tx);
        rx
    }

    /// The shared discovery engine, for host-side wiring (search box,
    /// filters, result lists).
    pub fn discovery(&self) -> DiscoveryEngine<A> {
        self.inner.discovery.clone()
    }

    /// Current route state.
    pub fn route(&self) -> RouteState {
        self.inner.route.lock().expect("route poisoned").clone()
    }

    /// Current detail phase; `None` while in discovery.
    pub fn detail_phase(&self) -> Option<DetailPhase> {
        self.inner.phase.lock().expect("phase poisoned").clone()
    }

    /// Forward of the surface's viewport-settled event.
    pub fn on_viewport_settled(&self) {
        self.inner.discovery.on_viewport_settled();
    }

    /// The host layout changed; recompute and reapply camera padding.
    pub fn set_layout(&self, layout: LayoutMode) {
        self.inner.camera.apply_layout(layout);
    }

    /// Explicit user-triggered re-centering on the loaded entity.
    pub fn show_on_map(&self) {
        let focus = self.inner.focus.lock().expect("focus poisoned").clone();
        if !focus.is_empty() {
            self.inner.camera.show_on_map(&focus);
        }
    }

    /// Handle a navigation to `path`.
    ///
    /// Transition order matters: for an incoming detail state, suppression
    /// and the discovery-source clear happen before the outgoing state's
    /// cleanup, and the fetch is issued before discovery could possibly be
    /// re-enabled. Detail-to-detail navigation is exit-then-entry, never a
    /// shortcut transition.
    pub fn navigate(&self, path: &str) -> RouteState {
        let new_route = routes::resolve(path);
        let old_route = {
            let mut route = self.inner.route.lock().expect("route poisoned");
            if *route == new_route {
                return new_route;
            }
            std::mem::replace(&mut *route, new_route.clone())
        };
        tracing::info!(
            from = ?old_route.content_type,
            to = ?new_route.content_type,
            "route change"
        );

        // Entry, part 1: take ownership of the map before anything else.
        if new_route.has_detail {
            self.inner.discovery.set_suppressed(true);
            for id in DISCOVERY_SOURCES {
                self.inner.registry.clear_now(id);
            }
            *self.inner.phase.lock().expect("phase poisoned") = Some(DetailPhase::Loading);
            self.inner.emit(OverlayEvent::DetailLoading {
                content_type: new_route.content_type,
            });
        }

        // Exit actions for the outgoing detail state. Invalidating here makes
        // any in-flight detail response stale; an incoming detail state
        // issues its own fresh token below.
        if old_route.has_detail {
            self.inner.freshness.invalidate();
            for id in DETAIL_SOURCES {
                self.inner.registry.clear_now(id);
            }
            self.inner.camera.reset();
            self.inner.focus.lock().expect("focus poisoned").clear();
        }

        // Entry, part 2: issue the fetch, or hand the map back to discovery.
        if new_route.has_detail {
            self.spawn_fetch(new_route.clone());
        } else {
            *self.inner.phase.lock().expect("phase poisoned") = None;
            self.inner.discovery.set_suppressed(false);
            self.inner.discovery.on_viewport_settled();
            self.inner.emit(OverlayEvent::EnteredDiscovery);
        }

        new_route
    }

    fn spawn_fetch(&self, route: RouteState) {
        let inner = Arc::clone(&self.inner);
        let token = inner.freshness.issue();
        tokio::spawn(async move {
            let outcome = fetch_detail(&inner.detail_api, &route).await;
            if !token.is_current() {
                tracing::debug!("discarding superseded detail response");
                return;
            }
            apply_detail(&inner, &route, token, outcome).await;
        });
    }
}

impl<A: DiscoveryApi, D> OrchestratorInner<A, D> {
    fn emit(&self, event: OverlayEvent) {
        if let Some(tx) = &*self.event_tx.lock().expect("event channel poisoned") {
            let _ = tx.send(event);
        }
    }
}

/// Stable camera-guard key for the entity a route shows.
fn entity_key(route: &RouteState) -> String {
    let ids = &route.entity_ids;
    match route.content_type {
        ContentType::Peak => format!("peak/{}", ids.peak_id.as_deref().unwrap_or_default()),
        ContentType::Challenge => format!(
            "challenge/{}",
            ids.challenge_id.as_deref().unwrap_or_default()
        ),
        ContentType::Activity => format!(
            "activity/{}",
            ids.activity_id.as_deref().unwrap_or_default()
        ),
        ContentType::Profile => format!("user/{}", ids.user_id.as_deref().unwrap_or_default()),
        ContentType::UserChallenge => format!(
            "user/{}/challenge/{}",
            ids.user_id.as_deref().unwrap_or_default(),
            ids.challenge_id.as_deref().unwrap_or_default()
        ),
        ContentType::Discovery => String::new(),
    }
}

async fn fetch_detail<D: DetailApi>(
    api: &Arc<D>,
    route: &RouteState,
) -> Result<Option<DetailContent>, ApiError> {
    let ids = &route.entity_ids;
    match route.content_type {
        ContentType::Peak => {
            let Some(id) = ids.peak_id.as_deref() else {
                return Ok(None);
            };
            Ok(api.fetch_peak(id).await?.map(DetailContent::Peak))
        }
        ContentType::Challenge => {
            let Some(id) = ids.challenge_id.as_deref() else {
                return Ok(None);
            };
            Ok(api.fetch_challenge(id).await?.map(DetailContent::Challenge))
        }
        ContentType::Activity => {
            let Some(id) = ids.activity_id.as_deref() else {
                return Ok(None);
            };
            Ok(api.fetch_activity(id).await?.map(DetailContent::Activity))
        }
        ContentType::Profile => {
            let Some(id) = ids.user_id.as_deref() else {
                return Ok(None);
            };
            Ok(api.fetch_profile(id).await?.map(DetailContent::Profile))
        }
        ContentType::UserChallenge => {
            let (Some(user_id), Some(challenge_id)) =
                (ids.user_id.as_deref(), ids.challenge_id.as_deref())
            else {
                return Ok(None);
            };
            Ok(api
                .fetch_user_challenge(user_id, challenge_id)
                .await?
                .map(DetailContent::UserChallenge))
        }
        ContentType::Discovery => Ok(None),
    }
}

/// Projection target and camera focus for a loaded entity.
fn project_detail(content: &DetailContent) -> (&'static str, FeatureCollection, Vec<LngLat>) {
    match content {
        DetailContent::Peak(detail) => (
            SELECTED_PEAKS,
            selected_peak_features(&detail.peak),
            vec![detail.peak.coords],
        ),
        DetailContent::Challenge(detail) => {
            let mut focus: Vec<LngLat> = detail.peaks.iter().map(|p| p.coords).collect();
            if focus.is_empty() {
                focus.extend(detail.challenge.center);
            }
            (
                SELECTED_PEAKS,
                challenge_peak_features(&detail.peaks, &[]),
                focus,
            )
        }
        DetailContent::Activity(detail) => (
            ACTIVITIES,
            activity_features(&detail.activity),
            activity_focus_points(&detail.activity),
        ),
        DetailContent::Profile(detail) => (
            SELECTED_PEAKS,
            summit_features(&detail.summits),
            detail.summits.iter().map(|s| s.coords).collect(),
        ),
        DetailContent::UserChallenge(detail) => (
            SELECTED_PEAKS,
            challenge_peak_features(&detail.peaks, &detail.completed_peak_ids),
            detail.peaks.iter().map(|p| p.coords).collect(),
        ),
    }
}

async fn apply_detail<A: DiscoveryApi, D>(
    inner: &Arc<OrchestratorInner<A, D>>,
    route: &RouteState,
    token: FreshnessToken,
    outcome: Result<Option<DetailContent>, ApiError>,
) {
    match outcome {
        Ok(Some(content)) => {
            let (source_id, features, focus) = project_detail(&content);
            if let Some(handle) = inner.registry.acquire(source_id).await {
                // Acquisition may have waited on the surface; a newer
                // navigation wins.
                if !token.is_current() {
                    return;
                }
                handle.write(features);
            } else if !token.is_current() {
                return;
            }
            *inner.focus.lock().expect("focus poisoned") = focus.clone();
            *inner.phase.lock().expect("phase poisoned") = Some(DetailPhase::Loaded(content));
            inner.camera.fit_once(&entity_key(route), &focus);
            inner.emit(OverlayEvent::DetailLoaded {
                content_type: route.content_type,
            });
        }
        Ok(None) => {
            tracing::info!(content_type = ?route.content_type, "entity not found or unauthorized");
            *inner.phase.lock().expect("phase poisoned") = Some(DetailPhase::Missing);
            inner.emit(OverlayEvent::DetailMissing {
                content_type: route.content_type,
            });
        }
        Err(error) => {
            tracing::warn!(error = %error, "detail fetch failed");
            *inner.phase.lock().expect("phase poisoned") = Some(DetailPhase::Missing);
            inner.emit(OverlayEvent::DetailFailed {
                content_type: route.content_type,
                message: error.to_string(),
            });
        }
    }
}
