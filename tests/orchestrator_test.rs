//! Integration tests for the overlay orchestrator: route-driven entry/exit,
//! projection, fit-once camera moves, and symmetric cleanup.

mod common;

use common::{
    challenge, engine_config, peak, surface_with_sources, MockDetailApi, MockDiscoveryApi,
};
use peakmap::geometry::LngLat;
use peakmap::model::{ChallengeDetail, PeakDetail};
use peakmap::overlay::{DetailPhase, OverlayEvent, OverlayOrchestrator};
use peakmap::routes::ContentType;
use peakmap::sources::{ACTIVITIES, CHALLENGES, PEAKS, SELECTED_PEAKS, SUMMITED_PEAKS};
use peakmap::surface::{CameraCall, MemorySurface};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

type TestOrchestrator = OverlayOrchestrator<MockDiscoveryApi, MockDetailApi>;

fn orchestrator(
    surface: &Arc<MemorySurface>,
    discovery_api: &Arc<MockDiscoveryApi>,
    detail_api: &Arc<MockDetailApi>,
) -> TestOrchestrator {
    OverlayOrchestrator::new(
        Arc::clone(surface) as Arc<dyn peakmap::surface::MapSurface>,
        Arc::clone(discovery_api),
        Arc::clone(detail_api),
        &engine_config(),
    )
}

fn peak_detail(id: &str, lng: f64, lat: f64) -> PeakDetail {
    PeakDetail {
        peak: peak(id, lng, lat, false),
        summits: vec![],
    }
}

/// Drive a navigation's spawned fetch (and any discovery debounce) to
/// completion under the paused clock.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(500)).await;
}

#[tokio::test(start_paused = true)]
async fn test_peak_route_clears_discovery_and_projects_selection() {
    let surface = surface_with_sources(10.0);
    let discovery_api = MockDiscoveryApi::with_peaks(vec![peak("p9", 7.9, 45.1, false)]);
    let detail_api = MockDetailApi::with_peak(peak_detail("p1", 7.6, 45.9));
    let orchestrator = orchestrator(&surface, &discovery_api, &detail_api);

    // Populate discovery first, as a user browsing the map would.
    orchestrator.on_viewport_settled();
    settle().await;
    assert_eq!(surface.source_data(PEAKS).unwrap().len(), 1);

    orchestrator.navigate("/peaks/p1");
    settle().await;

    assert!(orchestrator.discovery().is_suppressed());
    assert!(surface.source_data(PEAKS).unwrap().is_empty());
    assert!(surface.source_data(SUMMITED_PEAKS).unwrap().is_empty());
    assert!(surface.source_data(CHALLENGES).unwrap().is_empty());

    let selected = surface.source_data(SELECTED_PEAKS).unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected.features[0].id.as_deref(), Some("p1"));

    // Single point: one fly-to, issued exactly once.
    let flights: Vec<CameraCall> = surface.camera_calls();
    assert_eq!(flights.len(), 1);
    match &flights[0] {
        CameraCall::FlyTo { center, .. } => assert_eq!(*center, LngLat::new(7.6, 45.9)),
        other => panic!("Expected FlyTo, got {other:?}"),
    }

    assert!(matches!(
        orchestrator.detail_phase(),
        Some(DetailPhase::Loaded(_))
    ));

    // Re-navigating to the same route is a no-op: no refetch, no refit.
    let calls_before = detail_api.fetch_calls.load(Ordering::SeqCst);
    orchestrator.navigate("/peaks/p1");
    settle().await;
    assert_eq!(detail_api.fetch_calls.load(Ordering::SeqCst), calls_before);
    assert_eq!(surface.camera_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_activity_renders_explicit_state_without_side_effects() {
    let surface = surface_with_sources(10.0);
    let discovery_api = MockDiscoveryApi::with_peaks(vec![]);
    let detail_api = Arc::new(MockDetailApi::default());
    let orchestrator = orchestrator(&surface, &discovery_api, &detail_api);
    let events = orchestrator.event_receiver();

    orchestrator.navigate("/activities/a1");
    settle().await;

    // Suppression was applied on entry, but projection and camera were not.
    assert!(orchestrator.discovery().is_suppressed());
    assert_eq!(orchestrator.detail_phase(), Some(DetailPhase::Missing));
    assert!(surface.source_data(ACTIVITIES).unwrap().is_empty());
    assert!(surface.camera_calls().is_empty());

    let received: Vec<OverlayEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            OverlayEvent::DetailLoading {
                content_type: ContentType::Activity
            },
            OverlayEvent::DetailMissing {
                content_type: ContentType::Activity
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_detail_to_detail_is_exit_then_entry() {
    let surface = surface_with_sources(10.0);
    let discovery_api = MockDiscoveryApi::with_peaks(vec![]);
    let detail_api = MockDetailApi::with_peak(peak_detail("p1", 7.6, 45.9));
    detail_api.challenges.lock().unwrap().insert(
        "c1".to_string(),
        ChallengeDetail {
            challenge: challenge("c1", 2),
            peaks: vec![peak("p2", 7.0, 46.0, false), peak("p3", 8.0, 45.0, true)],
        },
    );
    let orchestrator = orchestrator(&surface, &discovery_api, &detail_api);

    orchestrator.navigate("/peaks/p1");
    settle().await;
    orchestrator.navigate("/challenges/c1");
    settle().await;

    // Discovery stayed suppressed across the whole transition.
    assert!(orchestrator.discovery().is_suppressed());
    assert_eq!(discovery_api.peak_call_count(), 0);

    // The old peak projection was replaced, not compounded.
    let selected = surface.source_data(SELECTED_PEAKS).unwrap();
    assert_eq!(selected.len(), 2);
    assert_eq!(selected.features[0].id.as_deref(), Some("p2"));

    // One camera move per entity: fly-to for the peak, fit for the challenge.
    let calls = surface.camera_calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], CameraCall::FlyTo { .. }));
    assert!(matches!(calls[1], CameraCall::FitBounds { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_entry_exit_symmetry_restores_initial_state() {
    let surface = surface_with_sources(10.0);
    let discovery_api = MockDiscoveryApi::with_peaks(vec![]);
    let detail_api = MockDetailApi::with_peak(peak_detail("p1", 7.6, 45.9));
    let orchestrator = orchestrator(&surface, &discovery_api, &detail_api);

    let initial_sources: Vec<String> = surface.source_ids();

    for _ in 0..2 {
        orchestrator.navigate("/peaks/p1");
        settle().await;
        orchestrator.navigate("/");
        settle().await;
    }

    assert!(!orchestrator.discovery().is_suppressed());
    assert_eq!(orchestrator.detail_phase(), None);
    assert_eq!(orchestrator.route().content_type, ContentType::Discovery);
    assert_eq!(surface.source_ids(), initial_sources);
    for id in [PEAKS, SUMMITED_PEAKS, SELECTED_PEAKS, ACTIVITIES, CHALLENGES] {
        assert!(
            surface.source_data(id).unwrap().is_empty(),
            "source {id} not restored"
        );
    }

    // Each exit re-triggered discovery for the current viewport.
    assert_eq!(discovery_api.peak_call_count(), 2);
    // Each entry was a fresh entity view: the camera fit both times.
    assert_eq!(surface.camera_calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_exit_repopulates_discovery() {
    let surface = surface_with_sources(10.0);
    let discovery_api = MockDiscoveryApi::with_peaks(vec![peak("p9", 7.9, 45.1, false)]);
    let detail_api = MockDetailApi::with_peak(peak_detail("p1", 7.6, 45.9));
    let orchestrator = orchestrator(&surface, &discovery_api, &detail_api);

    orchestrator.navigate("/peaks/p1");
    settle().await;
    orchestrator.navigate("/");
    settle().await;

    assert_eq!(surface.source_data(PEAKS).unwrap().len(), 1);
    assert!(surface.source_data(SELECTED_PEAKS).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stale_detail_response_is_discarded() {
    let surface = surface_with_sources(10.0);
    let discovery_api = MockDiscoveryApi::with_peaks(vec![]);
    let detail_api = MockDetailApi::with_peak(peak_detail("p1", 7.6, 45.9));
    let orchestrator = orchestrator(&surface, &discovery_api, &detail_api);

    // Navigate to the peak and immediately away, before the fetch resolves.
    orchestrator.navigate("/peaks/p1");
    orchestrator.navigate("/");
    settle().await;

    assert_eq!(orchestrator.detail_phase(), None);
    assert!(surface.source_data(SELECTED_PEAKS).unwrap().is_empty());
    assert!(surface.camera_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_show_on_map_recenters_on_demand() {
    let surface = surface_with_sources(10.0);
    let discovery_api = MockDiscoveryApi::with_peaks(vec![]);
    let detail_api = MockDetailApi::with_peak(peak_detail("p1", 7.6, 45.9));
    let orchestrator = orchestrator(&surface, &discovery_api, &detail_api);

    orchestrator.navigate("/peaks/p1");
    settle().await;
    assert_eq!(surface.camera_calls().len(), 1);

    orchestrator.show_on_map();
    orchestrator.show_on_map();
    assert_eq!(surface.camera_calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_detail_transport_failure_reports_failed_event() {
    let surface = surface_with_sources(10.0);
    let discovery_api = MockDiscoveryApi::with_peaks(vec![]);
    let detail_api = Arc::new(MockDetailApi::default());
    detail_api.fail.store(true, Ordering::SeqCst);
    let orchestrator = orchestrator(&surface, &discovery_api, &detail_api);
    let events = orchestrator.event_receiver();

    orchestrator.navigate("/users/u1");
    settle().await;

    assert_eq!(orchestrator.detail_phase(), Some(DetailPhase::Missing));
    let received: Vec<OverlayEvent> = events.try_iter().collect();
    assert!(matches!(
        received.last(),
        Some(OverlayEvent::DetailFailed { .. })
    ));
}
