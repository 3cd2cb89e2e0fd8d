//! Shared test fixtures: mock backend APIs and surface builders.

#![allow(dead_code)]

use peakmap::api::{
    ApiError, ChallengeSearchQuery, DetailApi, DiscoveryApi, PeakSearchQuery,
};
use peakmap::config::EngineConfig;
use peakmap::geometry::{LngLat, LngLatBounds};
use peakmap::model::{
    ActivityDetail, Challenge, ChallengeDetail, ChallengeKind, ChallengeProgress, Peak,
    PeakDetail, ProfileDetail, UserChallengeDetail,
};
use peakmap::sources::{ACTIVITIES, CHALLENGES, PEAKS, SELECTED_PEAKS, SUMMITED_PEAKS};
use peakmap::surface::{MapSurface, MemorySurface};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route engine tracing through the test harness; `RUST_LOG` controls
/// verbosity when a test needs log output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn peak(id: &str, lng: f64, lat: f64, summited: bool) -> Peak {
    Peak {
        id: id.to_string(),
        name: format!("Peak {id}"),
        coords: LngLat::new(lng, lat),
        elevation_m: Some(3000.0),
        summited,
        favorited: false,
    }
}

pub fn challenge(id: &str, peak_count: u32) -> Challenge {
    Challenge {
        id: id.to_string(),
        name: format!("Challenge {id}"),
        kind: ChallengeKind::Official,
        description: None,
        peak_count,
        center: Some(LngLat::new(7.5, 45.5)),
    }
}

pub fn alps_bounds() -> LngLatBounds {
    LngLatBounds::new(LngLat::new(6.0, 47.0), LngLat::new(8.0, 45.0))
}

/// Surface with all engine sources pre-created, viewed over the Alps.
pub fn surface_with_sources(zoom: f64) -> Arc<MemorySurface> {
    init_tracing();
    let surface = Arc::new(MemorySurface::new());
    for id in [PEAKS, SUMMITED_PEAKS, SELECTED_PEAKS, ACTIVITIES, CHALLENGES] {
        surface.add_source(id);
    }
    surface.set_viewport(alps_bounds(), zoom);
    surface
}

/// Engine config with short timings suited to paused-clock tests.
pub fn engine_config() -> EngineConfig {
    EngineConfig {
        debounce_ms: 250,
        min_discovery_zoom: 6.0,
        source_retry_attempts: 3,
        source_retry_delay_ms: 50,
        ..EngineConfig::default()
    }
}

/// One scripted discovery response: wait `delay`, then answer with `peaks`.
pub struct ScriptedResponse {
    pub delay: Duration,
    pub peaks: Vec<Peak>,
}

/// Mock discovery backend with call counting and optional scripted responses.
#[derive(Default)]
pub struct MockDiscoveryApi {
    pub peaks: Mutex<Vec<Peak>>,
    pub challenges: Mutex<Vec<ChallengeProgress>>,
    pub scripted: Mutex<VecDeque<ScriptedResponse>>,
    pub fail: AtomicBool,
    pub peak_calls: AtomicUsize,
    pub challenge_calls: AtomicUsize,
    pub last_peak_query: Mutex<Option<PeakSearchQuery>>,
}

impl MockDiscoveryApi {
    pub fn with_peaks(peaks: Vec<Peak>) -> Arc<Self> {
        let api = Self::default();
        *api.peaks.lock().unwrap() = peaks;
        Arc::new(api)
    }

    pub fn push_scripted(&self, delay: Duration, peaks: Vec<Peak>) {
        self.scripted
            .lock()
            .unwrap()
            .push_back(ScriptedResponse { delay, peaks });
    }

    pub fn peak_call_count(&self) -> usize {
        self.peak_calls.load(Ordering::SeqCst)
    }
}

impl DiscoveryApi for MockDiscoveryApi {
    async fn search_peaks(&self, query: &PeakSearchQuery) -> Result<Vec<Peak>, ApiError> {
        self.peak_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_peak_query.lock().unwrap() = Some(query.clone());

        let scripted = self.scripted.lock().unwrap().pop_front();
        if let Some(response) = scripted {
            if !response.delay.is_zero() {
                tokio::time::sleep(response.delay).await;
            }
            return Ok(response.peaks);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::ServerError(500));
        }
        Ok(self.peaks.lock().unwrap().clone())
    }

    async fn search_challenges(
        &self,
        _query: &ChallengeSearchQuery,
    ) -> Result<Vec<ChallengeProgress>, ApiError> {
        self.challenge_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::ServerError(500));
        }
        Ok(self.challenges.lock().unwrap().clone())
    }
}

/// Mock detail backend keyed by entity id.
#[derive(Default)]
pub struct MockDetailApi {
    pub peaks: Mutex<HashMap<String, PeakDetail>>,
    pub challenges: Mutex<HashMap<String, ChallengeDetail>>,
    pub activities: Mutex<HashMap<String, ActivityDetail>>,
    pub profiles: Mutex<HashMap<String, ProfileDetail>>,
    pub user_challenges: Mutex<HashMap<(String, String), UserChallengeDetail>>,
    pub fail: AtomicBool,
    pub fetch_calls: AtomicUsize,
}

impl MockDetailApi {
    pub fn with_peak(detail: PeakDetail) -> Arc<Self> {
        let api = Self::default();
        api.peaks
            .lock()
            .unwrap()
            .insert(detail.peak.id.clone(), detail);
        Arc::new(api)
    }

    fn checked<T: Clone>(&self, value: Option<T>) -> Result<Option<T>, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::ServerError(500));
        }
        Ok(value)
    }
}

impl DetailApi for MockDetailApi {
    async fn fetch_peak(&self, id: &str) -> Result<Option<PeakDetail>, ApiError> {
        let value = self.peaks.lock().unwrap().get(id).cloned();
        self.checked(value)
    }

    async fn fetch_challenge(&self, id: &str) -> Result<Option<ChallengeDetail>, ApiError> {
        let value = self.challenges.lock().unwrap().get(id).cloned();
        self.checked(value)
    }

    async fn fetch_activity(&self, id: &str) -> Result<Option<ActivityDetail>, ApiError> {
        let value = self.activities.lock().unwrap().get(id).cloned();
        self.checked(value)
    }

    async fn fetch_profile(&self, id: &str) -> Result<Option<ProfileDetail>, ApiError> {
        let value = self.profiles.lock().unwrap().get(id).cloned();
        self.checked(value)
    }

    async fn fetch_user_challenge(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<UserChallengeDetail>, ApiError> {
        let value = self
            .user_challenges
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), challenge_id.to_string()))
            .cloned();
        self.checked(value)
    }
}

/// Let spawned engine tasks run to completion under a paused clock.
pub async fn settle_tasks() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
