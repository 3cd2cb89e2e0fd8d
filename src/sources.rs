//! Source registry: acquiring and writing named map sources.
//!
//! The rendering surface creates its sources asynchronously during its own
//! startup/style-load sequence, out of band with application state, so the
//! first write attempt may find the source missing. Acquisition polls with a
//! bounded retry; exhausting the attempts is a soft failure (the write is
//! skipped with a warning), never an error.

use crate::geometry::FeatureCollection;
use crate::surface::MapSurface;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Source holding discovery peaks the user has not summited.
pub const PEAKS: &str = "peaks";
/// Source holding discovery peaks the user has summited, styled separately.
pub const SUMMITED_PEAKS: &str = "summitedPeaks";
/// Source owned by detail views for the entity's own peaks/summits.
pub const SELECTED_PEAKS: &str = "selectedPeaks";
/// Source holding an activity's track and summit markers.
pub const ACTIVITIES: &str = "activities";
/// Source holding discovery challenge markers.
pub const CHALLENGES: &str = "challenges";
/// Single-feature source for the pointer-hover highlight.
pub const PEAK_HOVER: &str = "peakHover";

/// Discovery-owned sources, cleared on detail entry and below the zoom
/// threshold.
pub const DISCOVERY_SOURCES: &[&str] = &[PEAKS, SUMMITED_PEAKS, CHALLENGES];

/// Detail-owned sources, cleared on detail exit.
pub const DETAIL_SOURCES: &[&str] = &[SELECTED_PEAKS, ACTIVITIES];

/// Acquires handles to named sources on a shared surface.
#[derive(Clone)]
pub struct SourceRegistry {
    surface: Arc<dyn MapSurface>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl SourceRegistry {
    pub fn new(surface: Arc<dyn MapSurface>, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            surface,
            max_attempts,
            retry_delay,
        }
    }

    /// Acquire a handle to `id`, polling until the surface has created it.
    ///
    /// Returns `None` once `max_attempts` polls have failed; callers skip
    /// their write in that case.
    pub async fn acquire(&self, id: &str) -> Option<SourceHandle> {
        for attempt in 1..=self.max_attempts.max(1) {
            if self.surface.has_source(id) {
                return Some(SourceHandle {
                    surface: Arc::clone(&self.surface),
                    id: id.to_string(),
                });
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
        tracing::warn!(source = id, attempts = self.max_attempts, "source never appeared");
        None
    }

    /// Acquire several sources at once.
    ///
    /// Resolves when every name has been found or attempts are exhausted;
    /// names that never appeared map to `None`.
    pub async fn acquire_all(&self, ids: &[&str]) -> HashMap<String, Option<SourceHandle>> {
        let mut found: HashMap<String, Option<SourceHandle>> = HashMap::new();
        let mut remaining: Vec<&str> = ids.to_vec();

        for attempt in 1..=self.max_attempts.max(1) {
            remaining.retain(|id| {
                if self.surface.has_source(id) {
                    found.insert(
                        (*id).to_string(),
                        Some(SourceHandle {
                            surface: Arc::clone(&self.surface),
                            id: (*id).to_string(),
                        }),
                    );
                    false
                } else {
                    true
                }
            });
            if remaining.is_empty() {
                break;
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        for id in remaining {
            tracing::warn!(source = id, attempts = self.max_attempts, "source never appeared");
            found.insert(id.to_string(), None);
        }
        found
    }

    /// Best-effort immediate clear without retrying.
    ///
    /// Safe on a missing source and on a torn-down surface; both leave state
    /// unchanged.
    pub fn clear_now(&self, id: &str) {
        if self.surface.has_source(id) {
            let _ = self.surface.set_source_data(id, FeatureCollection::empty());
        }
    }

    /// The surface this registry writes to.
    pub fn surface(&self) -> &Arc<dyn MapSurface> {
        &self.surface
    }
}

/// A handle to one named source.
#[derive(Clone)]
pub struct SourceHandle {
    surface: Arc<dyn MapSurface>,
    id: String,
}

impl SourceHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the source's entire feature collection.
    ///
    /// Returns `false` if the surface has since been torn down; the caller
    /// treats that as a soft failure.
    pub fn write(&self, features: FeatureCollection) -> bool {
        self.surface.set_source_data(&self.id, features)
    }

    /// Write the empty collection. Must not fail on a torn-down surface.
    pub fn clear(&self) -> bool {
        self.write(FeatureCollection::empty())
    }
}
